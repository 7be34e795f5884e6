//! Prometheus metrics for the API server.
//!
//! Vision call and frame metrics are emitted by the pipeline crate and
//! exported through the same recorder.

use std::sync::OnceLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "vsuite_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vsuite_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vsuite_http_requests_in_flight";

    pub const SESSIONS_CREATED_TOTAL: &str = "vsuite_sessions_created_total";
    pub const UPLOADS_TOTAL: &str = "vsuite_uploads_total";
    pub const UPLOAD_BYTES: &str = "vsuite_upload_bytes";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

pub fn record_session_created(demo: bool) {
    let labels = [("mode", if demo { "demo" } else { "live" }.to_string())];
    counter!(names::SESSIONS_CREATED_TOTAL, &labels).increment(1);
}

pub fn record_upload(kind: &str, bytes: usize) {
    let labels = [("kind", kind.to_string())];
    counter!(names::UPLOADS_TOTAL, &labels).increment(1);
    histogram!(names::UPLOAD_BYTES, &labels).record(bytes as f64);
}

fn uuid_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
            .expect("valid regex")
    })
}

fn number_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"/[0-9]+(/|$)").expect("valid regex"))
}

/// Sanitize path for metrics labels (session IDs, frame numbers).
fn sanitize_path(path: &str) -> String {
    let path = uuid_pattern().replace_all(path, ":id");
    let path = number_pattern().replace_all(&path, "/:n$1");
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(
        &method,
        &path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/api/sessions/550e8400-e29b-41d4-a716-446655440000/video/frames/3/image"),
            "/api/sessions/:id/video/frames/:n/image"
        );
        assert_eq!(
            sanitize_path("/api/sessions/550e8400-e29b-41d4-a716-446655440000/video/frames/12"),
            "/api/sessions/:id/video/frames/:n"
        );
        assert_eq!(sanitize_path("/health"), "/health");
    }
}
