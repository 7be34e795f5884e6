//! API routes.

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::{
    analyze_image, analyze_video, create_session, delete_session, extract_text, get_frame,
    get_frame_image, get_video, health, info, vision_chat, vision_search,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_id, request_logging, security_headers};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let session_routes = Router::new()
        .route("/sessions", post(create_session))
        .route("/sessions/:session_id", axum::routing::delete(delete_session))
        // Image panels
        .route("/sessions/:session_id/analyze", post(analyze_image))
        .route("/sessions/:session_id/ocr", post(extract_text))
        .route("/sessions/:session_id/search", post(vision_search))
        .route("/sessions/:session_id/chat", post(vision_chat))
        // Video analysis and frame browsing
        .route(
            "/sessions/:session_id/video",
            post(analyze_video).get(get_video),
        )
        .route(
            "/sessions/:session_id/video/frames/:frame_number",
            get(get_frame),
        )
        .route(
            "/sessions/:session_id/video/frames/:frame_number/image",
            get(get_frame_image),
        );

    let api_routes = Router::new()
        .route("/info", get(info))
        .merge(session_routes);

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        // Uploads are bounded by max_body_size instead of axum's 2MB default
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_logging))
        // Outermost so the logger sees the request id
        .layer(middleware::from_fn(request_id))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
