//! Vision Suite analysis pipeline.
//!
//! This crate handles:
//! - The four single-image panels (scene analysis, OCR, search query
//!   generation, chat)
//! - Sampling a video into frames and analysing each frame independently
//! - Demo-mode placeholders when no credential is configured

pub mod config;
pub mod demo;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod panels;
pub mod video;

#[cfg(test)]
pub(crate) mod testing;

pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use logging::RunLogger;
pub use panels::{AnalyzeOutput, ChatOutput, ImagePanels, OcrOutput, SearchOutput};
pub use video::{FramePipeline, VideoAnalysis, VideoOutcome};

/// Shown when a panel is run without an uploaded image.
pub const MISSING_IMAGE_MESSAGE: &str = "Please upload an image.";

/// Shown when the video panel is run without an uploaded video.
pub const MISSING_VIDEO_MESSAGE: &str = "Please upload a video.";

/// Display form of a failed operation.
pub(crate) fn error_text(err: &impl std::fmt::Display) -> String {
    format!("Error: {}", err)
}

/// Call the backend and record the call's outcome and latency.
pub(crate) async fn complete_recorded(
    backend: &dyn vsuite_vision_client::VisionBackend,
    task: &'static str,
    credential: Option<&vsuite_models::Credential>,
    request: &vsuite_models::CompletionRequest,
) -> vsuite_vision_client::VisionResult<vsuite_models::CompletionResult> {
    let start = std::time::Instant::now();
    let result = backend.complete(credential, request).await;
    let outcome = match &result {
        Ok(r) if r.demo => "demo",
        Ok(_) => "ok",
        Err(e) => e.kind().as_str(),
    };
    metrics::record_vision_call(task, outcome, start.elapsed().as_secs_f64());
    result
}
