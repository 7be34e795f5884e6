//! Video analysis handlers.
//!
//! A session keeps the most recent analysed video. Its frames are paged by
//! 1-based frame number and each frame's PNG artifact can be fetched.

use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use vsuite_models::{ExtractionSummary, FrameAnalysis, FrameCount};
use vsuite_pipeline::VideoOutcome;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::upload::UploadForm;

#[derive(Debug, Serialize)]
pub struct VideoRunResponse {
    /// `message`, `demo`, `failed` or `analyzed`
    pub status: &'static str,
    pub summary: String,
    pub frames: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct VideoStatusResponse {
    pub summary: ExtractionSummary,
    pub summary_text: String,
    pub report: String,
    pub frame_count: usize,
    pub error_count: usize,
}

#[derive(Debug, Serialize)]
pub struct FrameView {
    pub frame_number: u32,
    pub source_index: u64,
    pub analysis_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub image_url: String,
}

impl FrameView {
    fn new(session_id: &str, frame: &FrameAnalysis) -> Self {
        Self {
            frame_number: frame.frame_number,
            source_index: frame.source_index,
            analysis_text: frame.analysis_text.clone(),
            token_count: frame.token_count,
            error: frame.error.clone(),
            image_url: format!(
                "/api/sessions/{}/video/frames/{}/image",
                session_id, frame.frame_number
            ),
        }
    }
}

/// POST /api/sessions/:id/video
pub async fn analyze_video(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<VideoRunResponse>> {
    let credential = state.sessions.credential(&session_id).await?;
    let form = UploadForm::from_multipart(multipart).await?;

    let requested = form.parse::<FrameCount>("frame_count")?.unwrap_or_default();
    let video = form.video_file().await?;

    let outcome = state
        .pipeline
        .analyze_video(
            video.as_ref().map(|f| f.path()),
            requested,
            credential.as_ref(),
        )
        .await;
    // The decoded frames live in the artifact dir; the upload is no longer needed
    drop(video);

    let summary = outcome.summary_text();
    let response = match outcome {
        VideoOutcome::Message(_) => VideoRunResponse {
            status: "message",
            summary,
            frames: 0,
            report: None,
        },
        VideoOutcome::Demo(_) => {
            state.sessions.set_video(&session_id, None).await?;
            VideoRunResponse {
                status: "demo",
                summary,
                frames: 0,
                report: None,
            }
        }
        VideoOutcome::Failed(_) => {
            state.sessions.set_video(&session_id, None).await?;
            VideoRunResponse {
                status: "failed",
                summary,
                frames: 0,
                report: None,
            }
        }
        VideoOutcome::Analyzed(analysis) => {
            let frames = analysis.set().len();
            let report = analysis.report();
            state.sessions.set_video(&session_id, Some(analysis)).await?;
            VideoRunResponse {
                status: "analyzed",
                summary,
                frames,
                report: Some(report),
            }
        }
    };

    Ok(Json(response))
}

/// GET /api/sessions/:id/video
pub async fn get_video(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<Json<VideoStatusResponse>> {
    let response = state
        .sessions
        .with_video(&session_id, |video| {
            let video = video.ok_or_else(|| ApiError::not_found("No video has been analyzed"))?;
            let set = video.set();
            Ok(VideoStatusResponse {
                summary: set.summary,
                summary_text: set.summary.to_string(),
                report: set.report(),
                frame_count: set.len(),
                error_count: set.error_count(),
            })
        })
        .await?;
    Ok(Json(response))
}

/// GET /api/sessions/:id/video/frames/:n
pub async fn get_frame(
    State(state): State<AppState>,
    Path((session_id, frame_number)): Path<(String, u32)>,
) -> ApiResult<Json<FrameView>> {
    let view = state
        .sessions
        .with_video(&session_id, |video| {
            let video = video.ok_or_else(|| ApiError::not_found("No video has been analyzed"))?;
            let frame = video.frame(frame_number)?;
            Ok(FrameView::new(&session_id, frame))
        })
        .await?;
    Ok(Json(view))
}

/// GET /api/sessions/:id/video/frames/:n/image
pub async fn get_frame_image(
    State(state): State<AppState>,
    Path((session_id, frame_number)): Path<(String, u32)>,
) -> ApiResult<impl IntoResponse> {
    let path = state
        .sessions
        .with_video(&session_id, |video| {
            let video = video.ok_or_else(|| ApiError::not_found("No video has been analyzed"))?;
            Ok(video.frame(frame_number)?.artifact.clone())
        })
        .await?;

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        ApiError::not_found(format!("Frame {} image is unavailable: {}", frame_number, e))
    })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}
