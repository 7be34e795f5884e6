//! Image panel handlers.
//!
//! Each takes a multipart form with an optional `file` part. Model output,
//! demo text and model errors all come back as 200 with display strings.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use vsuite_models::controls::{DEFAULT_SEARCH_RESULTS, MAX_SEARCH_RESULTS, MIN_SEARCH_RESULTS};
use vsuite_models::{DetailLevel, OcrLanguage, SearchType};
use vsuite_pipeline::{AnalyzeOutput, ChatOutput, OcrOutput, SearchOutput};

use crate::error::{ApiError, ApiResult};
use crate::security::MAX_PROMPT_LENGTH;
use crate::state::AppState;
use crate::upload::UploadForm;

/// POST /api/sessions/:id/analyze
pub async fn analyze_image(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<AnalyzeOutput>> {
    let credential = state.sessions.credential(&session_id).await?;
    let form = UploadForm::from_multipart(multipart).await?;

    let detail = form.parse::<DetailLevel>("detail")?.unwrap_or_default();
    let detect_objects = form.flag("detect_objects", true)?;
    let image = form.image()?;

    let output = state
        .panels
        .analyze_image(image.as_ref(), detail, detect_objects, credential.as_ref())
        .await;
    Ok(Json(output))
}

/// POST /api/sessions/:id/ocr
pub async fn extract_text(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<OcrOutput>> {
    let credential = state.sessions.credential(&session_id).await?;
    let form = UploadForm::from_multipart(multipart).await?;

    let language = form.parse::<OcrLanguage>("language")?.unwrap_or_default();
    let preserve_format = form.flag("preserve_format", true)?;
    let image = form.image()?;

    let output = state
        .panels
        .extract_text(image.as_ref(), language, preserve_format, credential.as_ref())
        .await;
    Ok(Json(output))
}

/// POST /api/sessions/:id/search
pub async fn vision_search(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<SearchOutput>> {
    let credential = state.sessions.credential(&session_id).await?;
    let form = UploadForm::from_multipart(multipart).await?;

    let search_type = form.parse::<SearchType>("search_type")?.unwrap_or_default();
    let max_results = form
        .parse::<u32>("max_results")?
        .unwrap_or(DEFAULT_SEARCH_RESULTS);
    if !(MIN_SEARCH_RESULTS..=MAX_SEARCH_RESULTS).contains(&max_results) {
        return Err(ApiError::Validation(format!(
            "max_results must be between {} and {}",
            MIN_SEARCH_RESULTS, MAX_SEARCH_RESULTS
        )));
    }
    let image = form.image()?;

    let output = state
        .panels
        .vision_search(image.as_ref(), search_type, max_results, credential.as_ref())
        .await;
    Ok(Json(output))
}

/// POST /api/sessions/:id/chat
pub async fn vision_chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<Json<ChatOutput>> {
    let credential = state.sessions.credential(&session_id).await?;
    let form = UploadForm::from_multipart(multipart).await?;

    let prompt = form.field("prompt").unwrap_or_default();
    if prompt.chars().count() > MAX_PROMPT_LENGTH {
        return Err(ApiError::Validation(format!(
            "prompt must be at most {} characters",
            MAX_PROMPT_LENGTH
        )));
    }
    let image = form.image()?;

    let output = state
        .panels
        .vision_chat(image.as_ref(), prompt, credential.as_ref())
        .await;
    Ok(Json(output))
}
