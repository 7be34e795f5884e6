//! Session handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use vsuite_models::Credential;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::security::MAX_API_KEY_LENGTH;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Overrides the server's key; blank falls back to it
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub demo_mode: bool,
}

/// Create a session.
pub async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> ApiResult<(StatusCode, Json<CreateSessionResponse>)> {
    let request = body.map(|Json(r)| r).unwrap_or_default();

    if let Some(key) = &request.api_key {
        if key.len() > MAX_API_KEY_LENGTH {
            return Err(ApiError::Validation("api_key is too long".to_string()));
        }
    }

    let credential = Credential::from_input(request.api_key.as_deref())
        .or_else(|| state.config.default_credential.clone());
    let demo_mode = credential.is_none();

    let id = state.sessions.create(credential).await;
    metrics::record_session_created(demo_mode);

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: id.to_string(),
            demo_mode,
        }),
    ))
}

/// Close a session and discard its video analysis.
pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.sessions.remove(&session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
