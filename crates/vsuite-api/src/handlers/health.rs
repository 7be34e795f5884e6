//! Health and service info handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use vsuite_models::controls::{
    DEFAULT_FRAME_COUNT, DEFAULT_SEARCH_RESULTS, MAX_FRAME_COUNT, MAX_SEARCH_RESULTS,
    MIN_FRAME_COUNT, MIN_SEARCH_RESULTS,
};
use vsuite_models::{DetailLevel, OcrLanguage, SearchType, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[derive(Serialize)]
pub struct Range {
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

#[derive(Serialize)]
pub struct InfoResponse {
    pub name: &'static str,
    pub version: &'static str,
    /// `demo` when no server-side API key is configured
    pub mode: &'static str,
    pub model: String,
    pub base_url: String,
    pub image_types: &'static [&'static str],
    pub video_types: &'static [&'static str],
    pub detail_levels: Vec<&'static str>,
    pub ocr_languages: Vec<&'static str>,
    pub search_types: Vec<&'static str>,
    pub frame_count: Range,
    pub max_results: Range,
}

/// Service info: mode, model and the choices each control accepts.
pub async fn info(State(state): State<AppState>) -> Json<InfoResponse> {
    Json(InfoResponse {
        name: "Vision Suite",
        version: env!("CARGO_PKG_VERSION"),
        mode: if state.config.default_credential.is_some() {
            "live"
        } else {
            "demo"
        },
        model: state.vision.model.clone(),
        base_url: state.vision.base_url.clone(),
        image_types: IMAGE_EXTENSIONS,
        video_types: VIDEO_EXTENSIONS,
        detail_levels: DetailLevel::ALL.iter().map(DetailLevel::as_str).collect(),
        ocr_languages: OcrLanguage::ALL.iter().map(OcrLanguage::as_str).collect(),
        search_types: SearchType::ALL.iter().map(SearchType::as_str).collect(),
        frame_count: Range {
            min: MIN_FRAME_COUNT,
            max: MAX_FRAME_COUNT,
            default: DEFAULT_FRAME_COUNT,
        },
        max_results: Range {
            min: MIN_SEARCH_RESULTS,
            max: MAX_SEARCH_RESULTS,
            default: DEFAULT_SEARCH_RESULTS,
        },
    })
}
