//! Axum HTTP API server.
//!
//! This crate provides:
//! - Sessions holding an optional API key and the latest video analysis
//! - Multipart upload endpoints for the four image panels and the video panel
//! - Frame paging over the latest video analysis
//! - Health, info and Prometheus metrics endpoints

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod session;
pub mod state;
pub mod upload;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use session::{Session, SessionStore};
pub use state::AppState;
