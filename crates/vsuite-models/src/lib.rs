//! Shared data models for the Vision Suite backend.
//!
//! This crate provides Serde-serializable types for:
//! - Uploaded media assets and inline (data URI) images
//! - Completion requests and results exchanged with the vision model
//! - Frame sampling summaries and per-frame analysis sets
//! - Panel controls (detail level, OCR language, search type, frame count)

pub mod asset;
pub mod completion;
pub mod controls;
pub mod credential;
pub mod error_kind;
pub mod frame;
pub mod inline_image;
pub mod session;

// Re-export common types
pub use asset::{AssetSource, MediaAsset, MediaKind, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS};
pub use completion::{CompletionRequest, CompletionResult, DEFAULT_MAX_TOKENS};
pub use controls::{ControlParseError, DetailLevel, FrameCount, OcrLanguage, SearchType};
pub use credential::Credential;
pub use error_kind::ErrorKind;
pub use frame::{ExtractionSummary, FrameAnalysis, FrameAnalysisSet, FrameLookupError};
pub use inline_image::{InlineImage, NORMALIZED_IMAGE_MIME};
pub use session::SessionId;
