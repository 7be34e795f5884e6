//! Error types for media operations.

use std::path::PathBuf;
use thiserror::Error;
use vsuite_models::ErrorKind;

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// Errors that can occur during media processing.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("FFmpeg not found in PATH")]
    FfmpegNotFound,

    #[error("FFprobe not found in PATH")]
    FfprobeNotFound,

    #[error("FFmpeg command failed: {message}")]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("FFprobe command failed: {message}")]
    FfprobeFailed {
        message: String,
        stderr: Option<String>,
    },

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Could not open video: {0}")]
    VideoDecode(String),

    #[error("Could not decode frame {index}: {message}")]
    FrameDecode { index: u64, message: String },

    #[error("Could not decode image: {0}")]
    ImageDecode(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MediaError {
    /// Create an FFmpeg failure error.
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    /// Create a video container error.
    pub fn video_decode(message: impl Into<String>) -> Self {
        Self::VideoDecode(message.into())
    }

    /// Create a single-frame decode error.
    pub fn frame_decode(index: u64, message: impl Into<String>) -> Self {
        Self::FrameDecode {
            index,
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// True for failures reading or decoding an input asset.
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            MediaError::Io(_) | MediaError::ImageDecode(_) | MediaError::FileNotFound(_)
        )
    }

    /// Taxonomy class used for metrics and user-facing messages.
    pub fn kind(&self) -> ErrorKind {
        match self {
            MediaError::VideoDecode(_) | MediaError::FfprobeFailed { .. } => {
                ErrorKind::VideoDecode
            }
            _ => ErrorKind::Io,
        }
    }
}

impl From<image::ImageError> for MediaError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => MediaError::Io(io),
            other => MediaError::ImageDecode(other.to_string()),
        }
    }
}
