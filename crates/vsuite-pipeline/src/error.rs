//! Pipeline error types.

use thiserror::Error;
use vsuite_media::MediaError;
use vsuite_models::ErrorKind;
use vsuite_vision_client::VisionError;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Vision(#[from] VisionError),

    #[error("No frames could be decoded from the video")]
    NoFrames,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Media(e) => e.kind(),
            PipelineError::Vision(e) => e.kind(),
            PipelineError::NoFrames => ErrorKind::VideoDecode,
        }
    }
}
