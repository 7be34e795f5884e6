//! Vision client error types.

use thiserror::Error;
use vsuite_models::ErrorKind;

pub type VisionResult<T> = Result<T, VisionError>;

#[derive(Debug, Error)]
pub enum VisionError {
    #[error("Request to vision API failed: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Vision API did not respond within {0} seconds")]
    Timeout(u64),

    #[error("Vision API returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed response from vision API: {0}")]
    MalformedResponse(String),
}

impl VisionError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            VisionError::Timeout(_) => ErrorKind::Timeout,
            _ => ErrorKind::RemoteCall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(VisionError::Timeout(60).kind(), ErrorKind::Timeout);
        let status = VisionError::Status {
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(status.kind(), ErrorKind::RemoteCall);
        assert_eq!(status.to_string(), "Vision API returned 500: boom");
        assert_eq!(VisionError::malformed("no choices").kind(), ErrorKind::RemoteCall);
    }
}
