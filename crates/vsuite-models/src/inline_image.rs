//! Inline (data URI) image representation.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mime type used whenever the encoder re-encodes an image.
pub const NORMALIZED_IMAGE_MIME: &str = "image/png";

/// A mime-typed, base64-encoded image, usable directly as an image source.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InlineImage {
    pub mime_type: String,
    pub base64_payload: String,
}

impl InlineImage {
    pub fn new(mime_type: impl Into<String>, base64_payload: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            base64_payload: base64_payload.into(),
        }
    }

    /// Render as `data:<mime>;base64,<payload>`.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_payload)
    }
}

// Payloads run to megabytes; keep debug output readable.
impl fmt::Debug for InlineImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineImage")
            .field("mime_type", &self.mime_type)
            .field("payload_len", &self.base64_payload.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_format() {
        let img = InlineImage::new(NORMALIZED_IMAGE_MIME, "AAAA");
        assert_eq!(img.to_data_uri(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn test_debug_hides_payload() {
        let img = InlineImage::new(NORMALIZED_IMAGE_MIME, "A".repeat(4096));
        let debug = format!("{:?}", img);
        assert!(debug.contains("payload_len: 4096"));
        assert!(!debug.contains("AAAA"));
    }
}
