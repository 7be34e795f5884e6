//! Completion request/result exchanged with the remote vision client.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::controls::DetailLevel;
use crate::inline_image::InlineImage;

/// Default token budget for single-image panel calls.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// One single-image instruction for the vision model.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CompletionRequest {
    /// Text instruction sent alongside the image
    pub instruction: String,
    /// The only image in the request
    pub image: InlineImage,
    /// Token budget for the response
    pub max_tokens: u32,
    /// Optional detail hint for the image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<DetailLevel>,
}

impl CompletionRequest {
    pub fn new(instruction: impl Into<String>, image: InlineImage) -> Self {
        Self {
            instruction: instruction.into(),
            image,
            max_tokens: DEFAULT_MAX_TOKENS,
            detail: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_detail(mut self, detail: DetailLevel) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Text returned by the vision model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CompletionResult {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_count: Option<u32>,
    /// True when produced by demo mode rather than the remote model
    #[serde(default)]
    pub demo: bool,
}

impl CompletionResult {
    pub fn new(text: impl Into<String>, token_count: Option<u32>) -> Self {
        Self {
            text: text.into(),
            token_count,
            demo: false,
        }
    }

    pub fn demo(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            token_count: None,
            demo: true,
        }
    }
}
