//! Client for the remote vision-language model.
//!
//! Sends one image plus one instruction to an OpenAI-compatible
//! `chat/completions` endpoint (Zhipu AI GLM-4V by default). When no
//! credential is configured the client answers with fixed demo text and
//! never touches the network.

pub mod client;
pub mod config;
pub mod demo;
pub mod error;
pub mod types;

pub use client::{VisionBackend, VisionClient};
pub use config::VisionClientConfig;
pub use demo::DEMO_MODE_TEXT;
pub use error::{VisionError, VisionResult};
pub use types::{ChatCompletionRequest, ChatCompletionResponse};
