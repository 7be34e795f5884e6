//! Pipeline configuration.

use std::path::PathBuf;

/// Instruction sent with every sampled video frame.
pub const FRAME_INSTRUCTION: &str = "Describe this frame in detail.";

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Instruction for each video frame
    pub frame_instruction: String,
    /// Token budget per video frame
    pub frame_max_tokens: u32,
    /// Token budget per image panel call
    pub panel_max_tokens: u32,
    /// Parent directory for frame artifacts; system temp dir when unset
    pub work_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            frame_instruction: FRAME_INSTRUCTION.to_string(),
            frame_max_tokens: 500,
            panel_max_tokens: 1024,
            work_dir: None,
        }
    }
}

impl PipelineConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            frame_instruction: defaults.frame_instruction,
            frame_max_tokens: std::env::var("PIPELINE_FRAME_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.frame_max_tokens),
            panel_max_tokens: std::env::var("PIPELINE_PANEL_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.panel_max_tokens),
            work_dir: std::env::var("PIPELINE_WORK_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}
