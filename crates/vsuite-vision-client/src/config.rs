//! Vision client configuration.

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";
pub const DEFAULT_MODEL: &str = "glm-4v";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Configuration for [`VisionClient`](crate::VisionClient).
#[derive(Debug, Clone)]
pub struct VisionClientConfig {
    /// Base URL; `/chat/completions` is appended
    pub base_url: String,
    /// Model identifier sent in every request
    pub model: String,
    /// Round-trip timeout
    pub timeout: Duration,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for VisionClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl VisionClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("ZAI_BASE_URL")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("ZAI_MODEL_VISION")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout: Duration::from_secs(
                std::env::var("ZAI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            temperature: std::env::var("ZAI_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TEMPERATURE),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = VisionClientConfig::default();
        assert_eq!(config.base_url, "https://open.bigmodel.cn/api/paas/v4");
        assert_eq!(config.model, "glm-4v");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_completions_url_trims_trailing_slash() {
        let config = VisionClientConfig::default().with_base_url("http://localhost:9000/v4/");
        assert_eq!(config.completions_url(), "http://localhost:9000/v4/chat/completions");
    }
}
