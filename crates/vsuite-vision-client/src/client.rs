//! Vision API HTTP client.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use vsuite_models::{CompletionRequest, CompletionResult, Credential};

use crate::config::VisionClientConfig;
use crate::demo::DEMO_MODE_TEXT;
use crate::error::{VisionError, VisionResult};
use crate::types::{ChatCompletionRequest, ChatCompletionResponse};

/// Anything that can answer a single-image completion.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    /// Complete `request`. Without a credential, returns demo text and makes
    /// no network call.
    async fn complete(
        &self,
        credential: Option<&Credential>,
        request: &CompletionRequest,
    ) -> VisionResult<CompletionResult>;
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct VisionClient {
    http: Client,
    config: VisionClientConfig,
}

impl VisionClient {
    /// Create a new vision client.
    pub fn new(config: VisionClientConfig) -> VisionResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(VisionError::Network)?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &VisionClientConfig {
        &self.config
    }

    async fn send(
        &self,
        credential: &Credential,
        request: &CompletionRequest,
    ) -> VisionResult<CompletionResult> {
        let url = self.config.completions_url();
        let body =
            ChatCompletionRequest::from_completion(&self.config.model, self.config.temperature, request);

        debug!(
            url = %url,
            model = %self.config.model,
            max_tokens = request.max_tokens,
            "Sending vision completion request"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(credential.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Vision API returned an error status");
            return Err(VisionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| self.map_transport(e))?;
        let parsed: ChatCompletionResponse = serde_json::from_slice(&bytes)
            .map_err(|e| VisionError::malformed(format!("invalid JSON body: {}", e)))?;

        let text = parsed
            .first_content()
            .ok_or_else(|| VisionError::malformed("response has no choice with message content"))?
            .to_string();

        Ok(CompletionResult::new(text, parsed.total_tokens()))
    }

    fn map_transport(&self, e: reqwest::Error) -> VisionError {
        if e.is_timeout() {
            VisionError::Timeout(self.config.timeout.as_secs())
        } else {
            VisionError::Network(e)
        }
    }
}

#[async_trait]
impl VisionBackend for VisionClient {
    async fn complete(
        &self,
        credential: Option<&Credential>,
        request: &CompletionRequest,
    ) -> VisionResult<CompletionResult> {
        match credential {
            None => {
                debug!("No credential configured, returning demo response");
                Ok(CompletionResult::demo(DEMO_MODE_TEXT))
            }
            Some(credential) => self.send(credential, request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use vsuite_models::InlineImage;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> VisionClient {
        VisionClient::new(VisionClientConfig::default().with_base_url(server.uri())).unwrap()
    }

    fn request() -> CompletionRequest {
        CompletionRequest::new("What is this?", InlineImage::new("image/png", "iVBORw0KGgo="))
    }

    fn key() -> Credential {
        Credential::from_input(Some("test-key")).unwrap()
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(json!({"model": "glm-4v", "max_tokens": 1024})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "A cat on a sofa."}}],
                "usage": {"total_tokens": 42}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = client_for(&server).complete(Some(&key()), &request()).await.unwrap();
        assert_eq!(result.text, "A cat on a sofa.");
        assert_eq!(result.token_count, Some(42));
        assert!(!result.demo);
    }

    #[tokio::test]
    async fn test_missing_usage_is_allowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "ok"}}]
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).complete(Some(&key()), &request()).await.unwrap();
        assert_eq!(result.text, "ok");
        assert_eq!(result.token_count, None);
    }

    #[tokio::test]
    async fn test_no_credential_returns_demo_without_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let result = client_for(&server).complete(None, &request()).await.unwrap();
        assert!(result.demo);
        assert!(result.text.contains("Demo Mode"));
        assert!(result.text.contains("ZAI_API_KEY"));
    }

    #[tokio::test]
    async fn test_server_error_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let err = client_for(&server).complete(Some(&key()), &request()).await.unwrap_err();
        match err {
            VisionError::Status { status, ref body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_choices_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "x"})))
            .mount(&server)
            .await;

        let err = client_for(&server).complete(Some(&key()), &request()).await.unwrap_err();
        assert!(matches!(err, VisionError::MalformedResponse(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server).complete(Some(&key()), &request()).await.unwrap_err();
        assert!(matches!(err, VisionError::MalformedResponse(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"choices": [{"message": {"content": "late"}}]}))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let config = VisionClientConfig::default()
            .with_base_url(server.uri())
            .with_timeout(Duration::from_millis(200));
        let client = VisionClient::new(config).unwrap();

        let err = client.complete(Some(&key()), &request()).await.unwrap_err();
        assert!(matches!(err, VisionError::Timeout(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let config = VisionClientConfig::default().with_base_url("http://127.0.0.1:1");
        let client = VisionClient::new(config).unwrap();

        let err = client.complete(Some(&key()), &request()).await.unwrap_err();
        assert!(matches!(err, VisionError::Network(_)), "{err:?}");
    }
}
