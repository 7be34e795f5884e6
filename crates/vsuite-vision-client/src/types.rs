//! Chat-completions wire types.

use serde::{Deserialize, Serialize};
use vsuite_models::{CompletionRequest, DetailLevel};

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: Vec<ContentPart>,
}

/// One element of a multimodal message.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    ImageUrl { image_url: ImageUrl },
    Text { text: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUrl {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<DetailLevel>,
}

impl ChatCompletionRequest {
    /// Single user message: the image first, then the instruction.
    pub fn from_completion(model: &str, temperature: f32, request: &CompletionRequest) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::ImageUrl {
                        image_url: ImageUrl {
                            url: request.image.to_data_uri(),
                            detail: request.detail,
                        },
                    },
                    ContentPart::Text {
                        text: request.instruction.clone(),
                    },
                ],
            }],
            max_tokens: request.max_tokens,
            temperature,
        }
    }
}

/// Response body. Every field the client reads is optional so that a
/// partial payload surfaces as a malformed-response error instead of a
/// JSON error.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Option<Vec<Choice>>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, if present.
    pub fn first_content(&self) -> Option<&str> {
        self.choices
            .as_ref()?
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
    }

    pub fn total_tokens(&self) -> Option<u32> {
        self.usage.as_ref().and_then(|u| u.total_tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vsuite_models::InlineImage;

    #[test]
    fn test_request_body_shape() {
        let request = CompletionRequest::new("Describe this frame in detail.", InlineImage::new("image/png", "AAAA"))
            .with_max_tokens(500)
            .with_detail(DetailLevel::Low);
        let body = ChatCompletionRequest::from_completion("glm-4v", 0.7, &request);

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "glm-4v");
        assert_eq!(value["max_tokens"], 500);
        let content = &value["messages"][0]["content"];
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(
            content[0],
            json!({"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA", "detail": "low"}})
        );
        assert_eq!(
            content[1],
            json!({"type": "text", "text": "Describe this frame in detail."})
        );
    }

    #[test]
    fn test_detail_omitted_when_unset() {
        let request = CompletionRequest::new("hi", InlineImage::new("image/png", "AAAA"));
        let value = serde_json::to_value(ChatCompletionRequest::from_completion("m", 0.1, &request)).unwrap();
        assert!(value["messages"][0]["content"][0]["image_url"].get("detail").is_none());
    }

    #[test]
    fn test_response_accessors() {
        let resp: ChatCompletionResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "a cat"}}],
            "usage": {"prompt_tokens": 3, "total_tokens": 12}
        }))
        .unwrap();
        assert_eq!(resp.first_content(), Some("a cat"));
        assert_eq!(resp.total_tokens(), Some(12));

        let empty: ChatCompletionResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert_eq!(empty.first_content(), None);
        assert_eq!(empty.total_tokens(), None);

        let null_content: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert_eq!(null_content.first_content(), None);
    }
}
