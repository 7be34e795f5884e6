//! Placeholder text returned when no credential is configured.

/// Returned by [`VisionClient::complete`](crate::VisionClient) without a credential.
pub const DEMO_MODE_TEXT: &str = "Demo Mode: no API key is configured, so no request was sent to the vision model.

With a valid key this would return the model's answer for your image.

To enable real AI analysis:
1. Get an API key at https://open.bigmodel.cn/
2. Set it: export ZAI_API_KEY=\"your-key-here\"
3. Restart the server, or create a session with your key";
