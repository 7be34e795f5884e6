//! Single-image panel operations.
//!
//! Each operation returns display strings and never fails: a missing image,
//! a missing credential and a remote failure all map to readable text.

use serde::Serialize;
use std::sync::Arc;
use vsuite_media::encode_asset;
use vsuite_models::{
    CompletionRequest, Credential, DetailLevel, InlineImage, MediaAsset, OcrLanguage, SearchType,
};
use vsuite_vision_client::VisionBackend;

use crate::config::PipelineConfig;
use crate::logging::RunLogger;
use crate::{complete_recorded, demo, error_text, MISSING_IMAGE_MESSAGE};

/// Default chat question when the user leaves the prompt empty.
pub const DEFAULT_CHAT_PROMPT: &str = "What do you see in this image?";

const OBJECTS_DISABLED: &str = "Object detection disabled.";
const NO_QUERY: &str = "No search query generated.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeOutput {
    pub scene: String,
    pub objects: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OcrOutput {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOutput {
    pub query: String,
    pub results: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatOutput {
    pub response: String,
    pub usage: String,
}

/// Image analysis, OCR, search query generation and chat.
#[derive(Clone)]
pub struct ImagePanels {
    backend: Arc<dyn VisionBackend>,
    config: PipelineConfig,
}

impl ImagePanels {
    pub fn new(backend: Arc<dyn VisionBackend>, config: PipelineConfig) -> Self {
        Self { backend, config }
    }

    /// Encode the image, or produce the text to show instead.
    fn prepare(&self, image: Option<&MediaAsset>, logger: &RunLogger) -> Result<InlineImage, String> {
        let image = image.ok_or_else(|| MISSING_IMAGE_MESSAGE.to_string())?;
        encode_asset(image).map_err(|e| {
            logger.log_error(&format!("Failed to encode image: {}", e));
            error_text(&e)
        })
    }

    /// Describe the scene and, optionally, list the objects in it.
    pub async fn analyze_image(
        &self,
        image: Option<&MediaAsset>,
        detail: DetailLevel,
        detect_objects: bool,
        credential: Option<&Credential>,
    ) -> AnalyzeOutput {
        let logger = RunLogger::new("analyze_image");

        if image.is_none() {
            return AnalyzeOutput {
                scene: MISSING_IMAGE_MESSAGE.to_string(),
                objects: String::new(),
            };
        }
        let Some(credential) = credential else {
            return AnalyzeOutput {
                scene: demo::analyze_scene(detail),
                objects: if detect_objects {
                    demo::analyze_objects()
                } else {
                    OBJECTS_DISABLED.to_string()
                },
            };
        };
        let inline = match self.prepare(image, &logger) {
            Ok(inline) => inline,
            Err(text) => {
                return AnalyzeOutput {
                    scene: text,
                    objects: String::new(),
                }
            }
        };

        logger.log_start(&format!("detail={} detect_objects={}", detail, detect_objects));

        let scene_request = CompletionRequest::new(scene_instruction(detail), inline.clone())
            .with_max_tokens(self.config.panel_max_tokens)
            .with_detail(detail);
        let scene = self.text_or_error("analyze_scene", credential, &scene_request, &logger).await;

        let objects = if detect_objects {
            let request = CompletionRequest::new(OBJECTS_INSTRUCTION, inline)
                .with_max_tokens(self.config.panel_max_tokens)
                .with_detail(detail);
            self.text_or_error("detect_objects", credential, &request, &logger).await
        } else {
            OBJECTS_DISABLED.to_string()
        };

        logger.log_completion("image analysed");
        AnalyzeOutput { scene, objects }
    }

    /// Extract the text visible in the image.
    pub async fn extract_text(
        &self,
        image: Option<&MediaAsset>,
        language: OcrLanguage,
        preserve_format: bool,
        credential: Option<&Credential>,
    ) -> OcrOutput {
        let logger = RunLogger::new("extract_text");

        if image.is_none() {
            return OcrOutput {
                text: MISSING_IMAGE_MESSAGE.to_string(),
            };
        }
        let Some(credential) = credential else {
            return OcrOutput {
                text: demo::ocr(language),
            };
        };
        let inline = match self.prepare(image, &logger) {
            Ok(inline) => inline,
            Err(text) => return OcrOutput { text },
        };

        logger.log_start(&format!("language={} preserve_format={}", language, preserve_format));
        let request = CompletionRequest::new(ocr_instruction(language, preserve_format), inline)
            .with_max_tokens(self.config.panel_max_tokens)
            .with_detail(DetailLevel::High);
        let text = self.text_or_error("extract_text", credential, &request, &logger).await;
        logger.log_completion("text extracted");

        OcrOutput { text }
    }

    /// Ask the model for search queries describing the image.
    ///
    /// The first query becomes the primary query; the rest are listed as
    /// related searches.
    pub async fn vision_search(
        &self,
        image: Option<&MediaAsset>,
        search_type: SearchType,
        max_results: u32,
        credential: Option<&Credential>,
    ) -> SearchOutput {
        let logger = RunLogger::new("vision_search");

        let Some(asset) = image else {
            return SearchOutput {
                query: MISSING_IMAGE_MESSAGE.to_string(),
                results: String::new(),
            };
        };
        let Some(credential) = credential else {
            return SearchOutput {
                query: demo::search_query(asset.file_name()),
                results: demo::search_results(search_type, max_results),
            };
        };
        let inline = match self.prepare(image, &logger) {
            Ok(inline) => inline,
            Err(text) => {
                return SearchOutput {
                    query: text,
                    results: String::new(),
                }
            }
        };

        logger.log_start(&format!("search_type={} max_results={}", search_type, max_results));
        let request = CompletionRequest::new(search_instruction(search_type, max_results), inline)
            .with_max_tokens(self.config.panel_max_tokens);

        let output = match complete_recorded(self.backend.as_ref(), "vision_search", Some(credential), &request)
            .await
        {
            Ok(result) => {
                let queries = parse_queries(&result.text, max_results);
                format_search(search_type, &queries)
            }
            Err(e) => {
                logger.log_error(&e.to_string());
                SearchOutput {
                    query: error_text(&e),
                    results: String::new(),
                }
            }
        };
        logger.log_completion("search queries generated");

        output
    }

    /// Answer a free-form question about the image.
    pub async fn vision_chat(
        &self,
        image: Option<&MediaAsset>,
        prompt: &str,
        credential: Option<&Credential>,
    ) -> ChatOutput {
        let logger = RunLogger::new("vision_chat");

        if image.is_none() {
            return ChatOutput {
                response: MISSING_IMAGE_MESSAGE.to_string(),
                usage: String::new(),
            };
        }
        let prompt = match prompt.trim() {
            "" => DEFAULT_CHAT_PROMPT,
            p => p,
        };
        let Some(credential) = credential else {
            return ChatOutput {
                response: demo::chat(prompt),
                usage: demo::CHAT_USAGE.to_string(),
            };
        };
        let inline = match self.prepare(image, &logger) {
            Ok(inline) => inline,
            Err(text) => {
                return ChatOutput {
                    response: text,
                    usage: String::new(),
                }
            }
        };

        logger.log_start("chat question received");
        let request = CompletionRequest::new(prompt, inline).with_max_tokens(self.config.panel_max_tokens);

        let output = match complete_recorded(self.backend.as_ref(), "vision_chat", Some(credential), &request)
            .await
        {
            Ok(result) => ChatOutput {
                response: result.text,
                usage: match result.token_count {
                    Some(n) => format!("Tokens: {}", n),
                    None => "Tokens: unknown".to_string(),
                },
            },
            Err(e) => {
                logger.log_error(&e.to_string());
                ChatOutput {
                    response: error_text(&e),
                    usage: String::new(),
                }
            }
        };
        logger.log_completion("chat answered");

        output
    }

    async fn text_or_error(
        &self,
        task: &'static str,
        credential: &Credential,
        request: &CompletionRequest,
        logger: &RunLogger,
    ) -> String {
        match complete_recorded(self.backend.as_ref(), task, Some(credential), request).await {
            Ok(result) => result.text,
            Err(e) => {
                logger.log_error(&format!("{}: {}", task, e));
                error_text(&e)
            }
        }
    }
}

const OBJECTS_INSTRUCTION: &str = "List every distinct object you can see in this image, \
one per line, with a short note on where it appears.";

fn scene_instruction(detail: DetailLevel) -> String {
    let depth = match detail {
        DetailLevel::Low => "Give a brief, one-paragraph description of this image.",
        DetailLevel::High => {
            "Describe this image in detail. Cover the setting, the main subjects and what they \
             are doing, and the colours and mood."
        }
        DetailLevel::Auto => "Describe this image, choosing an appropriate level of detail.",
    };
    depth.to_string()
}

fn ocr_instruction(language: OcrLanguage, preserve_format: bool) -> String {
    let mut instruction = match language {
        OcrLanguage::Auto => "Extract all text visible in this image.".to_string(),
        lang => format!("Extract all {} text visible in this image.", lang.display_name()),
    };
    if preserve_format {
        instruction.push_str(" Preserve the original line breaks and layout.");
    } else {
        instruction.push_str(" Return the text as plain running text.");
    }
    instruction.push_str(" If there is no text, reply with \"No text found.\"");
    instruction
}

fn search_instruction(search_type: SearchType, max_results: u32) -> String {
    let goal = match search_type {
        SearchType::Web => "web search queries that would find information about what this image shows",
        SearchType::Products => "shopping search queries that would find the products shown in this image",
        SearchType::Similar => "image search queries that would find visually similar images",
    };
    format!(
        "Write up to {} concise {}. Reply with one query per line and nothing else, most relevant first.",
        max_results, goal
    )
}

/// Split a model reply into at most `max` clean queries.
fn parse_queries(reply: &str, max: u32) -> Vec<String> {
    reply
        .lines()
        .map(|line| strip_list_marker(line.trim()).trim_matches('"').trim().to_string())
        .filter(|q| !q.is_empty())
        .take(max as usize)
        .collect()
}

/// Drop a leading `1.`, `2)`, `-`, `*` or bullet.
fn strip_list_marker(line: &str) -> &str {
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            return rest.trim_start();
        }
    }
    line.strip_prefix(['-', '*', '\u{2022}'])
        .map(str::trim_start)
        .unwrap_or(line)
}

fn format_search(search_type: SearchType, queries: &[String]) -> SearchOutput {
    let Some((primary, rest)) = queries.split_first() else {
        return SearchOutput {
            query: NO_QUERY.to_string(),
            results: String::new(),
        };
    };

    let mut results = format!("Search type: {}\n", search_type);
    if rest.is_empty() {
        results.push_str("\nNo related searches.");
    } else {
        results.push_str("\nRelated searches:\n");
        for (i, q) in rest.iter().enumerate() {
            results.push_str(&format!("{}. {}\n", i + 1, q));
        }
    }

    SearchOutput {
        query: primary.clone(),
        results: results.trim_end().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{key, png_asset, StubBackend};
    use vsuite_models::CompletionResult;

    fn panels(backend: Arc<StubBackend>) -> ImagePanels {
        ImagePanels::new(backend, PipelineConfig::default())
    }

    #[tokio::test]
    async fn test_analyze_without_credential_is_demo() {
        let backend = Arc::new(StubBackend::always("unused", 1));
        let out = panels(backend.clone())
            .analyze_image(Some(&png_asset()), DetailLevel::High, true, None)
            .await;

        assert!(out.scene.contains("Demo Mode"));
        assert!(out.objects.contains("Demo Mode"));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_image_message() {
        let backend = Arc::new(StubBackend::always("unused", 1));
        let panels = panels(backend.clone());
        let creds = key();

        let out = panels.analyze_image(None, DetailLevel::High, true, Some(&creds)).await;
        assert_eq!(out.scene, "Please upload an image.");
        let out = panels.extract_text(None, OcrLanguage::Auto, true, Some(&creds)).await;
        assert_eq!(out.text, "Please upload an image.");
        let out = panels.vision_chat(None, "hi", None).await;
        assert_eq!(out.response, "Please upload an image.");
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_analyze_makes_scene_and_object_calls() {
        let backend = Arc::new(StubBackend::from_fn(|n, _| {
            let text = if n == 0 { "a beach at sunset" } else { "umbrella\nchair" };
            Ok(CompletionResult::new(text, Some(20)))
        }));
        let out = panels(backend.clone())
            .analyze_image(Some(&png_asset()), DetailLevel::Low, true, Some(&key()))
            .await;

        assert_eq!(out.scene, "a beach at sunset");
        assert_eq!(out.objects, "umbrella\nchair");

        let requests = backend.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].detail, Some(DetailLevel::Low));
        assert_eq!(requests[0].image.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_analyze_without_object_detection() {
        let backend = Arc::new(StubBackend::always("scene", 5));
        let out = panels(backend.clone())
            .analyze_image(Some(&png_asset()), DetailLevel::High, false, Some(&key()))
            .await;

        assert_eq!(out.objects, "Object detection disabled.");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_remote_failure_becomes_error_text() {
        let backend = Arc::new(StubBackend::status(500));
        let out = panels(backend)
            .extract_text(Some(&png_asset()), OcrLanguage::English, true, Some(&key()))
            .await;

        assert!(out.text.starts_with("Error: "), "{}", out.text);
        assert!(out.text.contains("500"));
    }

    #[tokio::test]
    async fn test_undecodable_image_becomes_error_text() {
        let backend = Arc::new(StubBackend::always("unused", 1));
        let garbage = MediaAsset::from_bytes(b"not a png".to_vec(), Some("x.png".into()));
        let out = panels(backend.clone())
            .vision_chat(Some(&garbage), "what?", Some(&key()))
            .await;

        assert!(out.response.starts_with("Error: "));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_ocr_instruction_carries_language() {
        let backend = Arc::new(StubBackend::always("HELLO", 3));
        let out = panels(backend.clone())
            .extract_text(Some(&png_asset()), OcrLanguage::Japanese, false, Some(&key()))
            .await;

        assert_eq!(out.text, "HELLO");
        let requests = backend.requests.lock().unwrap();
        assert!(requests[0].instruction.contains("Japanese"));
        assert!(requests[0].instruction.contains("plain running text"));
    }

    #[tokio::test]
    async fn test_search_splits_primary_query() {
        let backend = Arc::new(StubBackend::always(
            "1. red running shoes\n2. \"nike air zoom\"\n\n- trail sneakers\n4. extra",
            30,
        ));
        let out = panels(backend.clone())
            .vision_search(Some(&png_asset()), SearchType::Products, 3, Some(&key()))
            .await;

        assert_eq!(out.query, "red running shoes");
        assert!(out.results.contains("1. nike air zoom"));
        assert!(out.results.contains("2. trail sneakers"));
        assert!(!out.results.contains("extra"));
        assert!(backend.requests.lock().unwrap()[0].instruction.contains("up to 3"));
    }

    #[tokio::test]
    async fn test_search_demo_uses_file_name() {
        let backend = Arc::new(StubBackend::always("unused", 1));
        let out = panels(backend)
            .vision_search(Some(&png_asset()), SearchType::Web, 5, None)
            .await;

        assert_eq!(out.query, "Visual search query for: cat.png");
        assert!(out.results.contains("Demo Mode"));
    }

    #[tokio::test]
    async fn test_chat_defaults_prompt_and_reports_usage() {
        let backend = Arc::new(StubBackend::always("A red square.", 57));
        let out = panels(backend.clone())
            .vision_chat(Some(&png_asset()), "   ", Some(&key()))
            .await;

        assert_eq!(out.response, "A red square.");
        assert_eq!(out.usage, "Tokens: 57");
        assert_eq!(
            backend.requests.lock().unwrap()[0].instruction,
            DEFAULT_CHAT_PROMPT
        );
    }

    #[tokio::test]
    async fn test_chat_demo_usage() {
        let backend = Arc::new(StubBackend::always("unused", 1));
        let out = panels(backend)
            .vision_chat(Some(&png_asset()), "", None)
            .await;

        assert!(out.response.contains(DEFAULT_CHAT_PROMPT));
        assert_eq!(out.usage, "Tokens: ~100 (demo mode)");
    }

    #[test]
    fn test_parse_queries_caps_and_cleans() {
        let queries = parse_queries("* one\n2) two\n\n  three  ", 2);
        assert_eq!(queries, vec!["one", "two"]);
        assert_eq!(parse_queries("4k monitor", 1), vec!["4k monitor"]);
        assert!(parse_queries("\n \n", 5).is_empty());
    }

    #[test]
    fn test_format_search_without_queries() {
        let out = format_search(SearchType::Web, &[]);
        assert_eq!(out.query, "No search query generated.");
    }
}
