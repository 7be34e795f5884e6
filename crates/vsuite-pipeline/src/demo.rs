//! Demo-mode placeholders for each panel.
//!
//! Returned instead of calling the remote model when no API key is set.
//! Every text contains "Demo Mode".

use vsuite_models::{DetailLevel, FrameCount, OcrLanguage, SearchType};

const SETUP: &str = "To enable real AI analysis:
1. Get an API key at https://open.bigmodel.cn/
2. Set it: export ZAI_API_KEY=\"your-key-here\"
3. Restart the server, or create a session with your key";

/// Token usage line shown by the chat panel in demo mode.
pub const CHAT_USAGE: &str = "Tokens: ~100 (demo mode)";

pub fn analyze_scene(detail: DetailLevel) -> String {
    format!(
        "Scene Analysis ({detail} detail) - Demo Mode

This is a demonstration response. With a valid API key this would provide:
- A detailed scene description at {detail} detail level
- The main subjects and their spatial relationships
- Colour palette and mood

{SETUP}"
    )
}

pub fn analyze_objects() -> String {
    "Detected Objects - Demo Mode\n\nObjects would be listed here when an API key is configured."
        .to_string()
}

pub fn ocr(language: OcrLanguage) -> String {
    format!(
        "OCR Result ({} language) - Demo Mode

This is simulated OCR output. With a valid API key this would extract the
text visible in your image, keeping its layout when formatting is preserved.

{SETUP}",
        language.display_name()
    )
}

pub fn search_query(file_name: Option<&str>) -> String {
    match file_name {
        Some(name) => format!("Visual search query for: {}", name),
        None => "Visual search query for uploaded image".to_string(),
    }
}

pub fn search_results(search_type: SearchType, max_results: u32) -> String {
    format!(
        "Search Results (Demo Mode)

Type: {search_type}
Max results: {max_results}

With a valid API key the model would look at the image and propose search
queries suited to {search_type} search.

{SETUP}"
    )
}

pub fn chat(prompt: &str) -> String {
    format!(
        "Demo Mode response to: \"{prompt}\"

This is a simulated answer. With a valid API key the model would answer your
question about the image.

{SETUP}"
    )
}

pub fn video(requested: FrameCount) -> String {
    format!(
        "Video Analysis - Demo Mode

With a valid API key this would sample up to {requested} evenly spaced frames
from your video and describe each one.

{SETUP}"
    )
}
