//! Input validation helpers.

/// Maximum length kept from an uploaded file name.
const MAX_FILE_NAME_LENGTH: usize = 128;

/// Maximum accepted chat prompt length in characters.
pub const MAX_PROMPT_LENGTH: usize = 4000;

/// Maximum accepted API key length.
pub const MAX_API_KEY_LENGTH: usize = 512;

/// Validate session ID format (a hyphenated UUID).
pub fn is_valid_session_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok() && id.len() == 36
}

/// Reduce a client-supplied file name to its final component.
///
/// Returns `None` when nothing usable remains.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    if base.is_empty() || base == "." || base == ".." {
        return None;
    }
    let cleaned: String = base
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_FILE_NAME_LENGTH)
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}
