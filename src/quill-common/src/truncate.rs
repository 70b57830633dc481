//! Text truncation and session-title derivation.

/// Maximum length of an auto-generated session title.
const TITLE_MAX_CHARS: usize = 50;

/// Truncate a string to at most `max_chars` characters, ellipsis included.
///
/// Operates on character boundaries, never byte offsets.
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Derive a session title from the first user message.
pub fn session_title(content: &str) -> String {
    let content = content.trim().replace('\n', " ");
    if content.is_empty() {
        return "Untitled session".to_string();
    }
    truncate_chars(&content, TITLE_MAX_CHARS)
}
