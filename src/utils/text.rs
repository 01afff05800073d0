/// Shorten `s` to at most `max_chars` characters, appending `...` when cut.
/// Counts chars, not bytes, so multi-byte titles never split mid-codepoint.
#[must_use]
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", s[..idx].trim_end()),
        None => s.to_string(),
    }
}

/// `Some(trimmed)` unless the input is empty or whitespace only.
pub fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
