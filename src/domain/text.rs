/// Marker appended to text that was cut down to its length limit.
pub const ELLIPSIS: &str = "...";

/// Normalize user-supplied text for display on a card.
///
/// Whitespace runs collapse to a single space and the ends are trimmed. A
/// missing value, or one that is empty after normalization, yields
/// `fallback`. Text longer than `max_len` characters is cut so that the
/// result is exactly `max_len` characters, the last three being `...`.
pub fn sanitize_text(value: Option<&str>, fallback: &str, max_len: usize) -> String {
    let Some(value) = value else {
        return fallback.to_string();
    };

    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return fallback.to_string();
    }

    if normalized.chars().count() <= max_len {
        return normalized;
    }

    let keep = max_len.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = normalized.chars().take(keep).collect();
    truncated.extend(ELLIPSIS.chars().take(max_len - keep));
    truncated
}
