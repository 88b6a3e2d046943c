const ELLIPSIS: &str = "...";

/// Shorten `text` for display. Longer than `max_length` characters keeps the
/// first `max_length - 1` and appends `...`.
pub fn truncate(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }

    let mut shortened: String = text.chars().take(max_length.saturating_sub(1)).collect();
    shortened.push_str(ELLIPSIS);
    shortened
}
