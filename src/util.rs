use std::path::Path;

/// Grouping key for a file path: the final suffix including its dot, or `""`.
pub fn extension_key(path: &str) -> String {
    Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default()
}

/// The last `limit` characters of `text`.
pub fn tail_chars(text: &str, limit: usize) -> &str {
    let count = text.chars().count();
    if count <= limit {
        return text;
    }
    let start = text
        .char_indices()
        .nth(count - limit)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    &text[start..]
}
