use once_cell::sync::Lazy;
use regex::Regex;

static HORIZONTAL_WHITESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\S\n]+").expect("HORIZONTAL_WHITESPACE is a valid regex pattern")
});

static NEWLINE_THEN_WHITESPACE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n[^\S\n]+").expect("NEWLINE_THEN_WHITESPACE is a valid regex pattern")
});

static EXCESS_NEWLINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("EXCESS_NEWLINES is a valid regex pattern"));

/// Collapses extraneous whitespace while keeping line and page structure.
///
/// Runs of horizontal whitespace become one space, whitespace at the start of
/// a line is dropped, and blank-line runs are capped at a single blank line.
/// Applying it twice gives the same result as applying it once.
pub fn normalize_whitespace(text: &str) -> String {
    let collapsed = HORIZONTAL_WHITESPACE.replace_all(text, " ");
    let stripped = NEWLINE_THEN_WHITESPACE.replace_all(&collapsed, "\n");
    EXCESS_NEWLINES.replace_all(&stripped, "\n\n").into_owned()
}

/// Cuts `text` down to at most `max_chars` characters. May cut mid-word.
pub fn truncate_content(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedContent {
    pub text: String,
    pub original_chars: usize,
    pub truncated: bool,
}

/// Normalizes then truncates extracted text before it goes to the model.
pub fn prepare_content(text: &str, max_chars: usize) -> PreparedContent {
    let normalized = normalize_whitespace(text);
    let trimmed = normalized.trim();
    let original_chars = trimmed.chars().count();
    let kept = truncate_content(trimmed, max_chars);

    PreparedContent {
        truncated: kept.len() < trimmed.len(),
        text: kept.to_string(),
        original_chars,
    }
}
