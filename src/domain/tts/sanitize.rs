use regex::Regex;
use std::sync::OnceLock;

pub const MIN_TEXT_CHARS: usize = 3;
pub const MAX_TEXT_CHARS: usize = 1000;

/// Arabic (U+0600..U+06FF) and Arabic Supplement (U+0750..U+077F) plus whitespace
fn non_arabic_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[^\x{0600}-\x{06FF}\x{0750}-\x{077F}\s]").expect("valid arabic filter pattern")
    })
}

fn whitespace_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Strip everything outside the Arabic script ranges, collapse whitespace runs
/// to a single space and trim the result.
pub fn sanitize_arabic_text(text: &str) -> String {
    let arabic_only = non_arabic_pattern().replace_all(text, "");
    let normalized = whitespace_pattern().replace_all(&arabic_only, " ");
    normalized.trim().to_string()
}

/// Length in characters, which is what the limits are expressed in
pub fn char_count(text: &str) -> usize {
    text.chars().count()
}

pub fn is_within_limits(text: &str) -> bool {
    (MIN_TEXT_CHARS..=MAX_TEXT_CHARS).contains(&char_count(text))
}
