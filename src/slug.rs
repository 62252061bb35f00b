//! File-name slugs for document titles.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid slug regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Turn a title into a lowercase, dash-separated slug.
///
/// Letters outside ASCII are kept (after NFC normalization), punctuation is
/// dropped.
///
/// ```
/// assert_eq!(unnotion::slugify("Hello, World!"), "hello-world");
/// ```
pub fn slugify(title: &str) -> String {
    let normalized: String = title.nfc().collect::<String>().to_lowercase();
    let cleaned = DISALLOWED.replace_all(&normalized, "");
    WHITESPACE.replace_all(cleaned.trim(), "-").into_owned()
}
