//! Shared text utilities for the analyzer and extractor.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// English stop words, lowercased.
pub(crate) fn stopword_set() -> HashSet<String> {
    stop_words::get(stop_words::LANGUAGE::English)
        .into_iter()
        .map(|word| word.to_lowercase())
        .collect()
}

/// Lowercased alphanumeric tokens of `text`, punctuation stripped.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

fn sentence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Runs of non-terminal characters followed by terminal punctuation,
    // plus a trailing fragment without one.
    RE.get_or_init(|| Regex::new(r"[^.!?]*[.!?]+|[^.!?]+$").expect("valid sentence regex"))
}

/// Split text into sentences on terminal punctuation. A trailing fragment
/// without punctuation is kept as its own sentence.
pub(crate) fn split_sentences(text: &str) -> Vec<String> {
    sentence_re()
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
