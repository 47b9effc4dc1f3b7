use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Sentence-ending punctuation followed by whitespace
    static ref SENTENCE_BOUNDARY: Regex = Regex::new(r"[.!?]\s+").unwrap();
}

/// A sentence borrowed from the source text with its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sentence<'a> {
    pub index: usize,
    pub text: &'a str,
}

/// Split text into sentences, dropping fragments with fewer than
/// `min_tokens` whitespace-separated tokens. Indices are assigned after
/// filtering, so they are contiguous.
pub fn split_sentences(text: &str, min_tokens: usize) -> Vec<Sentence<'_>> {
    let mut fragments: Vec<&str> = Vec::new();
    let mut start = 0;

    for boundary in SENTENCE_BOUNDARY.find_iter(text) {
        // The punctuation mark is a single ASCII byte
        let end = boundary.start() + 1;
        fragments.push(&text[start..end]);
        start = boundary.end();
    }
    if start < text.len() {
        fragments.push(&text[start..]);
    }

    fragments
        .into_iter()
        .map(str::trim)
        .filter(|f| !f.is_empty() && f.split_whitespace().count() >= min_tokens)
        .enumerate()
        .map(|(index, text)| Sentence { index, text })
        .collect()
}
