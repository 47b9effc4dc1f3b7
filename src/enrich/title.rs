use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::path::Path;

use crate::common::{char_prefix, normalize_whitespace};
use crate::extract::{infer_title, split_sentences};

lazy_static! {
    static ref TITLE_TOKEN: Regex = Regex::new(r"[a-z0-9]+").unwrap();
}

const SURROUNDING_PUNCTUATION: &[char] = &[' ', '-', '_', ':', ';', ',', '.'];

/// Title as sent to a title search: trimmed, whitespace collapsed,
/// surrounding punctuation stripped
pub fn normalize_query_title(title: &str) -> String {
    normalize_whitespace(title)
        .trim_matches(SURROUNDING_PUNCTUATION)
        .to_string()
}

/// Lowercase alphanumeric word set of a title
pub fn title_tokens(title: &str) -> HashSet<String> {
    let lower = title.to_lowercase();
    TITLE_TOKEN
        .find_iter(&lower)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Jaccard overlap of the two titles' word sets, in [0, 1]
pub fn title_overlap_score(left: &str, right: &str) -> f64 {
    let a = title_tokens(left);
    let b = title_tokens(right);
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(&b).count();
    let union = a.union(&b).count();
    intersection as f64 / union as f64
}

/// Search title derived from the document body: the inferred title when it
/// has at least four words, else the first reasonably sized early sentence
pub fn content_fallback_title(raw_text: &str) -> Option<String> {
    if let Some(title) = infer_title(raw_text) {
        if title.split_whitespace().count() >= 4 {
            return Some(normalize_query_title(&title));
        }
    }

    let normalized = normalize_whitespace(raw_text);
    split_sentences(char_prefix(&normalized, 1_200), 1)
        .into_iter()
        .map(|s| s.text.trim())
        .find(|s| (20..=220).contains(&s.chars().count()) && s.split_whitespace().count() >= 5)
        .map(normalize_query_title)
}

/// Title guessed from an uploaded file name: extension dropped,
/// underscores and hyphens read as spaces
pub fn filename_title(filename: &str) -> Option<String> {
    let stem = Path::new(filename).file_stem()?.to_string_lossy();
    let spaced = stem.replace(['_', '-'], " ");
    let title = normalize_query_title(&spaced);
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_titles_score_one() {
        let score = title_overlap_score("Attention Is All You Need", "attention is all you need");
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_partial_overlap_is_low() {
        let score = title_overlap_score("Attention Is All You Need", "Attention Mechanisms Survey");
        assert!((score - 1.0 / 7.0).abs() < 1e-12);
        assert!(score < 0.5);
    }

    #[test]
    fn test_empty_title_scores_zero() {
        assert_eq!(title_overlap_score("", "Anything at all"), 0.0);
        assert_eq!(title_overlap_score("!!", "??"), 0.0);
    }

    #[test]
    fn test_normalize_query_title() {
        assert_eq!(normalize_query_title("  Deep   Learning:  "), "Deep Learning");
        assert_eq!(normalize_query_title("-- A Title. "), "A Title");
    }

    #[test]
    fn test_filename_title() {
        assert_eq!(
            filename_title("graph_neural-networks.pdf").as_deref(),
            Some("graph neural networks")
        );
        assert_eq!(filename_title("dir/my_paper.txt").as_deref(), Some("my paper"));
        assert_eq!(filename_title("___.md"), None);
    }

    #[test]
    fn test_content_fallback_prefers_long_inferred_title() {
        let text = "Sparse Attention for Long Documents\nSome body text follows here.";
        assert_eq!(
            content_fallback_title(text).as_deref(),
            Some("Sparse Attention for Long Documents")
        );
    }

    #[test]
    fn test_content_fallback_uses_first_sentence() {
        let text = "Short Title Here\nWe present a compact parser for scanned invoices. It is fast.";
        assert_eq!(
            content_fallback_title(text).as_deref(),
            Some("Short Title Here We present a compact parser for scanned invoices")
        );
    }
}
