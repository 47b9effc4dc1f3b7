use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::time::Duration;

use super::Paper;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Format an elapsed duration as "1h 02m 03s", "2m 05s" or "4.21s"
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs >= 3600 {
        format!("{}h {:02}m {:02}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {:02}s", secs / 60, secs % 60)
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}

/// Replace NULs and collapse every whitespace run to a single space
pub fn normalize_whitespace(text: &str) -> String {
    let text = text.replace('\0', " ");
    WHITESPACE_RUN.replace_all(&text, " ").trim().to_string()
}

/// Identity key for a paper title: lowercase, whitespace collapsed,
/// everything except ASCII letters, digits and spaces removed
pub fn normalize_title(title: &str) -> String {
    let lowered = title.to_lowercase();
    let collapsed = WHITESPACE_RUN.replace_all(lowered.trim(), " ");
    collapsed
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect()
}

/// Drop later papers whose normalized title was already seen
pub fn dedupe_by_title(papers: Vec<Paper>) -> (Vec<Paper>, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut kept = Vec::with_capacity(papers.len());
    let mut removed = 0;

    for paper in papers {
        if seen.insert(normalize_title(&paper.title)) {
            kept.push(paper);
        } else {
            removed += 1;
        }
    }

    (kept, removed)
}

/// Keep papers whose year falls inside the inclusive range.
/// With any bound set, papers of unknown year are excluded.
pub fn filter_by_year(
    papers: Vec<Paper>,
    start_year: Option<i32>,
    end_year: Option<i32>,
) -> (Vec<Paper>, usize) {
    if start_year.is_none() && end_year.is_none() {
        return (papers, 0);
    }

    let before = papers.len();
    let kept: Vec<Paper> = papers
        .into_iter()
        .filter(|paper| match paper.year {
            None => false,
            Some(year) => {
                start_year.map_or(true, |start| year >= start) && end_year.map_or(true, |end| year <= end)
            }
        })
        .collect();

    let removed = before - kept.len();
    (kept, removed)
}

/// Truncate to at most `max_chars` characters, appending "..." when cut
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let cut: String = text.chars().take(keep).collect();
    format!("{}...", cut.trim_end())
}

/// Prefix of at most `max_chars` characters, without an ellipsis
pub fn char_prefix(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::PaperSource;

    fn paper(title: &str, year: Option<i32>) -> Paper {
        let mut p = Paper::new(title, "", PaperSource::Arxiv);
        p.year = year;
        p
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(4210)), "4.21s");
        assert_eq!(format_elapsed(Duration::from_secs(125)), "2m 05s");
        assert_eq!(format_elapsed(Duration::from_secs(3723)), "1h 02m 03s");
    }

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("LLMs in Healthcare"), "llms in healthcare");
        assert_eq!(normalize_title("  llms   in healthcare!!"), "llms in healthcare");
        assert_eq!(normalize_title("BERT: Pre-training"), "bert pretraining");
    }

    #[test]
    fn test_dedupe_keeps_first_seen() {
        let mut first = paper("LLMs in Healthcare", Some(2023));
        first.abstract_text = "first".to_string();
        let mut second = paper("llms   in healthcare!!", Some(2024));
        second.abstract_text = "second".to_string();

        let (kept, removed) = dedupe_by_title(vec![first, second, paper("Other", None)]);
        assert_eq!(kept.len(), 2);
        assert_eq!(removed, 1);
        assert_eq!(kept[0].abstract_text, "first");
        assert_eq!(kept[1].title, "Other");
    }

    #[test]
    fn test_filter_by_year_inclusive_range() {
        let papers = vec![
            paper("a", Some(2019)),
            paper("b", None),
            paper("c", Some(2021)),
            paper("d", Some(2022)),
            paper("e", Some(2020)),
        ];
        let (kept, removed) = filter_by_year(papers, Some(2020), Some(2022));
        let titles: Vec<&str> = kept.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["c", "d", "e"]);
        assert_eq!(removed, 2);
    }

    #[test]
    fn test_filter_by_year_without_bounds_keeps_unknown() {
        let (kept, removed) = filter_by_year(vec![paper("a", None)], None, None);
        assert_eq!(kept.len(), 1);
        assert_eq!(removed, 0);
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("abcdefghij", 6), "abc...");
        assert_eq!(truncate_chars("ééééé", 4), "é...");
    }

    #[test]
    fn test_char_prefix_respects_boundaries() {
        assert_eq!(char_prefix("héllo", 2), "hé");
        assert_eq!(char_prefix("hi", 10), "hi");
    }
}
