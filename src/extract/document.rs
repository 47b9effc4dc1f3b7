//! Single-document mode: analysis of one uploaded paper's full text.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};

use super::sections::SectionExtractor;
use super::sentence::split_sentences;
use crate::common::{char_prefix, normalize_whitespace, truncate_chars, SectionKind, Sections};
use crate::config::EngineConfig;

/// Longest text collected below a detected heading
const HEADING_SECTION_MAX_CHARS: usize = 2_200;
/// Collection stops once this many characters were gathered
const HEADING_COLLECT_LIMIT: usize = 2_600;

lazy_static! {
    static ref LEADING_NUMBERING: Regex = Regex::new(r"^\d+(\.\d+)*\.?\s*").unwrap();
    static ref HEADING_LIKE: Regex = Regex::new(r"^(\d+(\.\d+)*\.?)?\s*[A-Z][A-Za-z0-9\s\-]{2,50}$").unwrap();
    static ref REFERENCE_MARKER: Regex = Regex::new(r"\[\d+\]").unwrap();
    static ref HYPHEN_BREAK: Regex = Regex::new(r"(\w)-\s+(\w)").unwrap();
    static ref URL: Regex = Regex::new(r"https?://\S+").unwrap();
    static ref DOI_TOKEN: Regex = Regex::new(r"(?i)\bdoi:\s*\S+").unwrap();
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_WORD: Regex = Regex::new(r"\W+").unwrap();
    static ref BOILERPLATE: Regex =
        Regex::new(r"(?i)(open access|the author\(s\)|\bcopyright\b|all rights reserved)").unwrap();
    static ref JOURNAL_FRAGMENT: Regex = Regex::new(r"\b[a-z]+\s*\(\d{4}\)\s*\d+:\d+\b").unwrap();
    static ref ABSTRACT_WORD: Regex = Regex::new(r"\babstract\b").unwrap();
    static ref YEAR: Regex = Regex::new(r"\b(?:19|20)\d{2}\b").unwrap();
    static ref AUTHOR_SPLIT: Regex = Regex::new(r",| and ").unwrap();
    static ref HEADING_PATTERNS: Vec<(HeadingKind, Regex)> = vec![
        (
            HeadingKind::Section(SectionKind::LiteratureReview),
            Regex::new(r"^(related work|literature review|background)\s*[:\-]?$").unwrap(),
        ),
        (
            HeadingKind::Section(SectionKind::MethodUsed),
            Regex::new(r"^(methods?|methodology|approach|framework|experimental setup)\s*[:\-]?$").unwrap(),
        ),
        (
            HeadingKind::Section(SectionKind::Contributions),
            Regex::new(r"^(contributions?|main contributions?)\s*[:\-]?$").unwrap(),
        ),
        (
            HeadingKind::Section(SectionKind::Limitations),
            Regex::new(r"^(limitations?|threats to validity|discussion)\s*[:\-]?$").unwrap(),
        ),
        (
            HeadingKind::Section(SectionKind::FutureWork),
            Regex::new(r"^(future work|conclusions? and future work)\s*[:\-]?$").unwrap(),
        ),
        (
            HeadingKind::References,
            Regex::new(r"^(references|bibliography)\s*[:\-]?$").unwrap(),
        ),
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum HeadingKind {
    Section(SectionKind),
    References,
}

/// Sections of one document plus what was detected about its references
#[derive(Debug, Clone)]
pub struct DocumentExtraction {
    /// All eight sections; `citations` holds the reference-detection note
    pub sections: Sections,
    pub reference_note: String,
}

/// Analyse a whole document: scored extraction over the capped normalized
/// text, overridden by sections found under recognised headings
pub fn extract_document(raw_text: &str, config: &EngineConfig) -> DocumentExtraction {
    let normalized_text = normalize_whitespace(raw_text);
    let content = char_prefix(&normalized_text, config.sections.max_document_chars);

    let mut sections = SectionExtractor::new(config).extract(content, None);
    let headings = sections_by_heading(raw_text);

    for kind in [
        SectionKind::LiteratureReview,
        SectionKind::MethodUsed,
        SectionKind::Contributions,
        SectionKind::Limitations,
        SectionKind::FutureWork,
    ] {
        if let Some(text) = headings.get(&HeadingKind::Section(kind)) {
            *sections.get_mut(kind) = text.clone();
        }
    }

    let reference_note = reference_note(&normalized_text, headings.get(&HeadingKind::References));
    sections.citations = reference_note.clone();

    for kind in SectionKind::ALL {
        if kind == SectionKind::Citations {
            continue;
        }
        let (max_sentences, max_chars) = section_limits(kind);
        let cleaned = clean_section_text(sections.get(kind), max_sentences, max_chars);
        if !cleaned.is_empty() {
            *sections.get_mut(kind) = cleaned;
        }
    }

    DocumentExtraction {
        sections,
        reference_note,
    }
}

fn section_limits(kind: SectionKind) -> (usize, usize) {
    match kind {
        SectionKind::Insights => (5, 900),
        SectionKind::ResearchGap => (4, 900),
        _ => (4, 780),
    }
}

fn sections_by_heading(raw_text: &str) -> BTreeMap<HeadingKind, String> {
    let lines: Vec<&str> = raw_text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let lowered: Vec<String> = lines
        .iter()
        .map(|l| LEADING_NUMBERING.replace(&l.to_lowercase(), "").trim().to_string())
        .collect();

    let mut collected = BTreeMap::new();
    for (kind, pattern) in HEADING_PATTERNS.iter() {
        let Some(idx) = lowered.iter().position(|l| pattern.is_match(l)) else {
            continue;
        };
        let text = collect_until_next_heading(&lines[idx + 1..]);
        if !text.is_empty() {
            collected.insert(*kind, char_prefix(&text, HEADING_SECTION_MAX_CHARS).to_string());
        }
    }
    collected
}

fn collect_until_next_heading(lines: &[&str]) -> String {
    let mut chunks: Vec<&str> = Vec::new();
    let mut length = 0;
    for line in lines {
        if HEADING_LIKE.is_match(line) && chunks.len() > 4 {
            break;
        }
        chunks.push(line);
        length += line.len() + 1;
        if length > HEADING_COLLECT_LIMIT {
            break;
        }
    }
    chunks.join(" ").trim().to_string()
}

fn distinct_markers(text: &str) -> usize {
    REFERENCE_MARKER
        .find_iter(text)
        .map(|m| m.as_str())
        .collect::<HashSet<_>>()
        .len()
}

fn reference_note(text: &str, references_section: Option<&String>) -> String {
    if let Some(section) = references_section {
        let count = distinct_markers(section);
        if count > 0 {
            return format!("References section detected with at least {} indexed citations.", count);
        }
        return "References section detected in uploaded paper.".to_string();
    }
    let count = distinct_markers(text);
    if count > 0 {
        return format!("Detected at least {} indexed citations in the document.", count);
    }
    "Citations not clearly identifiable from extracted text.".to_string()
}

fn is_noisy_sentence(sentence: &str) -> bool {
    let lower = sentence.to_lowercase();
    if sentence.chars().count() < 40 {
        return true;
    }
    if lower.contains("doi.org") || BOILERPLATE.is_match(&lower) {
        return true;
    }
    if JOURNAL_FRAGMENT.is_match(&lower) {
        return true;
    }
    if ABSTRACT_WORD.is_match(&lower) && sentence.matches(',').count() > 5 {
        return true;
    }
    let alpha = sentence.chars().filter(|c| c.is_alphabetic()).count();
    let digits = sentence.chars().filter(|c| c.is_ascii_digit()).count();
    alpha > 0 && digits as f64 / alpha as f64 > 0.30
}

/// Strip extraction debris and keep at most `max_sentences` distinct,
/// non-noisy sentences within `max_chars`
pub fn clean_section_text(text: &str, max_sentences: usize, max_chars: usize) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let cleaned = text.replace('\0', " ");
    let cleaned = HYPHEN_BREAK.replace_all(&cleaned, "$1$2");
    let cleaned = URL.replace_all(&cleaned, " ");
    let cleaned = DOI_TOKEN.replace_all(&cleaned, " ");
    let cleaned = WHITESPACE_RUN.replace_all(&cleaned, " ").trim().to_string();

    let mut selected: Vec<&str> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for sentence in split_sentences(&cleaned, 1) {
        let candidate = sentence.text.trim_matches(|c| c == ' ' || c == '-');
        if candidate.is_empty() || is_noisy_sentence(candidate) {
            continue;
        }
        let norm = NON_WORD.replace_all(&candidate.to_lowercase(), "").to_string();
        if norm.is_empty() || !seen.insert(norm) {
            continue;
        }
        selected.push(candidate);
        if selected.len() >= max_sentences {
            break;
        }
    }

    let result = if selected.is_empty() {
        let stripped = BOILERPLATE.replace_all(&cleaned, " ");
        WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
    } else {
        selected.join(" ")
    };

    truncate_chars(&result, max_chars)
}

/// First plausible title line near the top of the document
pub fn infer_title(raw_text: &str) -> Option<String> {
    raw_text.lines().take(20).map(str::trim).find_map(|line| {
        let len = line.chars().count();
        let lower = line.to_lowercase();
        if (15..=180).contains(&len) && !lower.starts_with("abstract") && !lower.starts_with("introduction") {
            Some(line.to_string())
        } else {
            None
        }
    })
}

/// Author names from a comma / "and" separated line just below the title
pub fn infer_authors(raw_text: &str) -> Vec<String> {
    let lines: Vec<&str> = raw_text
        .lines()
        .take(40)
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    for line in lines.iter().skip(1).take(7) {
        if line.contains('@') || line.chars().count() >= 150 {
            continue;
        }
        let lower = line.to_lowercase();
        if !(lower.contains(',') || lower.contains(" and ")) {
            continue;
        }
        let candidates: Vec<String> = AUTHOR_SPLIT
            .split(line)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if (1..=8).contains(&candidates.len()) {
            return candidates;
        }
    }
    Vec::new()
}

/// First four-digit year between 1900 and 2100 near the start of the text
pub fn infer_year(text: &str) -> Option<i32> {
    YEAR.find_iter(char_prefix(text, 6_000))
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .find(|y| (1900..=2100).contains(y))
}
