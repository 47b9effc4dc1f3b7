use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Where a paper record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaperSource {
    #[serde(rename = "arXiv", alias = "arxiv")]
    Arxiv,
    #[serde(rename = "Semantic Scholar", alias = "semantic_scholar")]
    SemanticScholar,
    #[serde(rename = "Uploaded", alias = "uploaded")]
    Uploaded,
}

impl PaperSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaperSource::Arxiv => "arXiv",
            PaperSource::SemanticScholar => "Semantic Scholar",
            PaperSource::Uploaded => "Uploaded",
        }
    }
}

impl fmt::Display for PaperSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Treat empty or whitespace-only strings as unknown
fn non_empty<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}

/// A single paper record as handed over by a retrieval or parsing collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
    pub source: PaperSource,
    #[serde(default, deserialize_with = "non_empty")]
    pub paper_url: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub pdf_url: Option<String>,
    #[serde(default, deserialize_with = "non_empty")]
    pub venue: Option<String>,
    #[serde(default, alias = "citations")]
    pub citation_count: Option<u64>,
    #[serde(default, deserialize_with = "non_empty")]
    pub doi: Option<String>,
}

impl Paper {
    /// Minimal record with every optional field unknown
    pub fn new(title: &str, abstract_text: &str, source: PaperSource) -> Self {
        Self {
            title: title.to_string(),
            abstract_text: abstract_text.to_string(),
            authors: Vec::new(),
            year: None,
            source,
            paper_url: None,
            pdf_url: None,
            venue: None,
            citation_count: None,
            doi: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }
}

/// The eight analytical fields produced for every paper
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Insights,
    LiteratureReview,
    MethodUsed,
    Contributions,
    Limitations,
    FutureWork,
    Citations,
    ResearchGap,
}

impl SectionKind {
    pub const ALL: [SectionKind; 8] = [
        SectionKind::Insights,
        SectionKind::LiteratureReview,
        SectionKind::MethodUsed,
        SectionKind::Contributions,
        SectionKind::Limitations,
        SectionKind::FutureWork,
        SectionKind::Citations,
        SectionKind::ResearchGap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Insights => "insights",
            SectionKind::LiteratureReview => "literature_review",
            SectionKind::MethodUsed => "method_used",
            SectionKind::Contributions => "contributions",
            SectionKind::Limitations => "limitations",
            SectionKind::FutureWork => "future_work",
            SectionKind::Citations => "citations",
            SectionKind::ResearchGap => "research_gap",
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// All eight section texts of one paper. Every field is always populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sections {
    pub insights: String,
    pub literature_review: String,
    pub method_used: String,
    pub contributions: String,
    pub limitations: String,
    pub future_work: String,
    pub citations: String,
    pub research_gap: String,
}

impl Sections {
    /// Build from a keyed map. A missing kind is a programming error.
    pub fn from_map(mut map: BTreeMap<SectionKind, String>) -> Self {
        let mut take = |kind: SectionKind| -> String {
            map.remove(&kind)
                .unwrap_or_else(|| panic!("section map is missing mandatory section '{}'", kind))
        };
        Self {
            insights: take(SectionKind::Insights),
            literature_review: take(SectionKind::LiteratureReview),
            method_used: take(SectionKind::MethodUsed),
            contributions: take(SectionKind::Contributions),
            limitations: take(SectionKind::Limitations),
            future_work: take(SectionKind::FutureWork),
            citations: take(SectionKind::Citations),
            research_gap: take(SectionKind::ResearchGap),
        }
    }

    pub fn get(&self, kind: SectionKind) -> &str {
        match kind {
            SectionKind::Insights => &self.insights,
            SectionKind::LiteratureReview => &self.literature_review,
            SectionKind::MethodUsed => &self.method_used,
            SectionKind::Contributions => &self.contributions,
            SectionKind::Limitations => &self.limitations,
            SectionKind::FutureWork => &self.future_work,
            SectionKind::Citations => &self.citations,
            SectionKind::ResearchGap => &self.research_gap,
        }
    }

    pub fn get_mut(&mut self, kind: SectionKind) -> &mut String {
        match kind {
            SectionKind::Insights => &mut self.insights,
            SectionKind::LiteratureReview => &mut self.literature_review,
            SectionKind::MethodUsed => &mut self.method_used,
            SectionKind::Contributions => &mut self.contributions,
            SectionKind::Limitations => &mut self.limitations,
            SectionKind::FutureWork => &mut self.future_work,
            SectionKind::Citations => &mut self.citations,
            SectionKind::ResearchGap => &mut self.research_gap,
        }
    }

    /// Iterate over (kind, text) pairs in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (SectionKind, &str)> + '_ {
        SectionKind::ALL.iter().map(move |kind| (*kind, self.get(*kind)))
    }
}

/// One paper plus its extracted sections
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperAnalysis {
    pub paper: Paper,
    #[serde(flatten)]
    pub sections: Sections,
}

/// Statistics from the corpus workflow
#[derive(Debug, Clone, Default, Serialize)]
pub struct CorpusStats {
    pub papers_read: usize,
    pub outside_year_range: usize,
    pub duplicates_removed: usize,
    pub truncated: usize,
    pub papers_analyzed: usize,
    pub similarity_edges: usize,
    pub placeholder_edges: usize,
}
