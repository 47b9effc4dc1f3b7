use serde::{Deserialize, Serialize};

use crate::common::SectionKind;

/// What to emit for a scored section when no sentence matches its triggers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fallback {
    /// The first `count` sentences of the text
    LeadingSentences { count: usize },
    /// The final sentence of the text
    LastSentence,
    /// A constant sentence
    Fixed { text: String },
    /// A template over sections computed from the same text
    Composed,
}

/// Trigger phrases, selection size and fallback for one scored section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionPolicy {
    pub triggers: Vec<String>,
    pub top_k: usize,
    pub fallback: Fallback,
}

impl SectionPolicy {
    fn new(triggers: &[&str], top_k: usize, fallback: Fallback) -> Self {
        Self {
            triggers: triggers.iter().map(|t| t.to_lowercase()).collect(),
            top_k,
            fallback,
        }
    }
}

pub const LIMITATIONS_FALLBACK: &str = "Not explicitly stated in the text; practical constraints and edge-case \
behavior require a deeper full-text review.";
pub const FUTURE_WORK_FALLBACK: &str = "Future work is not explicitly stated in the text.";

/// Heuristic vocabulary for the five scored sections.
///
/// Insights, research gap and citations are never scored: the first two are
/// composed from scored sections, the last comes from metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTable {
    pub literature_review: SectionPolicy,
    pub method_used: SectionPolicy,
    pub contributions: SectionPolicy,
    pub limitations: SectionPolicy,
    pub future_work: SectionPolicy,
}

impl KeywordTable {
    /// Scored kinds in extraction order
    pub const SCORED: [SectionKind; 5] = [
        SectionKind::MethodUsed,
        SectionKind::Contributions,
        SectionKind::Limitations,
        SectionKind::FutureWork,
        SectionKind::LiteratureReview,
    ];

    pub fn policy(&self, kind: SectionKind) -> Option<&SectionPolicy> {
        match kind {
            SectionKind::LiteratureReview => Some(&self.literature_review),
            SectionKind::MethodUsed => Some(&self.method_used),
            SectionKind::Contributions => Some(&self.contributions),
            SectionKind::Limitations => Some(&self.limitations),
            SectionKind::FutureWork => Some(&self.future_work),
            SectionKind::Insights | SectionKind::Citations | SectionKind::ResearchGap => None,
        }
    }
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            literature_review: SectionPolicy::new(
                &[
                    "related work",
                    "previous work",
                    "prior work",
                    "existing methods",
                    "state-of-the-art",
                    "literature",
                    "baseline",
                    "compared",
                ],
                2,
                Fallback::Composed,
            ),
            method_used: SectionPolicy::new(
                &[
                    "we propose",
                    "our approach",
                    "method",
                    "framework",
                    "architecture",
                    "algorithm",
                    "model",
                    "training",
                    "dataset",
                    "evaluation",
                    "experiment",
                ],
                3,
                Fallback::LeadingSentences { count: 2 },
            ),
            contributions: SectionPolicy::new(
                &[
                    "contribution",
                    "we introduce",
                    "we present",
                    "novel",
                    "new",
                    "first",
                    "outperform",
                    "improve",
                    "significant",
                ],
                2,
                Fallback::LastSentence,
            ),
            limitations: SectionPolicy::new(
                &[
                    "limitation",
                    "however",
                    "challenge",
                    "constraint",
                    "drawback",
                    "cannot",
                    "fails",
                    "costly",
                    "expensive",
                    "still difficult",
                ],
                2,
                Fallback::Fixed {
                    text: LIMITATIONS_FALLBACK.to_string(),
                },
            ),
            future_work: SectionPolicy::new(
                &[
                    "future work",
                    "in future",
                    "further work",
                    "next step",
                    "can be extended",
                    "promising direction",
                ],
                2,
                Fallback::Fixed {
                    text: FUTURE_WORK_FALLBACK.to_string(),
                },
            ),
        }
    }
}

/// Total number of trigger occurrences in the sentence (case-insensitive,
/// repeated occurrences each count)
pub fn score_sentence(sentence: &str, triggers: &[String]) -> usize {
    let lower = sentence.to_lowercase();
    triggers
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| lower.matches(t.to_lowercase().as_str()).count())
        .sum()
}
