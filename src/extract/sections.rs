use std::collections::BTreeMap;

use super::keywords::{score_sentence, Fallback, KeywordTable, SectionPolicy};
use super::sentence::{split_sentences, Sentence};
use crate::common::{truncate_chars, SectionKind, Sections};
use crate::config::EngineConfig;

/// Emitted when the text has no usable sentence at all
pub const NOT_ENOUGH_TEXT: &str = "Not enough information in the text to determine this section.";
pub const CITATIONS_UNAVAILABLE: &str = "Citation count unavailable in source metadata.";
const LITERATURE_GENERIC: &str = "The text does not discuss prior or related work explicitly.";

/// Citation note built from metadata rather than text
pub fn citation_note(citation_count: Option<u64>, origin: &str) -> String {
    match citation_count {
        Some(count) => format!("Cited by approximately {} papers ({}).", count, origin),
        None => CITATIONS_UNAVAILABLE.to_string(),
    }
}

/// Keyword-driven extractor producing all eight sections for one text
pub struct SectionExtractor<'a> {
    config: &'a EngineConfig,
}

impl<'a> SectionExtractor<'a> {
    pub fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    pub fn keywords(&self) -> &KeywordTable {
        &self.config.keywords
    }

    /// Extract every section from `text`. Citations come from `citation_count`.
    pub fn extract(&self, text: &str, citation_count: Option<u64>) -> Sections {
        let sentences = split_sentences(text, self.config.sections.min_sentence_tokens);
        let mut map = self.extract_scored(&sentences);

        let insights = self.compose_insights(&map);
        let research_gap = self.compose_research_gap(&map);
        map.insert(SectionKind::Insights, insights);
        map.insert(SectionKind::ResearchGap, research_gap);
        map.insert(SectionKind::Citations, citation_note(citation_count, "source metadata"));

        Sections::from_map(map)
    }

    /// Scored sections with their fallbacks applied. Composed fallbacks run
    /// after every other scored kind so they can read the computed texts.
    fn extract_scored(&self, sentences: &[Sentence<'_>]) -> BTreeMap<SectionKind, String> {
        let table = self.keywords();
        let mut map = BTreeMap::new();
        let mut pending = Vec::new();

        for kind in KeywordTable::SCORED {
            let Some(policy) = table.policy(kind) else {
                continue;
            };
            if let Some(text) = select_top(sentences, policy) {
                map.insert(kind, text);
                continue;
            }
            match &policy.fallback {
                Fallback::Composed => pending.push(kind),
                other => {
                    map.insert(kind, apply_fallback(other, sentences));
                }
            }
        }

        for kind in pending {
            let text = if sentences.is_empty() {
                generic_for(kind).to_string()
            } else {
                self.compose_fallback(kind, &map)
            };
            map.insert(kind, text);
        }

        map
    }

    fn snippet(&self, map: &BTreeMap<SectionKind, String>, kind: SectionKind) -> String {
        map.get(&kind)
            .map(|s| truncate_chars(s.trim(), self.config.sections.snippet_chars))
            .unwrap_or_default()
    }

    fn compose_fallback(&self, kind: SectionKind, map: &BTreeMap<SectionKind, String>) -> String {
        let method = self.snippet(map, SectionKind::MethodUsed);
        let contributions = self.snippet(map, SectionKind::Contributions);
        let limitations = self.snippet(map, SectionKind::Limitations);

        let composed = match kind {
            SectionKind::LiteratureReview if !method.is_empty() || !contributions.is_empty() => Some(format!(
                "No explicit related-work discussion was found. The paper positions itself through its approach: {} \
                 Stated outcome: {}",
                or_generic(&method),
                or_generic(&contributions)
            )),
            SectionKind::MethodUsed if !contributions.is_empty() => Some(format!(
                "The method is not described explicitly; it is implied by the stated outcome: {}",
                contributions
            )),
            SectionKind::Contributions if !method.is_empty() => Some(format!(
                "No contribution is claimed explicitly; the work centres on: {}",
                method
            )),
            SectionKind::Limitations if !contributions.is_empty() => Some(format!(
                "Limitations are not stated; the claimed outcome still needs validation beyond the reported setting: {}",
                contributions
            )),
            SectionKind::FutureWork if !limitations.is_empty() => Some(format!(
                "Future direction inferred from limitations: broader evaluation, robustness on edge cases, and \
                 efficiency for deployment. Limitation context: {}",
                limitations
            )),
            _ => None,
        };

        composed.unwrap_or_else(|| generic_for(kind).to_string())
    }

    fn compose_insights(&self, map: &BTreeMap<SectionKind, String>) -> String {
        format!(
            "This paper targets a concrete problem setting with a focused strategy. Literature context: {} \
             Technical direction: {} Main outcome: {}",
            or_generic(&self.snippet(map, SectionKind::LiteratureReview)),
            or_generic(&self.snippet(map, SectionKind::MethodUsed)),
            or_generic(&self.snippet(map, SectionKind::Contributions)),
        )
    }

    fn compose_research_gap(&self, map: &BTreeMap<SectionKind, String>) -> String {
        format!(
            "Current work leaves a gap between reported results and reliable use in real settings; standardized \
             evaluation and cross-domain studies are needed. Related-work context: {} Observed constraints: {} \
             Forward direction: {}",
            or_generic(&self.snippet(map, SectionKind::LiteratureReview)),
            or_generic(&self.snippet(map, SectionKind::Limitations)),
            or_generic(&self.snippet(map, SectionKind::FutureWork)),
        )
    }
}

fn or_generic(text: &str) -> &str {
    if text.is_empty() {
        NOT_ENOUGH_TEXT
    } else {
        text
    }
}

fn generic_for(kind: SectionKind) -> &'static str {
    match kind {
        SectionKind::LiteratureReview => LITERATURE_GENERIC,
        _ => NOT_ENOUGH_TEXT,
    }
}

/// Top-k positively scored sentences, restored to text order
fn select_top(sentences: &[Sentence<'_>], policy: &SectionPolicy) -> Option<String> {
    let mut scored: Vec<(usize, &Sentence<'_>)> = sentences
        .iter()
        .map(|s| (score_sentence(s.text, &policy.triggers), s))
        .filter(|(score, _)| *score > 0)
        .collect();

    if scored.is_empty() || policy.top_k == 0 {
        return None;
    }

    // Stable: equal scores keep text order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.truncate(policy.top_k);
    scored.sort_by_key(|(_, s)| s.index);

    Some(scored.iter().map(|(_, s)| s.text).collect::<Vec<_>>().join(" "))
}

fn apply_fallback(fallback: &Fallback, sentences: &[Sentence<'_>]) -> String {
    match fallback {
        Fallback::LeadingSentences { count } => {
            if sentences.is_empty() {
                return NOT_ENOUGH_TEXT.to_string();
            }
            let count = (*count).clamp(1, sentences.len());
            sentences[..count].iter().map(|s| s.text).collect::<Vec<_>>().join(" ")
        }
        Fallback::LastSentence => sentences
            .last()
            .map(|s| s.text.to_string())
            .unwrap_or_else(|| NOT_ENOUGH_TEXT.to_string()),
        Fallback::Fixed { text } if !text.trim().is_empty() => text.clone(),
        Fallback::Fixed { .. } | Fallback::Composed => NOT_ENOUGH_TEXT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::keywords::{FUTURE_WORK_FALLBACK, LIMITATIONS_FALLBACK};

    const ABSTRACT: &str = "Large language models are widely deployed in clinical settings. \
        Prior work compared rule-based baselines on small datasets. \
        We propose a retrieval framework that grounds model outputs in guidelines. \
        Our approach improves factual accuracy by a significant margin over the baseline. \
        However, the evaluation is limited to English records and remains costly. \
        In future work we plan to extend the framework to multilingual data.";

    fn extract(text: &str) -> Sections {
        let config = EngineConfig::default();
        SectionExtractor::new(&config).extract(text, None)
    }

    #[test]
    fn test_all_sections_non_empty_for_empty_text() {
        let sections = extract("");
        for (kind, text) in sections.iter() {
            assert!(!text.trim().is_empty(), "section {} is empty", kind);
        }
        assert_eq!(sections.limitations, LIMITATIONS_FALLBACK);
        assert_eq!(sections.future_work, FUTURE_WORK_FALLBACK);
        assert_eq!(sections.method_used, NOT_ENOUGH_TEXT);
        assert_eq!(sections.literature_review, LITERATURE_GENERIC);
        assert_eq!(sections.citations, CITATIONS_UNAVAILABLE);
    }

    #[test]
    fn test_scored_sections_keep_text_order() {
        let sections = extract(ABSTRACT);
        // Both lit-review sentences mention baselines; order follows the text
        assert!(sections
            .literature_review
            .starts_with("Prior work compared rule-based baselines"));
        assert!(sections.future_work.contains("multilingual"));
        assert!(sections.limitations.starts_with("However"));
    }

    #[test]
    fn test_method_top_k_limit() {
        let sections = extract(ABSTRACT);
        let config = EngineConfig::default();
        let count = split_sentences(&sections.method_used, config.sections.min_sentence_tokens).len();
        assert!(count <= config.keywords.method_used.top_k);
        assert!(sections.method_used.contains("We propose a retrieval framework"));
    }

    fn graph_config(top_k: usize) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.keywords.method_used.triggers = vec!["graph".to_string()];
        config.keywords.method_used.top_k = top_k;
        config
    }

    #[test]
    fn test_higher_score_later_sentence_stays_after_earlier() {
        let config = graph_config(2);
        let text = "A graph appears once here. Nothing relevant happens in this one. \
            The graph graph graph sentence scores highest.";
        let sections = SectionExtractor::new(&config).extract(text, None);
        assert_eq!(
            sections.method_used,
            "A graph appears once here. The graph graph graph sentence scores highest."
        );
    }

    #[test]
    fn test_ties_at_cut_keep_earlier_sentence() {
        let config = graph_config(2);
        let text = "First graph sentence here. Second graph sentence here. Third graph graph sentence here.";
        let sections = SectionExtractor::new(&config).extract(text, None);
        assert_eq!(
            sections.method_used,
            "First graph sentence here. Third graph graph sentence here."
        );
        assert!(!sections.method_used.contains("Second"));
    }

    #[test]
    fn test_fallbacks_without_triggers() {
        let text = "Cats sleep most of the day. Dogs prefer long walks outside. Birds sing at dawn.";
        let sections = extract(text);
        assert_eq!(sections.method_used, "Cats sleep most of the day. Dogs prefer long walks outside.");
        assert_eq!(sections.contributions, "Birds sing at dawn.");
        assert_eq!(sections.limitations, LIMITATIONS_FALLBACK);
        assert_eq!(sections.future_work, FUTURE_WORK_FALLBACK);
        assert!(sections.literature_review.contains("Cats sleep most of the day."));
        assert!(sections.literature_review.contains("Birds sing at dawn."));
    }

    #[test]
    fn test_derived_sections_reference_inputs() {
        let sections = extract(ABSTRACT);
        assert!(sections.insights.contains("We propose a retrieval framework"));
        assert!(sections.research_gap.contains("However, the evaluation is limited"));
        assert!(sections.research_gap.contains("multilingual"));
    }

    #[test]
    fn test_citation_note() {
        let config = EngineConfig::default();
        let sections = SectionExtractor::new(&config).extract(ABSTRACT, Some(42));
        assert_eq!(sections.citations, "Cited by approximately 42 papers (source metadata).");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        assert_eq!(extract(ABSTRACT), extract(ABSTRACT));
    }

    #[test]
    fn test_snippets_are_bounded() {
        let mut config = EngineConfig::default();
        config.sections.snippet_chars = 40;
        let sections = SectionExtractor::new(&config).extract(ABSTRACT, None);
        assert!(sections.insights.contains("..."));
        assert!(!sections.insights.contains("grounds model outputs in guidelines"));
    }

    #[test]
    fn test_composed_future_work_from_limitations() {
        let mut config = EngineConfig::default();
        config.keywords.future_work.fallback = Fallback::Composed;
        let text = "We propose a compact model. However, it fails on long inputs and remains costly.";
        let sections = SectionExtractor::new(&config).extract(text, None);
        assert!(sections.future_work.starts_with("Future direction inferred from limitations"));
        assert!(sections.future_work.contains("fails on long inputs"));
    }
}
