//! Engine configuration.
//!
//! Every tunable of the heuristics lives here. The configuration is built
//! once (defaults, optionally overridden from a JSON file) and passed by
//! shared reference into each component; nothing mutates it afterwards.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;

use crate::extract::KeywordTable;
use crate::stopwords::{ENGLISH_STOP_WORDS, THEME_STOP_WORDS};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub keywords: KeywordTable,
    pub sections: SectionConfig,
    pub synthesis: SynthesisConfig,
    pub graph: GraphConfig,
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Fragments with fewer tokens are not treated as sentences
    pub min_sentence_tokens: usize,
    /// Cap on the normalized document text analysed in document mode
    pub max_document_chars: usize,
    /// Bound on each section text interpolated into a template
    pub snippet_chars: usize,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            min_sentence_tokens: 3,
            max_document_chars: 25_000,
            snippet_chars: 280,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    pub top_terms: usize,
    pub finding_papers: usize,
    pub gap_papers: usize,
    pub excerpt_chars: usize,
    pub stop_words: BTreeSet<String>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            top_terms: 12,
            finding_papers: 5,
            gap_papers: 3,
            excerpt_chars: 320,
            stop_words: THEME_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub max_features: usize,
    pub similarity_threshold: f64,
    /// Weight of the sequential chain added when no pair is similar enough
    pub placeholder_weight: f64,
    pub layout_seed: u64,
    pub layout_iterations: usize,
    /// Numerator of the optimal node distance `spacing / sqrt(n)`
    pub layout_spacing: f64,
    pub stop_words: BTreeSet<String>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_features: 1200,
            similarity_threshold: 0.12,
            placeholder_weight: 0.05,
            layout_seed: 42,
            layout_iterations: 50,
            layout_spacing: 1.5,
            stop_words: ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    pub base_url: String,
    /// Minimum title overlap score for a candidate to be accepted
    pub accept_threshold: f64,
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub attempt_timeout_secs: u64,
    pub search_limit: usize,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.semanticscholar.org/graph/v1".to_string(),
            accept_threshold: 0.5,
            max_attempts: 3,
            base_delay_ms: 600,
            attempt_timeout_secs: 14,
            search_limit: 5,
        }
    }
}

impl EnrichmentConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }
}

impl EngineConfig {
    /// Load a JSON configuration file; absent keys keep their defaults
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values outside the ranges the heuristics assume
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.graph.similarity_threshold) {
            anyhow::bail!(
                "graph.similarity_threshold must be within [0, 1], got {}",
                self.graph.similarity_threshold
            );
        }
        if !(0.0..=1.0).contains(&self.graph.placeholder_weight) {
            anyhow::bail!(
                "graph.placeholder_weight must be within [0, 1], got {}",
                self.graph.placeholder_weight
            );
        }
        if !(0.0..=1.0).contains(&self.enrichment.accept_threshold) {
            anyhow::bail!(
                "enrichment.accept_threshold must be within [0, 1], got {}",
                self.enrichment.accept_threshold
            );
        }
        if self.enrichment.max_attempts == 0 {
            anyhow::bail!("enrichment.max_attempts must be at least 1");
        }
        if self.graph.max_features == 0 {
            anyhow::bail!("graph.max_features must be at least 1");
        }
        if !(self.graph.layout_spacing.is_finite() && self.graph.layout_spacing > 0.0) {
            anyhow::bail!(
                "graph.layout_spacing must be a positive number, got {}",
                self.graph.layout_spacing
            );
        }
        Ok(())
    }
}
