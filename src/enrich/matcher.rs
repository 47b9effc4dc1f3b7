use log::{debug, info};
use serde::Serialize;

use super::authority::{Candidate, MetadataAuthority};
use super::provenance::Provenance;
use super::retry::{call_with_retry, RetryPolicy};
use super::title::{content_fallback_title, filename_title, normalize_query_title, title_overlap_score, title_tokens};
use crate::common::Paper;
use crate::config::EnrichmentConfig;

/// Which lookup produced the accepted candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStep {
    Doi,
    Title,
    ContentTitle,
    FilenameTitle,
}

impl MatchStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStep::Doi => "doi",
            MatchStep::Title => "title",
            MatchStep::ContentTitle => "content_title",
            MatchStep::FilenameTitle => "filename_title",
        }
    }
}

impl std::fmt::Display for MatchStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A candidate with its title overlap against the local record
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub score: f64,
}

/// Details of an accepted match
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchInfo {
    pub step: MatchStep,
    pub query: String,
    pub score: f64,
}

/// How the local record obtained its title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleOrigin {
    /// Supplied with the record by a parser or retrieval source
    Metadata,
    /// Guessed from a line of the document body
    Inferred,
    /// Derived from the uploaded file name
    Filename,
    /// Nothing usable was found
    Placeholder,
}

impl TitleOrigin {
    /// Titles that were only guessed give way to the authority's title
    fn is_guess(self) -> bool {
        !matches!(self, TitleOrigin::Metadata)
    }
}

/// A locally extracted paper and where its title came from
#[derive(Debug, Clone, PartialEq)]
pub struct LocalRecord {
    pub paper: Paper,
    pub title_origin: TitleOrigin,
}

impl LocalRecord {
    pub fn new(paper: Paper, title_origin: TitleOrigin) -> Self {
        Self { paper, title_origin }
    }

    /// Title candidates are scored against, when it names the paper at all
    fn reference_title(&self) -> Option<&str> {
        if self.title_origin == TitleOrigin::Placeholder || title_tokens(&self.paper.title).is_empty() {
            None
        } else {
            Some(self.paper.title.as_str())
        }
    }

    /// Title a DOI hit must agree with; only supplied titles are checked
    fn identifier_check_title(&self) -> Option<&str> {
        self.reference_title().filter(|_| !self.title_origin.is_guess())
    }
}

/// Result of enrichment. Always produced, failures end as `LocalOnly`.
#[derive(Debug, Clone)]
pub struct EnrichmentOutcome {
    pub paper: Paper,
    pub provenance: Provenance,
    pub matched: Option<MatchInfo>,
}

/// Best-scoring candidate (first on ties) if it reaches `threshold`
pub fn best_candidate(local_title: &str, candidates: &[Candidate], threshold: f64) -> Option<ScoredCandidate> {
    let mut best: Option<ScoredCandidate> = None;
    for candidate in candidates {
        let score = title_overlap_score(local_title, &candidate.title);
        if best.as_ref().map_or(true, |b| score > b.score) {
            best = Some(ScoredCandidate {
                candidate: candidate.clone(),
                score,
            });
        }
    }
    best.filter(|b| b.score >= threshold)
}

/// New record with every locally unknown field taken from the candidate
pub fn merge_candidate(local: &Paper, candidate: &Candidate) -> Paper {
    let mut merged = local.clone();
    if merged.title.trim().is_empty() && !candidate.title.is_empty() {
        merged.title = candidate.title.clone();
    }
    if merged.authors.is_empty() {
        merged.authors = candidate.authors.clone();
    }
    if merged.year.is_none() {
        merged.year = candidate.year;
    }
    if merged.venue.is_none() {
        merged.venue = candidate.venue.clone();
    }
    if merged.paper_url.is_none() {
        merged.paper_url = candidate.paper_url.clone();
    }
    if merged.pdf_url.is_none() {
        merged.pdf_url = candidate.pdf_url.clone();
    }
    if merged.citation_count.is_none() {
        merged.citation_count = candidate.citation_count;
    }
    if merged.doi.is_none() {
        merged.doi = candidate.doi.clone();
    }
    merged
}

/// Reconciles a locally analysed paper against a metadata authority
pub struct EnrichmentMatcher<'a> {
    authority: &'a dyn MetadataAuthority,
    policy: RetryPolicy,
    accept_threshold: f64,
    search_limit: usize,
}

impl<'a> EnrichmentMatcher<'a> {
    pub fn new(authority: &'a dyn MetadataAuthority, config: &EnrichmentConfig) -> Self {
        Self {
            authority,
            policy: RetryPolicy::from_config(config),
            accept_threshold: config.accept_threshold,
            search_limit: config.search_limit.max(1),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Title queries in lookup order, empty and repeated ones removed
    fn title_queries(&self, record: &LocalRecord, raw_text: &str, filename: Option<&str>) -> Vec<(MatchStep, String)> {
        let candidates = [
            (MatchStep::Title, record.reference_title().map(normalize_query_title)),
            (MatchStep::ContentTitle, content_fallback_title(raw_text)),
            (MatchStep::FilenameTitle, filename.and_then(filename_title)),
        ];

        let mut seen: Vec<String> = Vec::new();
        let mut queries = Vec::new();
        for (step, query) in candidates {
            let Some(query) = query.filter(|q| !q.is_empty()) else {
                continue;
            };
            let key = query.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            queries.push((step, query));
        }
        queries
    }

    async fn try_doi(&self, record: &LocalRecord, doi: &str) -> Option<(ScoredCandidate, MatchInfo)> {
        let outcome = call_with_retry(&self.policy, "DOI lookup", || self.authority.lookup_doi(doi)).await;
        let candidates = outcome.result.ok()?;

        // Without a supplied title the identifier alone decides
        let Some(title) = record.identifier_check_title() else {
            let candidate = candidates.into_iter().next()?;
            let scored = ScoredCandidate { candidate, score: 1.0 };
            let info = MatchInfo {
                step: MatchStep::Doi,
                query: doi.to_string(),
                score: 1.0,
            };
            return Some((scored, info));
        };

        let scored = best_candidate(title, &candidates, self.accept_threshold)?;
        let info = MatchInfo {
            step: MatchStep::Doi,
            query: doi.to_string(),
            score: scored.score,
        };
        Some((scored, info))
    }

    async fn try_title(
        &self,
        record: &LocalRecord,
        step: MatchStep,
        query: &str,
    ) -> Option<(ScoredCandidate, MatchInfo)> {
        let outcome = call_with_retry(&self.policy, "title search", || {
            self.authority.search_title(query, self.search_limit)
        })
        .await;
        let candidates = outcome.result.ok()?;

        // Score against the local title when there is one, else the query
        let reference = record.reference_title().unwrap_or(query);
        let scored = best_candidate(reference, &candidates, self.accept_threshold)?;
        let info = MatchInfo {
            step,
            query: query.to_string(),
            score: scored.score,
        };
        Some((scored, info))
    }

    /// Walk DOI, title, content title and filename title until a candidate
    /// is accepted. Never fails: exhaustion yields the local record.
    pub async fn enrich(&self, record: &LocalRecord, raw_text: &str, filename: Option<&str>) -> EnrichmentOutcome {
        let paper = &record.paper;
        let mut accepted = None;

        if let Some(doi) = paper.doi.as_deref().filter(|d| !d.trim().is_empty()) {
            debug!("Enrichment step {}: {}", MatchStep::Doi, doi);
            accepted = self.try_doi(record, doi).await;
        }

        if accepted.is_none() {
            for (step, query) in self.title_queries(record, raw_text, filename) {
                debug!("Enrichment step {}: {}", step, query);
                accepted = self.try_title(record, step, &query).await;
                if accepted.is_some() {
                    break;
                }
            }
        }

        match accepted {
            Some((scored, info)) => {
                info!(
                    "Accepted '{}' via {} (score {:.2})",
                    scored.candidate.title, info.step, info.score
                );
                let mut merged = merge_candidate(paper, &scored.candidate);
                if record.title_origin.is_guess() && !scored.candidate.title.trim().is_empty() {
                    merged.title = scored.candidate.title.clone();
                }
                EnrichmentOutcome {
                    paper: merged,
                    provenance: Provenance::Enriched,
                    matched: Some(info),
                }
            }
            None => {
                info!("No metadata match accepted for '{}'", paper.title);
                EnrichmentOutcome {
                    paper: paper.clone(),
                    provenance: Provenance::LocalOnly,
                    matched: None,
                }
            }
        }
    }
}
