//! Reconciliation of locally extracted metadata against an external
//! bibliographic authority.

pub mod authority;
pub mod error;
pub mod matcher;
mod provenance;
pub mod retry;
pub mod title;

pub use authority::{Candidate, MetadataAuthority, SemanticScholarAuthority};
pub use error::AuthorityError;
pub use matcher::{
    best_candidate, merge_candidate, EnrichmentMatcher, EnrichmentOutcome, LocalRecord, MatchInfo, MatchStep,
    ScoredCandidate, TitleOrigin,
};
pub use provenance::Provenance;
pub use retry::{call_with_retry, AttemptState, RetryOutcome, RetryPolicy};
pub use title::{content_fallback_title, filename_title, normalize_query_title, title_overlap_score};
