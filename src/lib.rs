//! Deterministic heuristic analysis of research papers: keyword-driven
//! section extraction, cross-paper synthesis, abstract similarity graphs and
//! metadata enrichment against an external bibliographic authority.

pub mod common;
pub mod config;
pub mod corpus;
pub mod enrich;
pub mod extract;
pub mod graph;
pub mod pipeline;
pub mod stopwords;

pub use config::EngineConfig;
pub use pipeline::{analyze_corpus, analyze_document, CorpusReport, CorpusRequest, DocumentReport};
