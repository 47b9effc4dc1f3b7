pub mod doi;
pub mod document;
pub mod keywords;
pub mod sections;
pub mod sentence;

pub use doi::{find_doi, normalize_doi};
pub use document::{extract_document, infer_authors, infer_title, infer_year, DocumentExtraction};
pub use keywords::{Fallback, KeywordTable, SectionPolicy};
pub use sections::{citation_note, SectionExtractor, CITATIONS_UNAVAILABLE, NOT_ENOUGH_TEXT};
pub use sentence::{split_sentences, Sentence};
