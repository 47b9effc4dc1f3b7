pub mod analyze;
pub mod document;

pub use analyze::run_analyze;
pub use document::run_document;
