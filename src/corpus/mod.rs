//! Cross-paper synthesis: comparison table and markdown narrative.

pub mod comparison;
pub mod narrative;
pub mod terms;

pub use comparison::{ComparisonRow, ComparisonTable, COMPARISON_COLUMNS};
pub use narrative::{render_narrative, source_distribution, year_span, SourceCount};
pub use terms::top_terms;
