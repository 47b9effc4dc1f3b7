pub mod input;
pub mod logging;
pub mod output;
pub mod progress;
pub mod types;
pub mod utils;

pub use input::*;
pub use logging::*;
pub use output::{write_json, write_text, ReportOutputPaths};
pub use types::*;
pub use utils::*;

pub use progress::{create_paper_progress_bar, create_spinner};
