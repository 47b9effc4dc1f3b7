use indicatif::{ProgressBar, ProgressStyle};

/// Spinner for steps whose size is unknown up front (HTTP enrichment)
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb
}

/// Bar over a known number of papers
pub fn create_paper_progress_bar(total_papers: u64) -> ProgressBar {
    let pb = ProgressBar::new(total_papers);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} papers ({percent}%) {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }
    pb
}
