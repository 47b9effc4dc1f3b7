use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "paper-digest")]
#[command(about = "Heuristic section extraction, corpus synthesis, similarity graphs and metadata enrichment for research papers")]
#[command(version = "1.0.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a corpus of paper records: sections, comparison table, narrative and similarity graph
    Analyze(AnalyzeArgs),

    /// Analyze one plain-text or markdown document and enrich its metadata
    Document(DocumentArgs),
}

#[derive(Parser, Clone)]
pub struct AnalyzeArgs {
    /// Paper records as a JSON array or JSONL file (optionally .gz)
    #[arg(short, long, required = true)]
    pub input: String,

    /// Output report JSON; summary, comparison and graph files are written next to it
    #[arg(short, long, default_value = "report.json")]
    pub output: String,

    /// Research topic the corpus was retrieved for
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Earliest publication year to keep
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Latest publication year to keep
    #[arg(long)]
    pub end_year: Option<i32>,

    /// Keep at most this many papers after filtering and deduplication
    #[arg(long)]
    pub max_papers: Option<usize>,

    /// Number of threads for per-paper extraction (0 = auto-detect)
    #[arg(short, long, default_value = "0")]
    pub threads: usize,

    /// Engine configuration JSON (defaults apply to absent keys)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,
}

#[derive(Parser, Clone)]
pub struct DocumentArgs {
    /// Plain-text (.txt) or markdown (.md) document
    #[arg(short, long, required = true)]
    pub input: String,

    /// Output report JSON
    #[arg(short, long, default_value = "document_report.json")]
    pub output: String,

    /// Seed metadata JSON from the document parser (title, authors, year, doi)
    #[arg(short, long)]
    pub metadata: Option<String>,

    /// Skip metadata enrichment and report local analysis only
    #[arg(long, default_value = "false")]
    pub offline: bool,

    /// Timeout in seconds per metadata request
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Attempts per metadata request
    #[arg(long)]
    pub attempts: Option<u32>,

    /// Semantic Scholar API key
    #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Engine configuration JSON (defaults apply to absent keys)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Logging level (DEBUG, INFO, WARN, ERROR)
    #[arg(short, long, default_value = "INFO")]
    pub log_level: String,
}
