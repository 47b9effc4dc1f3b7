use anyhow::{Context, Result};
use log::{info, warn};
use std::path::Path;
use std::time::{Duration, Instant};

use crate::cli::DocumentArgs;
use crate::commands::analyze::load_config;
use paper_digest::common::{
    create_spinner, format_elapsed, load_document_text, load_seed_metadata, setup_logging, write_json, SeedMetadata,
};
use paper_digest::enrich::{MetadataAuthority, SemanticScholarAuthority};
use paper_digest::pipeline::{analyze_document, DocumentReport};

pub async fn run_document_async(args: DocumentArgs) -> Result<DocumentReport> {
    let start_time = Instant::now();

    setup_logging(&args.log_level)?;

    info!("Starting document analysis");
    info!("Input: {}", args.input);
    info!("Output: {}", args.output);

    let mut config = load_config(args.config.as_deref())?;
    if let Some(timeout) = args.timeout {
        config.enrichment.attempt_timeout_secs = timeout;
    }
    if let Some(attempts) = args.attempts {
        config.enrichment.max_attempts = attempts;
    }
    config.validate()?;

    let text = load_document_text(&args.input)?;
    let seed = match args.metadata.as_deref() {
        Some(path) => load_seed_metadata(path)?,
        None => SeedMetadata::default(),
    };
    let filename = Path::new(&args.input)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned());

    let authority = if args.offline {
        info!("Offline mode: metadata enrichment disabled");
        None
    } else {
        match SemanticScholarAuthority::new(&config.enrichment.base_url, args.api_key.clone()) {
            Ok(authority) => Some(authority),
            Err(e) => {
                warn!("Failed to create metadata client: {}. Continuing without enrichment.", e);
                None
            }
        }
    };

    let spinner = create_spinner("Analyzing document...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    let report = analyze_document(
        &text,
        &seed,
        filename.as_deref(),
        authority.as_ref().map(|a| a as &dyn MetadataAuthority),
        &config,
    )
    .await;
    spinner.finish_and_clear();

    if let Some(parent) = Path::new(&args.output).parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    write_json(&report, &args.output)?;

    info!("======================== Summary ========================");
    info!("Title: {}", report.paper.title);
    info!("Year: {}", report.paper.year.map_or_else(|| "unknown".to_string(), |y| y.to_string()));
    info!("Source: {}", report.source);
    if report.provenance.is_enriched() {
        if let Some(ref matched) = report.matched {
            info!("Matched via {} (score {:.2})", matched.step, matched.score);
        }
    } else {
        info!("No metadata match accepted, local analysis only");
    }
    info!("Report: {}", args.output);
    info!("Total time: {}", format_elapsed(start_time.elapsed()));
    info!("=========================================================");

    Ok(report)
}

pub fn run_document(args: DocumentArgs) -> Result<DocumentReport> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_document_async(args))
}
