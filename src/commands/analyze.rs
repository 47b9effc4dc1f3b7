use anyhow::{Context, Result};
use log::{error, info};
use std::path::Path;
use std::time::Instant;

use crate::cli::AnalyzeArgs;
use paper_digest::common::{
    create_paper_progress_bar, format_elapsed, load_papers, setup_logging, write_json, write_text, CorpusStats,
    ReportOutputPaths,
};
use paper_digest::config::EngineConfig;
use paper_digest::pipeline::{analyze_corpus, CorpusRequest};

pub(crate) fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            EngineConfig::from_path(path)
        }
        None => Ok(EngineConfig::default()),
    }
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<CorpusStats> {
    let start_time = Instant::now();

    setup_logging(&args.log_level)?;

    info!("Starting corpus analysis");
    info!("Input: {}", args.input);
    info!("Output: {}", args.output);

    if let (Some(start), Some(end)) = (args.start_year, args.end_year) {
        if start > end {
            return Err(anyhow::anyhow!(
                "Start year {} is after end year {}",
                start,
                end
            ));
        }
    }

    if !Path::new(&args.input).exists() {
        return Err(anyhow::anyhow!("Input file does not exist: {}", args.input));
    }

    let config = load_config(args.config.as_deref())?;

    let num_threads = if args.threads == 0 {
        let cores = num_cpus::get();
        info!("Auto-detected {} CPU cores. Using {} threads.", cores, cores);
        cores
    } else {
        info!("Using specified {} threads.", args.threads);
        args.threads
    };

    if let Err(e) = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()
    {
        error!("Failed to build thread pool: {}. Using default.", e);
    }

    let papers = load_papers(&args.input)?;

    let request = CorpusRequest {
        query: args.query.clone(),
        start_year: args.start_year,
        end_year: args.end_year,
        max_papers: args.max_papers,
    };

    let progress = create_paper_progress_bar(papers.len() as u64);
    let report = analyze_corpus(papers, &request, &config, Some(&progress));
    progress.finish_with_message("done");

    let paths = ReportOutputPaths::from_base(&args.output);
    if let Some(parent) = paths.report.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    write_json(&report, &paths.report)?;
    write_text(&report.narrative, &paths.summary)?;
    report.comparison.write_parquet(&paths.comparison)?;
    write_json(&report.graph, &paths.graph)?;

    let stats = report.stats;

    info!("======================== Summary ========================");
    info!("Papers read: {}", stats.papers_read);
    info!("Outside year range: {}", stats.outside_year_range);
    info!("Duplicates removed: {}", stats.duplicates_removed);
    info!("Truncated by max papers: {}", stats.truncated);
    info!("Papers analyzed: {}", stats.papers_analyzed);
    info!("Similarity edges: {}", stats.similarity_edges);
    info!("Placeholder edges: {}", stats.placeholder_edges);
    info!("Report: {}", paths.report.display());
    info!("Summary: {}", paths.summary.display());
    info!("Comparison table: {}", paths.comparison.display());
    info!("Graph: {}", paths.graph.display());
    info!("Total time: {}", format_elapsed(start_time.elapsed()));
    info!("=========================================================");

    Ok(stats)
}
