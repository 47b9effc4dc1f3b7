//! The two analysis workflows: a corpus of abstracts and a single document.

use indicatif::ProgressBar;
use log::{debug, info};
use rayon::prelude::*;
use serde::Serialize;
use std::time::Instant;

use crate::common::{
    char_prefix, dedupe_by_title, filter_by_year, format_elapsed, normalize_whitespace, truncate_chars, CorpusStats,
    Paper, PaperAnalysis, PaperSource, SeedMetadata, Sections,
};
use crate::config::EngineConfig;
use crate::corpus::{render_narrative, source_distribution, ComparisonTable, SourceCount};
use crate::enrich::{
    filename_title, normalize_query_title, EnrichmentMatcher, LocalRecord, MatchInfo, MetadataAuthority, Provenance,
    TitleOrigin,
};
use crate::extract::{
    citation_note, extract_document, find_doi, infer_authors, infer_title, infer_year, normalize_doi,
    SectionExtractor,
};
use crate::graph::{build_similarity_graph, SimilarityGraph};

const UNTITLED_DOCUMENT: &str = "Uploaded document";
const DOCUMENT_ABSTRACT_CHARS: usize = 600;

/// Parameters of one corpus analysis run
#[derive(Debug, Clone, Default)]
pub struct CorpusRequest {
    pub query: String,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    /// Keep only the first N papers after filtering and deduplication
    pub max_papers: Option<usize>,
}

/// Everything produced for a corpus
#[derive(Debug, Clone, Serialize)]
pub struct CorpusReport {
    pub query: String,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub count: usize,
    pub analyses: Vec<PaperAnalysis>,
    pub comparison: ComparisonTable,
    pub narrative: String,
    pub sources: Vec<SourceCount>,
    pub graph: SimilarityGraph,
    pub stats: CorpusStats,
}

/// Extract sections for every paper, synthesise the corpus and build the
/// similarity graph. Extraction runs on the rayon pool, preserving order.
pub fn analyze_corpus(
    papers: Vec<Paper>,
    request: &CorpusRequest,
    config: &EngineConfig,
    progress: Option<&ProgressBar>,
) -> CorpusReport {
    let start = Instant::now();
    let mut stats = CorpusStats {
        papers_read: papers.len(),
        ..CorpusStats::default()
    };

    let (papers, outside) = filter_by_year(papers, request.start_year, request.end_year);
    stats.outside_year_range = outside;
    let (mut papers, duplicates) = dedupe_by_title(papers);
    stats.duplicates_removed = duplicates;
    if let Some(max) = request.max_papers {
        if papers.len() > max {
            stats.truncated = papers.len() - max;
            papers.truncate(max);
        }
    }

    info!("Analyzing {} papers", papers.len());
    if let Some(pb) = progress {
        pb.set_length(papers.len() as u64);
    }
    let extractor = SectionExtractor::new(config);
    let analyses: Vec<PaperAnalysis> = papers
        .into_par_iter()
        .map(|paper| {
            let sections = extractor.extract(&paper.abstract_text, paper.citation_count);
            if let Some(pb) = progress {
                pb.inc(1);
            }
            PaperAnalysis { paper, sections }
        })
        .collect();

    let comparison = ComparisonTable::from_analyses(&analyses, config.synthesis.excerpt_chars);
    let narrative = render_narrative(&request.query, &analyses, &config.synthesis);
    let sources = source_distribution(&analyses);

    let graph_papers: Vec<Paper> = analyses.iter().map(|a| a.paper.clone()).collect();
    let graph = build_similarity_graph(&graph_papers, &config.graph);

    stats.papers_analyzed = analyses.len();
    stats.similarity_edges = graph.similarity_edge_count();
    stats.placeholder_edges = graph.placeholder_edge_count();
    info!(
        "Corpus analysis complete: {} papers, {} similarity edges in {}",
        stats.papers_analyzed,
        stats.similarity_edges,
        format_elapsed(start.elapsed())
    );

    CorpusReport {
        query: request.query.clone(),
        start_year: request.start_year,
        end_year: request.end_year,
        count: analyses.len(),
        analyses,
        comparison,
        narrative,
        sources,
        graph,
        stats,
    }
}

/// Result of analysing one uploaded document
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub paper: Paper,
    pub sections: Sections,
    pub provenance: Provenance,
    /// Human-readable provenance label
    pub source: String,
    pub filename: Option<String>,
    pub matched: Option<MatchInfo>,
}

/// Local record for a document: seed metadata first, inference second
pub fn local_paper(text: &str, seed: &SeedMetadata, filename: Option<&str>, config: &EngineConfig) -> LocalRecord {
    let normalized = normalize_whitespace(text);

    let (title, title_origin) = seed
        .title
        .as_deref()
        .map(normalize_query_title)
        .filter(|t| !t.is_empty())
        .map(|t| (t, TitleOrigin::Metadata))
        .or_else(|| {
            infer_title(text)
                .map(|t| normalize_query_title(&t))
                .filter(|t| !t.is_empty())
                .map(|t| (t, TitleOrigin::Inferred))
        })
        .or_else(|| filename.and_then(filename_title).map(|t| (t, TitleOrigin::Filename)))
        .unwrap_or_else(|| (UNTITLED_DOCUMENT.to_string(), TitleOrigin::Placeholder));

    let mut paper = Paper::new(
        &title,
        &truncate_chars(&normalized, DOCUMENT_ABSTRACT_CHARS),
        PaperSource::Uploaded,
    );
    paper.authors = if seed.authors.is_empty() {
        infer_authors(text)
    } else {
        seed.authors.clone()
    };
    paper.year = seed.year.or_else(|| infer_year(&normalized));
    paper.doi = seed
        .doi
        .as_deref()
        .map(normalize_doi)
        .filter(|d| !d.is_empty())
        .or_else(|| find_doi(char_prefix(&normalized, config.sections.max_document_chars)));
    LocalRecord::new(paper, title_origin)
}

fn document_citations(paper: &Paper, provenance: Provenance, reference_note: &str) -> String {
    match (provenance, paper.citation_count) {
        (Provenance::Enriched, Some(count)) => citation_note(Some(count), "metadata authority"),
        (Provenance::Enriched, None) => format!("Citation count unavailable in metadata. {}", reference_note),
        (Provenance::LocalOnly, _) => format!(
            "Citation count unavailable for local upload without metadata match. {}",
            reference_note
        ),
    }
}

/// Analyse one document and, when an authority is given, enrich its
/// metadata. Enrichment failures never fail the analysis.
pub async fn analyze_document(
    text: &str,
    seed: &SeedMetadata,
    filename: Option<&str>,
    authority: Option<&dyn MetadataAuthority>,
    config: &EngineConfig,
) -> DocumentReport {
    let start = Instant::now();
    let extraction = extract_document(text, config);
    let local = local_paper(text, seed, filename, config);
    debug!(
        "Local metadata: title='{}' ({:?}), doi={:?}",
        local.paper.title, local.title_origin, local.paper.doi
    );

    let (paper, provenance, matched) = match authority {
        Some(authority) => {
            let outcome = EnrichmentMatcher::new(authority, &config.enrichment)
                .enrich(&local, text, filename)
                .await;
            (outcome.paper, outcome.provenance, outcome.matched)
        }
        None => (local.paper, Provenance::LocalOnly, None),
    };

    let mut sections = extraction.sections;
    sections.citations = document_citations(&paper, provenance, &extraction.reference_note);

    info!(
        "Document analysis complete: '{}' ({}) in {}",
        paper.title,
        provenance,
        format_elapsed(start.elapsed())
    );

    DocumentReport {
        paper,
        sections,
        provenance,
        source: provenance.as_str().to_string(),
        filename: filename.map(str::to_string),
        matched,
    }
}
