use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::Write;
use std::process::Command;
use tempfile::tempdir;

use paper_digest::common::{dedupe_by_title, filter_by_year, Paper, PaperSource, SeedMetadata};
use paper_digest::enrich::title_overlap_score;
use paper_digest::extract::SectionExtractor;
use paper_digest::graph::{build_similarity_graph, EdgeKind};
use paper_digest::{analyze_corpus, analyze_document, CorpusRequest, EngineConfig};

/// Create a small gzip-compressed JSONL corpus
fn create_test_corpus(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("papers.jsonl.gz");
    let file = File::create(&path).unwrap();
    let encoder = GzEncoder::new(file, Compression::default());
    let mut writer = std::io::BufWriter::new(encoder);

    writeln!(
        writer,
        r#"{{"title": "LLMs in Healthcare", "abstract": "We propose a retrieval framework for clinical notes. However, evaluation is limited to English records.", "source": "arXiv", "year": 2021, "authors": ["A. Author"]}}"#
    )
    .unwrap();
    writeln!(
        writer,
        r#"{{"title": "llms   in healthcare!!", "abstract": "A duplicate record of the same paper.", "source": "Semantic Scholar", "year": 2021}}"#
    )
    .unwrap();
    writeln!(
        writer,
        r#"{{"title": "Clinical Retrieval Benchmarks", "abstract": "Prior work compared retrieval baselines for clinical notes. Our approach improves recall significantly.", "source": "Semantic Scholar", "year": 2022, "citations": 12, "venue": ""}}"#
    )
    .unwrap();
    writeln!(
        writer,
        r#"{{"title": "Early Expert Systems", "abstract": "Rule engines for diagnosis.", "source": "arXiv", "year": 1995}}"#
    )
    .unwrap();

    writer.into_inner().unwrap().finish().unwrap();
    path
}

#[test]
fn test_analyze_help() {
    let status = Command::new("cargo")
        .args(["run", "--", "analyze", "--help"])
        .status()
        .expect("Failed to run analyze --help");

    assert!(status.success(), "Analyze --help should succeed");
}

#[test]
fn test_document_help() {
    let status = Command::new("cargo")
        .args(["run", "--", "document", "--help"])
        .status()
        .expect("Failed to run document --help");

    assert!(status.success(), "Document --help should succeed");
}

#[test]
fn test_analyze_end_to_end() {
    let dir = tempdir().unwrap();
    let input = create_test_corpus(dir.path());
    let output = dir.path().join("out").join("report.json");

    let status = Command::new("cargo")
        .args([
            "run",
            "--",
            "analyze",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--query",
            "clinical retrieval",
            "--start-year",
            "2020",
            "--end-year",
            "2022",
            "--threads",
            "2",
        ])
        .status()
        .expect("Failed to run analyze");

    assert!(status.success(), "Analyze should succeed");

    let out_dir = dir.path().join("out");
    assert!(out_dir.join("report_summary.md").exists(), "Summary should exist");
    assert!(out_dir.join("report_comparison.parquet").exists(), "Comparison should exist");
    assert!(out_dir.join("report_graph.json").exists(), "Graph should exist");

    let report: serde_json::Value = serde_json::from_reader(File::open(&output).unwrap()).unwrap();
    assert_eq!(report["count"], 2);
    assert_eq!(report["stats"]["duplicates_removed"], 1);
    assert_eq!(report["stats"]["outside_year_range"], 1);

    let analyses = report["analyses"].as_array().unwrap();
    for analysis in analyses {
        for field in [
            "insights",
            "literature_review",
            "method_used",
            "contributions",
            "limitations",
            "future_work",
            "citations",
            "research_gap",
        ] {
            let value = analysis[field].as_str().unwrap();
            assert!(!value.is_empty(), "Field {} should be populated", field);
        }
    }
    assert_eq!(
        analyses[1]["citations"],
        "Cited by approximately 12 papers (source metadata)."
    );

    let summary = std::fs::read_to_string(out_dir.join("report_summary.md")).unwrap();
    assert!(summary.contains("- **Topic:** clinical retrieval"));
    assert!(summary.contains("- **Time coverage:** 2021 to 2022"));
}

#[test]
fn test_analyze_rejects_inverted_years() {
    let dir = tempdir().unwrap();
    let input = create_test_corpus(dir.path());
    let output = dir.path().join("report.json");

    let status = Command::new("cargo")
        .args([
            "run",
            "--",
            "analyze",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--start-year",
            "2023",
            "--end-year",
            "2020",
        ])
        .status()
        .expect("Failed to run analyze");

    assert!(!status.success(), "Inverted year range should fail");
    assert!(!output.exists());
}

#[test]
fn test_document_offline_end_to_end() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("sparse_attention.md");
    std::fs::write(
        &input,
        "Sparse Attention for Long Documents\n\
         Jane Roe, John Doe\n\
         We propose a sparse attention model for long documents in 2023. It outperforms dense baselines [1].\n\
         Limitations\n\
         The evaluation covers only English news articles from a single publisher.\n\
         References\n\
         [1] Dense attention. 2017.\n",
    )
    .unwrap();
    let output = dir.path().join("document.json");

    let status = Command::new("cargo")
        .args([
            "run",
            "--",
            "document",
            "--input",
            input.to_str().unwrap(),
            "--output",
            output.to_str().unwrap(),
            "--offline",
        ])
        .status()
        .expect("Failed to run document");

    assert!(status.success(), "Document should succeed");

    let report: serde_json::Value = serde_json::from_reader(File::open(&output).unwrap()).unwrap();
    assert_eq!(report["paper"]["title"], "Sparse Attention for Long Documents");
    assert_eq!(report["paper"]["year"], 2023);
    assert_eq!(report["paper"]["source"], "Uploaded");
    assert_eq!(report["provenance"], "local_only");
    assert_eq!(report["source"], "Uploaded document + local analysis");
    assert_eq!(report["filename"], "sparse_attention.md");
    assert!(report["sections"]["limitations"]
        .as_str()
        .unwrap()
        .contains("only English news articles"));
    assert!(report["sections"]["citations"]
        .as_str()
        .unwrap()
        .ends_with("References section detected with at least 1 indexed citations."));
}

#[test]
fn test_every_section_present_for_any_input() {
    let config = EngineConfig::default();
    let extractor = SectionExtractor::new(&config);
    for text in ["", "   ", "Hi.", "One sentence without any triggers at all."] {
        let sections = extractor.extract(text, None);
        assert_eq!(sections.iter().count(), 8);
        for (kind, value) in sections.iter() {
            assert!(!value.trim().is_empty(), "{} empty for {:?}", kind, text);
        }
    }
}

#[test]
fn test_extraction_is_idempotent() {
    let config = EngineConfig::default();
    let extractor = SectionExtractor::new(&config);
    let text = "We propose a graph model. It outperforms prior work. However, it is costly.";
    assert_eq!(extractor.extract(text, Some(3)), extractor.extract(text, Some(3)));
}

#[test]
fn test_dedupe_by_normalized_title() {
    let papers = vec![
        Paper::new("LLMs in Healthcare", "first", PaperSource::Arxiv),
        Paper::new("llms   in healthcare!!", "second", PaperSource::SemanticScholar),
    ];
    let (kept, removed) = dedupe_by_title(papers);
    assert_eq!(kept.len(), 1);
    assert_eq!(removed, 1);
    assert_eq!(kept[0].abstract_text, "first");
}

#[test]
fn test_year_filter_range() {
    let papers: Vec<Paper> = [2019, 2020, 2021, 2022, 2023]
        .iter()
        .map(|y| Paper::new(&format!("Paper {}", y), "", PaperSource::Arxiv).with_year(*y))
        .chain(std::iter::once(Paper::new("Undated", "", PaperSource::Arxiv)))
        .collect();
    let (kept, removed) = filter_by_year(papers, Some(2020), Some(2022));
    let years: Vec<i32> = kept.iter().filter_map(|p| p.year).collect();
    assert_eq!(years, vec![2020, 2021, 2022]);
    assert_eq!(removed, 3);
}

#[test]
fn test_graph_similarity_properties() {
    let config = EngineConfig::default();
    let text = "Federated learning for hospital imaging data.";
    let same = vec![
        Paper::new("A", text, PaperSource::Arxiv),
        Paper::new("B", text, PaperSource::Arxiv),
    ];
    let graph = build_similarity_graph(&same, &config.graph);
    assert!((graph.similarity[0][1] - 1.0).abs() < 1e-9);
    assert_eq!(graph.edges[0].kind, EdgeKind::Similarity);

    let disjoint = vec![
        Paper::new("A", "volcanic ash dispersion", PaperSource::Arxiv),
        Paper::new("B", "chess opening theory", PaperSource::Arxiv),
    ];
    let graph = build_similarity_graph(&disjoint, &config.graph);
    assert_eq!(graph.similarity[0][1], 0.0);
    assert_eq!(graph.similarity_edge_count(), 0);
    assert_eq!(graph.edges[0].kind, EdgeKind::Placeholder);
}

#[test]
fn test_title_scoring_threshold() {
    let threshold = EngineConfig::default().enrichment.accept_threshold;
    assert!(title_overlap_score("Attention Is All You Need", "Attention Is All You Need") >= threshold);
    assert!(title_overlap_score("Attention Is All You Need", "Attention Mechanisms Survey") < threshold);
}

#[test]
fn test_empty_corpus_report() {
    let report = analyze_corpus(Vec::new(), &CorpusRequest::default(), &EngineConfig::default(), None);
    assert_eq!(report.count, 0);
    assert!(report.comparison.is_empty());
    assert!(report.graph.nodes.is_empty());
    assert!(report.narrative.contains("## Actionable Next Steps"));
}

#[tokio::test]
async fn test_document_without_authority() {
    let report = analyze_document(
        "",
        &SeedMetadata::default(),
        Some("empty_upload.txt"),
        None,
        &EngineConfig::default(),
    )
    .await;
    assert_eq!(report.paper.title, "empty upload");
    for (_, value) in report.sections.iter() {
        assert!(!value.is_empty());
    }
}
