use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use log::{info, warn};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use super::Paper;

/// Best-effort metadata handed over by a document parser
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub doi: Option<String>,
}

fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let is_gz = path.extension().and_then(|e| e.to_str()) == Some("gz");
    if is_gz {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Load paper records from a JSON array or a JSONL file (optionally `.gz`).
/// Unparseable JSONL lines are skipped with a warning.
pub fn load_papers<P: AsRef<Path>>(path: P) -> Result<Vec<Paper>> {
    let path = path.as_ref();
    info!("Loading papers from: {}", path.display());

    let mut reader = open_maybe_gz(path)?;
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .with_context(|| format!("Failed to read: {}", path.display()))?;

    if content.trim_start().starts_with('[') {
        let papers: Vec<Paper> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON array in {}", path.display()))?;
        info!("Loaded {} papers", papers.len());
        return Ok(papers);
    }

    let mut papers = Vec::new();
    let mut lines_failed = 0;
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<Paper>(line) {
            Ok(paper) => papers.push(paper),
            Err(e) => {
                if lines_failed < 5 {
                    warn!("Failed to parse paper at line {}: {}", line_no + 1, e);
                }
                lines_failed += 1;
            }
        }
    }

    info!("Loaded {} papers", papers.len());
    if lines_failed > 0 {
        warn!("Skipped {} unparseable lines", lines_failed);
    }
    Ok(papers)
}

/// Read a plain text or markdown document. Invalid UTF-8 is replaced.
pub fn load_document_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if extension != "txt" && extension != "md" {
        return Err(anyhow::anyhow!(
            "Unsupported file type '{}': provide a TXT or MD document",
            path.display()
        ));
    }

    let mut bytes = Vec::new();
    File::open(path)
        .with_context(|| format!("Failed to open document: {}", path.display()))?
        .read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Load seed metadata JSON produced by a document parser
pub fn load_seed_metadata<P: AsRef<Path>>(path: P) -> Result<SeedMetadata> {
    let path = path.as_ref();
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read metadata: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse metadata: {}", path.display()))
}
