use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Paths for the files written by the corpus workflow
#[derive(Debug, Clone)]
pub struct ReportOutputPaths {
    pub report: PathBuf,
    pub summary: PathBuf,
    pub comparison: PathBuf,
    pub graph: PathBuf,
}

impl ReportOutputPaths {
    /// Generate sibling paths from a base path
    /// "out/report.json" -> "out/report.json", "out/report_summary.md",
    /// "out/report_comparison.parquet", "out/report_graph.json"
    pub fn from_base<P: AsRef<Path>>(base: P) -> Self {
        let base = base.as_ref();
        let stem = base.file_stem().and_then(|s| s.to_str()).unwrap_or("report");
        let parent = base.parent();

        let make_path = |suffix: &str, extension: &str| -> PathBuf {
            let filename = format!("{}_{}.{}", stem, suffix, extension);
            match parent {
                Some(p) if !p.as_os_str().is_empty() => p.join(filename),
                _ => PathBuf::from(filename),
            }
        };

        let report = if base.extension().is_some() {
            base.to_path_buf()
        } else {
            base.with_extension("json")
        };

        Self {
            report,
            summary: make_path("summary", "md"),
            comparison: make_path("comparison", "parquet"),
            graph: make_path("graph", "json"),
        }
    }
}

/// Serialize a value as pretty JSON into `path`
pub fn write_json<T: Serialize, P: AsRef<Path>>(value: &T, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to serialize JSON to {}", path.display()))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write plain text (markdown) into `path`
pub fn write_text<P: AsRef<Path>>(text: &str, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).with_context(|| format!("Failed to create output file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
