use anyhow::{Context, Result};
use log::info;
use polars::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fs::File;
use std::path::Path;

use crate::common::{truncate_chars, PaperAnalysis};

/// Column set shared by every comparison row, in display order
pub const COMPARISON_COLUMNS: [&str; 9] = [
    "Paper",
    "Year",
    "Source",
    "Abstract",
    "Literature Review",
    "Method Used",
    "Key Contribution",
    "Limitations",
    "Future Work",
];

const UNKNOWN_YEAR: &str = "N/A";

/// One paper flattened into ordered (column, value) cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonRow {
    cells: Vec<(&'static str, String)>,
}

impl ComparisonRow {
    pub fn from_analysis(analysis: &PaperAnalysis, abstract_chars: usize) -> Self {
        let paper = &analysis.paper;
        let sections = &analysis.sections;
        let year = paper.year.map_or_else(|| UNKNOWN_YEAR.to_string(), |y| y.to_string());

        let values = [
            paper.title.clone(),
            year,
            paper.source.to_string(),
            truncate_chars(paper.abstract_text.trim(), abstract_chars),
            sections.literature_review.clone(),
            sections.method_used.clone(),
            sections.contributions.clone(),
            sections.limitations.clone(),
            sections.future_work.clone(),
        ];

        Self {
            cells: COMPARISON_COLUMNS.iter().copied().zip(values).collect(),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(column, _)| *column)
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| *c == column)
            .map(|(_, value)| value.as_str())
    }

    pub fn cells(&self) -> &[(&'static str, String)] {
        &self.cells
    }
}

impl Serialize for ComparisonRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (column, value) in &self.cells {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// Rows with one uniform schema
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct ComparisonTable {
    rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_analyses(analyses: &[PaperAnalysis], abstract_chars: usize) -> Self {
        let mut table = Self::new();
        for analysis in analyses {
            table.push(ComparisonRow::from_analysis(analysis, abstract_chars));
        }
        table
    }

    /// Append a row. A row with a different column set is a programming error.
    pub fn push(&mut self, row: ComparisonRow) {
        assert!(
            row.columns().eq(COMPARISON_COLUMNS.iter().copied()),
            "comparison row does not match the table schema"
        );
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ComparisonRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All columns as Utf8
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns: Vec<Column> = COMPARISON_COLUMNS
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let values: Vec<&str> = self.rows.iter().map(|row| row.cells[idx].1.as_str()).collect();
                Column::new((*name).into(), &values)
            })
            .collect();

        DataFrame::new(columns).map_err(|e| anyhow::anyhow!("Failed to create comparison DataFrame: {}", e))
    }

    pub fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut df = self.to_dataframe()?;

        let file = File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
        ParquetWriter::new(file)
            .with_compression(ParquetCompression::Zstd(None))
            .finish(&mut df)
            .context("Failed to write comparison table to parquet")?;

        info!("Wrote {} comparison rows to {}", self.len(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Paper, PaperSource, SectionKind, Sections};
    use std::collections::BTreeMap;

    fn analysis(title: &str, year: Option<i32>) -> PaperAnalysis {
        let mut paper = Paper::new(title, "An abstract about parsing.", PaperSource::Arxiv);
        paper.year = year;
        let map: BTreeMap<SectionKind, String> = SectionKind::ALL
            .iter()
            .map(|k| (*k, format!("{} of {}", k, title)))
            .collect();
        PaperAnalysis {
            paper,
            sections: Sections::from_map(map),
        }
    }

    #[test]
    fn test_rows_share_schema() {
        let table = ComparisonTable::from_analyses(&[analysis("A", Some(2020)), analysis("B", None)], 320);
        assert_eq!(table.len(), 2);
        for row in table.rows() {
            assert!(row.columns().eq(COMPARISON_COLUMNS.iter().copied()));
        }
        assert_eq!(table.rows()[1].get("Year"), Some("N/A"));
        assert_eq!(table.rows()[0].get("Method Used"), Some("method_used of A"));
        assert_eq!(table.rows()[0].get("Source"), Some("arXiv"));
    }

    #[test]
    #[should_panic(expected = "does not match the table schema")]
    fn test_push_rejects_foreign_schema() {
        let mut row = ComparisonRow::from_analysis(&analysis("A", None), 320);
        row.cells.pop();
        ComparisonTable::new().push(row);
    }

    #[test]
    fn test_row_serializes_in_column_order() {
        let row = ComparisonRow::from_analysis(&analysis("A", Some(2021)), 320);
        let json = serde_json::to_string(&row).unwrap();
        let paper_pos = json.find("\"Paper\"").unwrap();
        let future_pos = json.find("\"Future Work\"").unwrap();
        assert!(paper_pos < future_pos);
        assert!(json.starts_with("{\"Paper\":\"A\",\"Year\":\"2021\""));
    }

    #[test]
    fn test_dataframe_shape() {
        let table = ComparisonTable::from_analyses(&[analysis("A", Some(2020)), analysis("B", Some(2021))], 320);
        let df = table.to_dataframe().unwrap();
        assert_eq!(df.shape(), (2, COMPARISON_COLUMNS.len()));
        assert_eq!(df.get_column_names()[0].as_str(), "Paper");
    }

    #[test]
    fn test_write_parquet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("comparison.parquet");
        let table = ComparisonTable::from_analyses(&[analysis("A", Some(2020))], 320);
        table.write_parquet(&path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
    }
}
