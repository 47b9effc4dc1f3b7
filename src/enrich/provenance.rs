use serde::{Deserialize, Serialize};

/// How the metadata of an analysed document was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Only what the document and local inference provided
    LocalOnly = 0,
    /// A metadata authority candidate was accepted and merged
    Enriched = 1,
}

impl Provenance {
    /// Human-readable label carried in reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Provenance::LocalOnly => "Uploaded document + local analysis",
            Provenance::Enriched => "Uploaded document + local analysis + metadata authority enrichment",
        }
    }

    pub fn is_enriched(&self) -> bool {
        matches!(self, Provenance::Enriched)
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_serialization() {
        assert_eq!(serde_json::to_string(&Provenance::LocalOnly).unwrap(), "\"local_only\"");
        assert_eq!(serde_json::to_string(&Provenance::Enriched).unwrap(), "\"enriched\"");
    }

    #[test]
    fn test_provenance_labels() {
        assert_eq!(Provenance::LocalOnly.to_string(), "Uploaded document + local analysis");
        assert!(Provenance::Enriched.as_str().ends_with("metadata authority enrichment"));
    }

    #[test]
    fn test_provenance_ordering() {
        assert!(Provenance::Enriched > Provenance::LocalOnly);
        assert!(Provenance::Enriched.is_enriched());
        assert!(!Provenance::LocalOnly.is_enriched());
    }
}
