use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// DOI in bare, doi: or resolver-URL form
    pub static ref DOI_PATTERN: Regex = Regex::new(
        r#"(?i)(?:doi[:\s]*|(?:https?://)?(?:dx\.)?doi\.org/)?(10\.\d{4,9}/[^\s\]\)>,;"']+)"#
    ).unwrap();
}

/// Clean up a captured DOI string
/// - Decode the URL-encoded characters seen in extracted PDFs
/// - Strip trailing punctuation
/// - Normalize to lowercase
pub fn normalize_doi(doi: &str) -> String {
    let mut result = doi
        .trim()
        .replace("%2F", "/")
        .replace("%2f", "/")
        .replace("%3A", ":")
        .replace("%3a", ":")
        .replace("%28", "(")
        .replace("%29", ")");

    let trailing_chars: &[char] = &['.', ',', ';', ':', ')', ']', '>', '"', '\'', ' '];
    while result.ends_with(trailing_chars) {
        result.pop();
    }

    result.to_lowercase()
}

/// First DOI mentioned in the text, normalized
pub fn find_doi(text: &str) -> Option<String> {
    DOI_PATTERN
        .captures_iter(text)
        .filter_map(|cap| cap.get(1))
        .map(|m| normalize_doi(m.as_str()))
        .find(|doi| doi.contains('/') && doi.len() > "10.1234/".len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_bare_doi() {
        assert_eq!(
            find_doi("Published as 10.1145/3292500.3330701 in KDD."),
            Some("10.1145/3292500.3330701".to_string())
        );
    }

    #[test]
    fn test_find_doi_url() {
        assert_eq!(
            find_doi("See https://doi.org/10.18653/V1/N19-1423."),
            Some("10.18653/v1/n19-1423".to_string())
        );
    }

    #[test]
    fn test_find_doi_prefix_form() {
        assert_eq!(find_doi("doi: 10.1000/xyz123,"), Some("10.1000/xyz123".to_string()));
    }

    #[test]
    fn test_first_doi_wins() {
        assert_eq!(
            find_doi("10.1111/first and 10.2222/second"),
            Some("10.1111/first".to_string())
        );
    }

    #[test]
    fn test_no_doi() {
        assert_eq!(find_doi("No identifiers in this text."), None);
    }

    #[test]
    fn test_normalize_trailing_punctuation() {
        assert_eq!(normalize_doi("10.1234/test)."), "10.1234/test");
        assert_eq!(normalize_doi("10.1234%2FTEST"), "10.1234/test");
    }
}
