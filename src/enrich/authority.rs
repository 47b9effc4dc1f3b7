use futures::future::BoxFuture;
use futures::FutureExt;
use log::debug;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use super::error::AuthorityError;

/// Fields requested from the Semantic Scholar Graph API
pub const SEMANTIC_SCHOLAR_FIELDS: &str = "title,year,authors,venue,url,openAccessPdf,citationCount,externalIds";

/// A paper-shaped record returned by a metadata authority
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub title: String,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub venue: Option<String>,
    pub paper_url: Option<String>,
    pub pdf_url: Option<String>,
    pub citation_count: Option<u64>,
    pub doi: Option<String>,
}

impl Candidate {
    pub fn titled(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }
}

/// External bibliographic service the matcher reconciles against
pub trait MetadataAuthority: Send + Sync {
    /// Exact lookup by DOI. An unknown DOI is an empty list, not an error.
    fn lookup_doi<'a>(&'a self, doi: &'a str) -> BoxFuture<'a, Result<Vec<Candidate>, AuthorityError>>;

    /// Free-text title search returning at most `limit` candidates
    fn search_title<'a>(
        &'a self,
        title: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<Candidate>, AuthorityError>>;
}

#[derive(Debug, Deserialize)]
struct S2Author {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct S2OpenAccessPdf {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct S2ExternalIds {
    #[serde(rename = "DOI")]
    doi: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct S2Paper {
    title: Option<String>,
    year: Option<i32>,
    #[serde(default)]
    authors: Vec<S2Author>,
    venue: Option<String>,
    url: Option<String>,
    open_access_pdf: Option<S2OpenAccessPdf>,
    citation_count: Option<u64>,
    external_ids: Option<S2ExternalIds>,
}

#[derive(Debug, Deserialize)]
struct S2SearchResponse {
    #[serde(default)]
    data: Vec<S2Paper>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl From<S2Paper> for Candidate {
    fn from(paper: S2Paper) -> Self {
        Candidate {
            title: paper.title.unwrap_or_default().trim().to_string(),
            authors: paper
                .authors
                .into_iter()
                .filter_map(|a| non_blank(a.name))
                .collect(),
            year: paper.year,
            venue: non_blank(paper.venue),
            paper_url: non_blank(paper.url),
            pdf_url: non_blank(paper.open_access_pdf.and_then(|p| p.url)),
            citation_count: paper.citation_count,
            doi: non_blank(paper.external_ids.and_then(|ids| ids.doi)),
        }
    }
}

/// Semantic Scholar Graph API client
pub struct SemanticScholarAuthority {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl SemanticScholarAuthority {
    pub fn new(base_url: &str, api_key: Option<String>) -> Result<Self, AuthorityError> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))
            .map_err(|e| AuthorityError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(AuthorityError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = Client::builder()
            .user_agent(concat!("paper-digest/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Base URL extended by `segments`, each percent-encoded as one path segment
    fn endpoint<S: AsRef<str>>(&self, segments: &[S]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `paper/DOI:<doi>`, keeping the DOI's slashes as path separators
    fn doi_endpoint(&self, doi: &str) -> Url {
        let mut segments = vec!["paper".to_string()];
        let mut parts = doi.split('/');
        segments.push(format!("DOI:{}", parts.next().unwrap_or_default()));
        segments.extend(parts.map(str::to_string));
        self.endpoint(&segments)
    }

    /// GET a JSON payload. `Ok(None)` when the resource does not exist.
    async fn get_bytes(&self, url: Url, query: &[(&str, String)]) -> Result<Option<Vec<u8>>, AuthorityError> {
        let mut request = self.client.get(url.clone()).query(query);
        if let Some(ref api_key) = self.api_key {
            request = request.header("x-api-key", api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!("GET {} -> {}", url, status);

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AuthorityError::from_status(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(Some(body.to_vec()))
    }

    async fn fetch_doi(&self, doi: &str) -> Result<Vec<Candidate>, AuthorityError> {
        let url = self.doi_endpoint(doi);
        let query = [("fields", SEMANTIC_SCHOLAR_FIELDS.to_string())];
        match self.get_bytes(url, &query).await? {
            Some(body) => {
                let paper: S2Paper = serde_json::from_slice(&body)?;
                Ok(vec![paper.into()])
            }
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_search(&self, title: &str, limit: usize) -> Result<Vec<Candidate>, AuthorityError> {
        let url = self.endpoint(&["paper", "search"]);
        let query = [
            ("query", title.to_string()),
            ("limit", limit.to_string()),
            ("fields", SEMANTIC_SCHOLAR_FIELDS.to_string()),
        ];
        match self.get_bytes(url, &query).await? {
            Some(body) => {
                let response: S2SearchResponse = serde_json::from_slice(&body)?;
                Ok(response.data.into_iter().map(Candidate::from).collect())
            }
            // A missing search endpoint is a misconfigured base URL
            None => Err(AuthorityError::Client(404)),
        }
    }
}

impl MetadataAuthority for SemanticScholarAuthority {
    fn lookup_doi<'a>(&'a self, doi: &'a str) -> BoxFuture<'a, Result<Vec<Candidate>, AuthorityError>> {
        self.fetch_doi(doi).boxed()
    }

    fn search_title<'a>(
        &'a self,
        title: &'a str,
        limit: usize,
    ) -> BoxFuture<'a, Result<Vec<Candidate>, AuthorityError>> {
        self.fetch_search(title, limit).boxed()
    }
}
