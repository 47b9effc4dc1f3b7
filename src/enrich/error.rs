use thiserror::Error;

/// Failure of a single metadata authority call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    #[error("request timed out")]
    Timeout,

    #[error("rate limited by metadata authority")]
    RateLimited,

    #[error("server error: HTTP {0}")]
    Server(u16),

    #[error("client error: HTTP {0}")]
    Client(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid authority base URL: {0}")]
    InvalidBaseUrl(String),
}

impl AuthorityError {
    /// Map a non-success HTTP status onto the error kinds
    pub fn from_status(status: u16) -> Self {
        match status {
            429 => AuthorityError::RateLimited,
            500..=599 => AuthorityError::Server(status),
            _ => AuthorityError::Client(status),
        }
    }

    /// Transient failures worth another attempt. Other 4xx are final.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, AuthorityError::Client(_) | AuthorityError::InvalidBaseUrl(_))
    }
}

impl From<reqwest::Error> for AuthorityError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AuthorityError::Timeout
        } else if let Some(status) = e.status() {
            AuthorityError::from_status(status.as_u16())
        } else if e.is_decode() {
            AuthorityError::Decode(e.to_string())
        } else {
            AuthorityError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for AuthorityError {
    fn from(e: serde_json::Error) -> Self {
        AuthorityError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthorityError::from_status(429), AuthorityError::RateLimited);
        assert_eq!(AuthorityError::from_status(503), AuthorityError::Server(503));
        assert_eq!(AuthorityError::from_status(403), AuthorityError::Client(403));
    }

    #[test]
    fn test_retryable_classification() {
        assert!(AuthorityError::Timeout.is_retryable());
        assert!(AuthorityError::RateLimited.is_retryable());
        assert!(AuthorityError::Server(502).is_retryable());
        assert!(AuthorityError::Network("reset".to_string()).is_retryable());
        assert!(AuthorityError::Decode("eof".to_string()).is_retryable());
        assert!(!AuthorityError::Client(400).is_retryable());
        assert!(!AuthorityError::InvalidBaseUrl("x".to_string()).is_retryable());
    }
}
