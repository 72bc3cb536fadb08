//! Custom error types for translation operations

use thiserror::Error;

/// Error message fragments that indicate remote-side throttling.
pub const RATE_LIMIT_PHRASES: &[&str] = &["rate limit", "too many requests", "429"];

/// Translation-related errors
#[derive(Error, Debug)]
pub enum TranslationError {
    /// API request failed
    #[error("API error: {status} - {message}")]
    Api {
        status: u16,
        message: String,
    },

    /// Rate limit exceeded
    #[error("Rate limit exceeded. Retry after {retry_after:?} seconds")]
    RateLimited {
        retry_after: Option<u64>,
    },

    /// Network error
    #[error("Network error: {message}")]
    Network {
        message: String,
    },

    /// Invalid response from API
    #[error("Invalid response: {message}")]
    InvalidResponse {
        message: String,
    },

    /// Catalog file could not be loaded or saved
    #[error("Catalog error: {path} - {message}")]
    Catalog {
        path: String,
        message: String,
    },

    /// Failure isolated to a single catalog entry
    #[error("Entry error: {msgid:?} - {message}")]
    Entry {
        msgid: String,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        message: String,
    },

    /// Wrapper for anyhow errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Reqwest error
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TranslationError {
    /// Whether this error should be retried with backoff.
    ///
    /// HTTP 429 maps to `RateLimited` directly; anything else is classified
    /// by matching the rendered message against the known throttling phrases.
    pub fn is_rate_limit(&self) -> bool {
        if matches!(self, TranslationError::RateLimited { .. }) {
            return true;
        }
        is_rate_limit_message(&self.to_string())
    }
}

/// Case-insensitive phrase match against [`RATE_LIMIT_PHRASES`].
pub fn is_rate_limit_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    RATE_LIMIT_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

impl From<anyhow::Error> for TranslationError {
    fn from(err: anyhow::Error) -> Self {
        TranslationError::Internal(err.to_string())
    }
}

/// Result type for translation operations
pub type Result<T> = std::result::Result<T, TranslationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_variant_is_retryable() {
        let err = TranslationError::RateLimited { retry_after: None };
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_rate_limit_phrases_in_api_errors() {
        let err = TranslationError::Api {
            status: 400,
            message: "Too Many Requests, slow down".to_string(),
        };
        assert!(err.is_rate_limit());

        let err = TranslationError::Network {
            message: "server responded with status 429".to_string(),
        };
        assert!(err.is_rate_limit());
    }

    #[test]
    fn test_other_errors_are_not_retryable() {
        let err = TranslationError::Api {
            status: 401,
            message: "invalid api key".to_string(),
        };
        assert!(!err.is_rate_limit());

        let err = TranslationError::InvalidResponse {
            message: "no translation in response".to_string(),
        };
        assert!(!err.is_rate_limit());
    }
}
