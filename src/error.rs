//! Muninn error types

use std::time::Duration;

/// Muninn error types
#[derive(Debug, thiserror::Error)]
pub enum MuninnError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("provider error ({status}): {body}")]
    Provider { status: u16, body: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("request to {endpoint} timed out after {after:?}. Is the server running at {endpoint}?")]
    Timeout { endpoint: String, after: Duration },

    #[error("could not connect to {endpoint}. Is the server running?")]
    ConnectionFailed { endpoint: String },

    // Data errors
    #[error("unexpected response format: {0}")]
    UnexpectedFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Configuration errors
    #[error(
        "{capability} provider '{provider}' requires API credentials. \
         Configure an API key or use local Ollama instead"
    )]
    MissingCredentials {
        provider: String,
        capability: &'static str,
    },

    #[error("{capability} provider '{provider}' is not supported. Options: {options}")]
    UnsupportedProvider {
        provider: String,
        capability: &'static str,
        options: String,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    // Terminal call outcomes
    #[error("no output returned by the provider")]
    NoOutput,

    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        last: Box<MuninnError>,
    },
}

impl MuninnError {
    /// Whether this error should be retried with backoff.
    ///
    /// Rate limits and unclassified transport failures are transient;
    /// everything else (explicit provider errors, timeouts, connection
    /// failures, malformed payloads, configuration problems) is terminal
    /// and surfaced to the caller immediately.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            MuninnError::RateLimited { .. } | MuninnError::Http(_)
        )
    }

    /// Provider-supplied retry hint, if any (from a 429 `Retry-After` header).
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            MuninnError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Map a reqwest transport error to the matching taxonomy entry.
    ///
    /// Timeouts and connection failures become terminal errors naming the
    /// endpoint; anything else is an unclassified (transient) `Http` error.
    pub(crate) fn from_reqwest(err: reqwest::Error, endpoint: &str, timeout: Duration) -> Self {
        if err.is_timeout() {
            MuninnError::Timeout {
                endpoint: endpoint.to_string(),
                after: timeout,
            }
        } else if err.is_connect() {
            MuninnError::ConnectionFailed {
                endpoint: endpoint.to_string(),
            }
        } else {
            MuninnError::Http(err.to_string())
        }
    }
}

/// Result type alias for Muninn operations
pub type Result<T> = std::result::Result<T, MuninnError>;
