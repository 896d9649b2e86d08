use thiserror::Error;

/// Errors returned by the catalog and provider-source clients.
///
/// None of these are retried; callers turn them into a local "failed to load" state.
#[derive(Debug, Error)]
pub enum SourceError {
    /// A required token or key is not configured. Detected before any request is made.
    #[error("{0} is missing")]
    MissingCredential(&'static str),

    /// Network, TLS or timeout failure from the underlying HTTP client
    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-2xx status
    #[error("{endpoint} returned {status}: {body}")]
    Http {
        endpoint: String,
        status: reqwest::StatusCode,
        body: String,
    },

    /// The body was not JSON, or not the shape the endpoint promises
    #[error("unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl SourceError {
    pub fn is_missing_credential(&self) -> bool {
        matches!(self, SourceError::MissingCredential(_))
    }

    /// HTTP status for `Http` errors
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            SourceError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
