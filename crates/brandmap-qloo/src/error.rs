use thiserror::Error;

/// Errors returned by the Qloo API client.
#[derive(Debug, Error)]
pub enum QlooError {
    /// No API key is configured; the call was not attempted.
    #[error("QLOO_API_KEY not configured")]
    MissingApiKey,

    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },

    /// The response body could not be parsed as JSON.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Any other failure, mostly raised by test doubles.
    #[error("{0}")]
    Other(String),
}
