use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("GEMINI_API_KEY not configured")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gemini returned status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("Gemini response parse error: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("Gemini response contained no candidate text")]
    NoCandidates,

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
