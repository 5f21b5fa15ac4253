//! Gemini `generateContent` HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::GeminiError;
use crate::generator::TextGenerator;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Gemini REST client.
pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    endpoint: Url,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    /// Creates a client for `model` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`GeminiError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn new(
        api_key: Option<&str>,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, GeminiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("brandmap/0.1 (generation)")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(&format!("v1beta/models/{model}:generateContent")))
            .map_err(|e| GeminiError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            api_key: api_key.map(ToOwned::to_owned),
            endpoint,
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Sends one prompt and returns the concatenated text of the first
    /// candidate.
    ///
    /// # Errors
    ///
    /// - [`GeminiError::MissingApiKey`] without sending anything if no key is set.
    /// - [`GeminiError::Http`] on network failure or timeout.
    /// - [`GeminiError::UnexpectedStatus`] on a non-2xx status.
    /// - [`GeminiError::Deserialize`] if the body does not parse.
    /// - [`GeminiError::NoCandidates`] if no candidate carries text.
    pub async fn generate_content(&self, prompt: &str) -> Result<String, GeminiError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(GeminiError::MissingApiKey);
        };

        let request = GenerateRequest {
            contents: [Content {
                parts: [RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(GeminiError::UnexpectedStatus {
                status: status.as_u16(),
                body: truncate(&body, 200),
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(GeminiError::Deserialize)?;

        parsed
            .candidates
            .into_iter()
            .find_map(|candidate| {
                let parts = candidate.content?.parts;
                let text: String = parts.into_iter().filter_map(|p| p.text).collect();
                (!text.is_empty()).then_some(text)
            })
            .ok_or(GeminiError::NoCandidates)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn complete(&self, prompt: &str) -> String {
        match self.generate_content(prompt).await {
            Ok(text) => text,
            Err(GeminiError::MissingApiKey) => {
                tracing::warn!("GEMINI_API_KEY not configured; returning empty generation");
                String::new()
            }
            Err(e) => {
                tracing::error!(error = %e, "error generating response from Gemini");
                String::new()
            }
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
