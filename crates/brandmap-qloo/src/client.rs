//! HTTP client for the Qloo REST API.
//!
//! Every endpoint returns a `Result`; the lenient "empty on failure" contract
//! lives in the [`CulturalInsights`](crate::CulturalInsights) implementation,
//! not here, so the typed errors stay testable.

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use crate::error::QlooError;
use crate::types::{DateRange, Entity, EntityType, Signal};

pub const DEFAULT_BASE_URL: &str = "https://hackathon.api.qloo.com";

/// Results requested from the search endpoint.
const SEARCH_TAKE: u32 = 5;

/// Client for the Qloo REST API.
///
/// Holds an optional API key: without one every call fails fast with
/// [`QlooError::MissingApiKey`] and no request is sent.
pub struct QlooClient {
    client: Client,
    api_key: Option<String>,
    base_url: Url,
}

impl QlooClient {
    /// Creates a client for `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`QlooError::Http`] if the underlying `reqwest::Client` cannot
    /// be constructed, or [`QlooError::InvalidBaseUrl`] if `base_url` does not
    /// parse.
    pub fn new(
        api_key: Option<&str>,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, QlooError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("brandmap/0.1 (cultural-insights)")
            .build()?;

        // A trailing slash makes `Url::join` append endpoints instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| QlooError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.map(ToOwned::to_owned),
            base_url,
        })
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Searches entities by name, restricted to `types`.
    ///
    /// # Errors
    ///
    /// Propagates any [`QlooError`] from the request.
    pub async fn search_entities(
        &self,
        query: &str,
        types: &[EntityType],
    ) -> Result<Vec<Entity>, QlooError> {
        let types = join_urns(types);
        let take = SEARCH_TAKE.to_string();
        let url = self.build_url(
            "search",
            &[("query", query), ("types", &types), ("take", &take)],
        )?;
        let body = self.request_json(url, "search").await?;

        Ok(parse_entities(body.get("results")))
    }

    /// Fetches `take` top entities of `filter` type for the given signal.
    ///
    /// Returns an empty list when the envelope is not `success: true`.
    ///
    /// # Errors
    ///
    /// Propagates any [`QlooError`] from the request.
    pub async fn get_insights(
        &self,
        filter: EntityType,
        signal: Signal<'_>,
        take: u32,
    ) -> Result<Vec<Entity>, QlooError> {
        let take = take.to_string();
        let (signal_key, signal_value) = signal_param(signal);
        let url = self.build_url(
            "v2/insights",
            &[
                ("filter.type", filter.urn()),
                ("take", &take),
                (signal_key, &signal_value),
            ],
        )?;
        let body = self.request_json(url, "v2/insights").await?;

        Ok(successful_results(&body)
            .map(|results| parse_entities(results.get("entities")))
            .unwrap_or_default())
    }

    /// Fetches the demographic breakdown for the given interest entities.
    ///
    /// The record is passed through untouched; an empty object is returned
    /// when the envelope is not `success: true`.
    ///
    /// # Errors
    ///
    /// Propagates any [`QlooError`] from the request.
    pub async fn get_demographics(&self, entity_ids: &[String]) -> Result<Value, QlooError> {
        let (signal_key, signal_value) = signal_param(Signal::Interests(entity_ids));
        let url = self.build_url(
            "v2/insights",
            &[
                ("filter.type", EntityType::Demographics.urn()),
                (signal_key, &signal_value),
            ],
        )?;
        let body = self.request_json(url, "v2/insights (demographics)").await?;

        Ok(successful_results(&body)
            .and_then(|results| results.get("demographics"))
            .cloned()
            .unwrap_or_else(empty_record))
    }

    /// Fetches trending entities of `filter` type over `window`.
    ///
    /// Trending items name their entity either directly or under a nested
    /// `entity` object; both shapes are flattened into [`Entity`].
    ///
    /// # Errors
    ///
    /// Propagates any [`QlooError`] from the request.
    pub async fn get_trending(
        &self,
        filter: EntityType,
        entity_ids: &[String],
        window: DateRange,
        take: u32,
    ) -> Result<Vec<Entity>, QlooError> {
        let (signal_key, signal_value) = signal_param(Signal::Interests(entity_ids));
        let start = window.start_param();
        let end = window.end_param();
        let take = take.to_string();
        let url = self.build_url(
            "v2/trending",
            &[
                ("filter.type", filter.urn()),
                (signal_key, &signal_value),
                ("filter.start_date", &start),
                ("filter.end_date", &end),
                ("take", &take),
            ],
        )?;
        let body = self.request_json(url, "v2/trending").await?;

        let Some(Value::Array(items)) = successful_results(&body) else {
            return Ok(Vec::new());
        };
        Ok(items.iter().filter_map(trending_entity).collect())
    }

    /// Builds the endpoint URL with percent-encoded query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`QlooError::InvalidBaseUrl`] if `endpoint` cannot be joined
    /// onto the base URL.
    pub(crate) fn build_url(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Url, QlooError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| QlooError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(url)
    }

    /// Sends an authenticated GET and parses the body as JSON.
    ///
    /// # Errors
    ///
    /// - [`QlooError::MissingApiKey`] without sending anything if no key is set.
    /// - [`QlooError::Http`] on network failure or timeout.
    /// - [`QlooError::UnexpectedStatus`] on a non-2xx status.
    /// - [`QlooError::Deserialize`] if the body is not JSON.
    async fn request_json(&self, url: Url, endpoint: &str) -> Result<Value, QlooError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(QlooError::MissingApiKey);
        };

        tracing::debug!(%url, "qloo request");
        let response = self
            .client
            .get(url)
            .header("x-api-key", api_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QlooError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| QlooError::Deserialize {
            context: endpoint.to_string(),
            source: e,
        })
    }
}

fn join_urns(types: &[EntityType]) -> String {
    types
        .iter()
        .map(|t| t.urn())
        .collect::<Vec<_>>()
        .join(",")
}

fn signal_param(signal: Signal<'_>) -> (&'static str, String) {
    match signal {
        Signal::Location(query) => ("signal.location.query", query.to_string()),
        Signal::Interests(ids) => ("signal.interests.entities", ids.join(",")),
    }
}

/// Returns `results` only when the envelope reports `success: true`.
fn successful_results(body: &Value) -> Option<&Value> {
    if body.get("success").and_then(Value::as_bool) != Some(true) {
        return None;
    }
    body.get("results")
}

/// Parses an array of entities, skipping malformed elements.
fn parse_entities(value: Option<&Value>) -> Vec<Entity> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| {
            serde_json::from_value::<Entity>(item.clone())
                .map_err(|e| {
                    tracing::debug!(error = %e, "skipping malformed qloo entity");
                })
                .ok()
        })
        .collect()
}

fn trending_entity(item: &Value) -> Option<Entity> {
    let name = item
        .get("name")
        .and_then(Value::as_str)
        .or_else(|| item.get("entity")?.get("name")?.as_str())?;
    let entity_id = item
        .get("entity_id")
        .or_else(|| item.get("entity")?.get("entity_id"))
        .and_then(Value::as_str)
        .map(ToOwned::to_owned);
    Some(Entity {
        entity_id,
        id: None,
        name: Some(name.to_string()),
    })
}

pub(crate) fn empty_record() -> Value {
    Value::Object(serde_json::Map::new())
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
