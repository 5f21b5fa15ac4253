//! The cultural-insights capability consumed by the brand map pipeline.

use async_trait::async_trait;
use serde_json::Value;

use crate::client::{empty_record, QlooClient};
use crate::error::QlooError;
use crate::types::{DateRange, Entity, EntityType, Signal};

/// Read-only cultural data source.
///
/// Implementations may return `Err`; callers must still degrade every error to
/// an empty value for the one field it affects. An `Ok` empty value is not
/// evidence of absence: the production client reports missing credentials and
/// failed requests that way.
#[async_trait]
pub trait CulturalInsights: Send + Sync {
    /// Entities matching `query` among `types`, best match first.
    async fn search(&self, query: &str, types: &[EntityType]) -> Result<Vec<Entity>, QlooError>;

    /// Top `take` entities of type `filter` for `signal`.
    async fn insights(
        &self,
        filter: EntityType,
        signal: Signal<'_>,
        take: u32,
    ) -> Result<Vec<Entity>, QlooError>;

    /// Demographic record for the interest entities.
    async fn demographics(&self, entity_ids: &[String]) -> Result<Value, QlooError>;

    /// Ranked trending entities of type `filter` over `window`.
    async fn trending(
        &self,
        filter: EntityType,
        entity_ids: &[String],
        window: DateRange,
        take: u32,
    ) -> Result<Vec<Entity>, QlooError>;
}

/// Logs a failed call and substitutes the empty default.
fn degrade<T>(endpoint: &str, result: Result<T, QlooError>, default: impl FnOnce() -> T) -> T {
    match result {
        Ok(value) => value,
        Err(QlooError::MissingApiKey) => {
            tracing::warn!(endpoint, "QLOO_API_KEY not configured; skipping qloo call");
            default()
        }
        Err(e) => {
            tracing::error!(endpoint, error = %e, "qloo request failed");
            default()
        }
    }
}

#[async_trait]
impl CulturalInsights for QlooClient {
    async fn search(&self, query: &str, types: &[EntityType]) -> Result<Vec<Entity>, QlooError> {
        Ok(degrade(
            "search",
            self.search_entities(query, types).await,
            Vec::new,
        ))
    }

    async fn insights(
        &self,
        filter: EntityType,
        signal: Signal<'_>,
        take: u32,
    ) -> Result<Vec<Entity>, QlooError> {
        Ok(degrade(
            "v2/insights",
            self.get_insights(filter, signal, take).await,
            Vec::new,
        ))
    }

    async fn demographics(&self, entity_ids: &[String]) -> Result<Value, QlooError> {
        Ok(degrade(
            "v2/insights (demographics)",
            self.get_demographics(entity_ids).await,
            empty_record,
        ))
    }

    async fn trending(
        &self,
        filter: EntityType,
        entity_ids: &[String],
        window: DateRange,
        take: u32,
    ) -> Result<Vec<Entity>, QlooError> {
        Ok(degrade(
            "v2/trending",
            self.get_trending(filter, entity_ids, window, take).await,
            Vec::new,
        ))
    }
}
