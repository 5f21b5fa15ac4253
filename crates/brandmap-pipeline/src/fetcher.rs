//! Per-country location resolution and insight gathering.

use std::future::Future;
use std::time::Duration;

use brandmap_qloo::{CulturalInsights, DateRange, Entity, EntityType, QlooError, Signal};
use chrono::NaiveDate;
use serde_json::Value;
use tokio::time::Instant;

use crate::error::StageError;
use crate::join::settle;
use crate::types::{CulturalProfile, ProfileSignals, TrendingSignals};

/// Entities requested per insight and trending call.
pub const INSIGHT_LIMIT: u32 = 8;
/// Names kept per insight list.
pub const MAX_NAMES: usize = 8;
/// Trailing window for trending queries, in days.
pub const TRENDING_WINDOW_DAYS: i64 = 90;

const LOCATION_TYPES: [EntityType; 2] = [EntityType::Destination, EntityType::Locality];

/// Shared cutoff for every call made on behalf of one country.
///
/// Each call races the same instant independently, so an overrun empties
/// only the field it was filling.
#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    budget: Duration,
}

impl Deadline {
    fn starting_now(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
            budget,
        }
    }

    async fn run<T, F>(self, call: F) -> Result<T, StageError>
    where
        F: Future<Output = Result<T, QlooError>>,
    {
        match tokio::time::timeout_at(self.at, call).await {
            Ok(result) => result.map_err(|e| StageError::failed(e.to_string())),
            Err(_) => Err(StageError::TimedOut(self.budget)),
        }
    }
}

/// Builds the cultural profile for one country, with every remote call cut
/// off `budget` after the fetch starts.
///
/// A country whose location cannot be resolved short-circuits to an
/// unavailable profile with no further calls. Otherwise the six signal calls
/// run concurrently and each failure or overrun empties only its own field.
/// Never fails.
pub async fn fetch_country_profile(
    insights: &dyn CulturalInsights,
    country: &str,
    today: NaiveDate,
    budget: Duration,
) -> CulturalProfile {
    let deadline = Deadline::starting_now(budget);

    let candidates = match deadline.run(insights.search(country, &LOCATION_TYPES)).await {
        Ok(candidates) => candidates,
        Err(e @ StageError::TimedOut(_)) => {
            tracing::warn!(country = %country, error = %e, "location search overran budget");
            return CulturalProfile::unavailable(
                country,
                format!("Location lookup for {country} {e}."),
            );
        }
        Err(e) => {
            tracing::warn!(country = %country, error = %e, "location search failed");
            Vec::new()
        }
    };

    let Some(first) = candidates.first() else {
        tracing::info!(country = %country, "no location entity found");
        return CulturalProfile::unavailable(
            country,
            format!("Could not find location information for {country}."),
        );
    };
    let Some(location_id) = first.identifier().map(ToOwned::to_owned) else {
        tracing::info!(country = %country, "location entity carries no identifier");
        return CulturalProfile::unavailable(
            country,
            format!("No valid entity ID found for {country}."),
        );
    };

    let interests = std::slice::from_ref(&location_id);
    let window = DateRange::trailing(today, TRENDING_WINDOW_DAYS);

    let (music, fashion, entertainment, places, demographics, trending) = tokio::join!(
        insight_names(insights, deadline, country, EntityType::Artist, "music"),
        insight_names(insights, deadline, country, EntityType::Brand, "fashion"),
        insight_names(insights, deadline, country, EntityType::Movie, "entertainment"),
        insight_names(insights, deadline, country, EntityType::Place, "places"),
        field(
            country,
            "demographics",
            deadline.run(insights.demographics(interests)),
            || Value::Object(serde_json::Map::new()),
        ),
        field(
            country,
            "trending",
            deadline.run(insights.trending(EntityType::Artist, interests, window, INSIGHT_LIMIT)),
            Vec::new,
        ),
    );

    CulturalProfile::Resolved(ProfileSignals {
        country: country.to_owned(),
        location_id,
        music,
        fashion,
        entertainment,
        places,
        demographics,
        trending: TrendingSignals {
            music: names(trending),
        },
    })
}

async fn insight_names(
    insights: &dyn CulturalInsights,
    deadline: Deadline,
    country: &str,
    filter: EntityType,
    field_name: &'static str,
) -> Vec<String> {
    let entities = field(
        country,
        field_name,
        deadline.run(insights.insights(filter, Signal::Location(country), INSIGHT_LIMIT)),
        Vec::new,
    )
    .await;
    names(entities)
}

/// Awaits one signal call, substituting `default` on error, overrun or panic.
async fn field<T, F>(
    country: &str,
    field_name: &'static str,
    call: F,
    default: impl FnOnce() -> T,
) -> T
where
    F: Future<Output = Result<T, StageError>>,
{
    match settle(call).await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(
                country = %country,
                field = field_name,
                error = %e,
                "insight call failed; leaving field empty"
            );
            default()
        }
    }
}

fn names(entities: Vec<Entity>) -> Vec<String> {
    entities
        .into_iter()
        .filter_map(|entity| entity.name)
        .take(MAX_NAMES)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_skips_unnamed_and_caps_length() {
        let mut entities: Vec<Entity> =
            (0..12).map(|i| Entity::named(&format!("n{i}"))).collect();
        entities.insert(1, Entity::default());

        let kept = names(entities);

        assert_eq!(kept.len(), 8);
        assert_eq!(kept[0], "n0");
        assert_eq!(kept[1], "n1");
    }
}
