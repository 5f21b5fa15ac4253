//! Profile fan-out across all target countries.

use std::collections::BTreeMap;
use std::time::Duration;

use brandmap_qloo::CulturalInsights;
use chrono::NaiveDate;

use crate::error::StageError;
use crate::fetcher::fetch_country_profile;
use crate::join::join_labeled;
use crate::types::CulturalProfile;

/// Fetches every country's profile concurrently. Each country's remote calls
/// share a `budget` measured from the start of its fetch.
///
/// Always returns exactly one entry per input country. A country whose fetch
/// panics gets an unavailable profile.
pub async fn fetch_profiles(
    insights: &dyn CulturalInsights,
    countries: &[String],
    budget: Duration,
    today: NaiveDate,
) -> BTreeMap<String, CulturalProfile> {
    let units = countries.iter().map(|country| {
        let unit = async move {
            Ok::<_, StageError>(fetch_country_profile(insights, country, today, budget).await)
        };
        (country.clone(), unit)
    });

    join_labeled(units)
        .await
        .into_iter()
        .map(|(country, outcome)| {
            let profile = outcome.unwrap_or_else(|e| {
                tracing::error!(country = %country, error = %e, "profile fetch failed");
                CulturalProfile::unavailable(
                    country.as_str(),
                    format!("Failed to build profile for {country}: {e}"),
                )
            });
            (country, profile)
        })
        .collect()
}
