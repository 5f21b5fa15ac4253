//! Cultural analysis per country.

use std::collections::BTreeMap;

use crate::artifacts::analyze_profile;
use crate::join::join_labeled;
use crate::pool::GenerationPool;
use crate::types::{CountryResults, CulturalAnalysis, CulturalProfile, TaskResult};

/// Runs one analysis per profile concurrently.
///
/// Unavailable profiles are answered with an error result without spending a
/// generation call.
pub async fn analyze_profiles(
    pool: &GenerationPool,
    profiles: &BTreeMap<String, CulturalProfile>,
) -> CountryResults<CulturalAnalysis> {
    let units = profiles
        .iter()
        .map(|(country, profile)| (country.clone(), analyze_profile(pool, profile)));

    join_labeled(units)
        .await
        .into_iter()
        .map(|(country, outcome)| {
            if let Err(e) = &outcome {
                tracing::warn!(country = %country, error = %e, "cultural analysis failed");
            }
            (country, TaskResult::from(outcome))
        })
        .collect()
}
