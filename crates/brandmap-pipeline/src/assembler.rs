//! Regroups labeled generation outcomes into a [`BrandMap`].

use std::collections::BTreeMap;

use brandmap_core::BrandDescriptor;

use crate::error::StageError;
use crate::generation::{Artifact, ArtifactKind, Outcome, TaskLabel};
use crate::types::{BrandMap, CountryResults, CulturalAnalysis, TaskResult};

/// Builds the brand map from the analysis stage and the generation batch.
///
/// Outcomes may arrive in any order. Each per-country map ends up with exactly
/// the target countries as keys: a target with no outcome for some kind gets
/// an error result, and outcomes labeled for any other country are dropped.
pub fn assemble(
    descriptor: BrandDescriptor,
    analyses: CountryResults<CulturalAnalysis>,
    outcomes: Vec<Outcome>,
) -> BrandMap {
    let mut by_label: BTreeMap<TaskLabel, Result<Artifact, StageError>> = BTreeMap::new();
    for (label, outcome) in outcomes {
        if by_label.insert(label.clone(), outcome).is_some() {
            tracing::warn!(task = %label, "duplicate outcome for task; keeping the last");
        }
    }

    let mut take = |country: &str, kind: ArtifactKind| -> TaskResult<Artifact> {
        by_label
            .remove(&TaskLabel::country(country, kind))
            .unwrap_or_else(|| Err(StageError::failed(format!("no {kind} was produced"))))
            .into()
    };

    let mut brand_strategies = CountryResults::new();
    let mut brand_personas = CountryResults::new();
    let mut competitive_analysis = CountryResults::new();
    for country in descriptor.target_countries() {
        brand_strategies.insert(
            country.clone(),
            take(country.as_str(), ArtifactKind::Strategy).and_then(Artifact::into_strategy),
        );
        brand_personas.insert(
            country.clone(),
            take(country.as_str(), ArtifactKind::Persona).and_then(Artifact::into_persona),
        );
        competitive_analysis.insert(
            country.clone(),
            take(country.as_str(), ArtifactKind::CompetitiveAnalysis)
                .and_then(Artifact::into_competitive_analysis),
        );
    }

    let comparison: TaskResult<_> = by_label
        .remove(&TaskLabel::Comparison)
        .unwrap_or_else(|| Err(StageError::failed("no comparison was produced")))
        .and_then(Artifact::into_comparison)
        .into();

    let mut analyses = analyses;
    let cultural_analysis = descriptor
        .target_countries()
        .iter()
        .map(|country| {
            let result = analyses
                .remove(country)
                .unwrap_or_else(|| TaskResult::error("no cultural analysis was produced"));
            (country.clone(), result)
        })
        .collect();

    BrandMap {
        brand_info: descriptor,
        cultural_analysis,
        brand_strategies,
        brand_personas,
        competitive_analysis,
        comparison,
    }
}

#[cfg(test)]
#[path = "assembler_test.rs"]
mod tests;
