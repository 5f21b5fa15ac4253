//! The downstream generation batch: strategy, persona, and competitive
//! analysis per country plus one comparison, dispatched together.

use std::collections::BTreeMap;
use std::fmt;

use brandmap_core::BrandDescriptor;
use futures::future::BoxFuture;
use futures::FutureExt;

use crate::artifacts::{analyze_competition, compare_markets, generate_persona, generate_strategy};
use crate::error::StageError;
use crate::join::join_labeled;
use crate::pool::GenerationPool;
use crate::types::{
    BrandPersona, BrandStrategy, CompetitiveAnalysis, CountryResults, CulturalAnalysis,
    CulturalProfile, MarketComparison,
};

/// Per-country artifact kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKind {
    Strategy,
    Persona,
    CompetitiveAnalysis,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Strategy,
        ArtifactKind::Persona,
        ArtifactKind::CompetitiveAnalysis,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Strategy => "strategy",
            ArtifactKind::Persona => "persona",
            ArtifactKind::CompetitiveAnalysis => "competitive_analysis",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of one task in the batch. Outcomes are regrouped by this label,
/// never by position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TaskLabel {
    Country { country: String, kind: ArtifactKind },
    Comparison,
}

impl TaskLabel {
    pub fn country(country: impl Into<String>, kind: ArtifactKind) -> Self {
        Self::Country {
            country: country.into(),
            kind,
        }
    }
}

impl fmt::Display for TaskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskLabel::Country { country, kind } => write!(f, "{kind}:{country}"),
            TaskLabel::Comparison => f.write_str("comparison"),
        }
    }
}

/// A generated artifact of any kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Strategy(BrandStrategy),
    Persona(BrandPersona),
    CompetitiveAnalysis(CompetitiveAnalysis),
    Comparison(MarketComparison),
}

impl Artifact {
    fn kind_name(&self) -> &'static str {
        match self {
            Artifact::Strategy(_) => "strategy",
            Artifact::Persona(_) => "persona",
            Artifact::CompetitiveAnalysis(_) => "competitive_analysis",
            Artifact::Comparison(_) => "comparison",
        }
    }

    fn mismatch(&self, expected: &str) -> StageError {
        StageError::failed(format!(
            "expected a {expected} artifact, got {}",
            self.kind_name()
        ))
    }

    /// # Errors
    ///
    /// Returns [`StageError::Failed`] if this is not a strategy.
    pub fn into_strategy(self) -> Result<BrandStrategy, StageError> {
        match self {
            Artifact::Strategy(v) => Ok(v),
            other => Err(other.mismatch("strategy")),
        }
    }

    /// # Errors
    ///
    /// Returns [`StageError::Failed`] if this is not a persona.
    pub fn into_persona(self) -> Result<BrandPersona, StageError> {
        match self {
            Artifact::Persona(v) => Ok(v),
            other => Err(other.mismatch("persona")),
        }
    }

    /// # Errors
    ///
    /// Returns [`StageError::Failed`] if this is not a competitive analysis.
    pub fn into_competitive_analysis(self) -> Result<CompetitiveAnalysis, StageError> {
        match self {
            Artifact::CompetitiveAnalysis(v) => Ok(v),
            other => Err(other.mismatch("competitive_analysis")),
        }
    }

    /// # Errors
    ///
    /// Returns [`StageError::Failed`] if this is not a comparison.
    pub fn into_comparison(self) -> Result<MarketComparison, StageError> {
        match self {
            Artifact::Comparison(v) => Ok(v),
            other => Err(other.mismatch("comparison")),
        }
    }
}

pub type ArtifactTask<'a> = BoxFuture<'a, Result<Artifact, StageError>>;
pub type Outcome = (TaskLabel, Result<Artifact, StageError>);

/// Builds the labeled batch: three tasks per target country plus one
/// comparison, `3N + 1` in total.
pub fn build_batch<'a>(
    pool: &'a GenerationPool,
    descriptor: &'a BrandDescriptor,
    profiles: &'a BTreeMap<String, CulturalProfile>,
    analyses: &'a CountryResults<CulturalAnalysis>,
) -> Vec<(TaskLabel, ArtifactTask<'a>)> {
    let mut batch: Vec<(TaskLabel, ArtifactTask<'a>)> =
        Vec::with_capacity(descriptor.target_countries().len() * 3 + 1);

    for country in descriptor.target_countries() {
        let strategy = generate_strategy(pool, descriptor, country, analyses.get(country))
            .map(|r| r.map(Artifact::Strategy))
            .boxed();
        let persona = generate_persona(pool, country, profiles.get(country))
            .map(|r| r.map(Artifact::Persona))
            .boxed();
        let competitive = analyze_competition(
            pool,
            descriptor.brand_name(),
            descriptor.competitors(),
            country,
        )
        .map(|r| r.map(Artifact::CompetitiveAnalysis))
        .boxed();

        batch.push((TaskLabel::country(country, ArtifactKind::Strategy), strategy));
        batch.push((TaskLabel::country(country, ArtifactKind::Persona), persona));
        batch.push((
            TaskLabel::country(country, ArtifactKind::CompetitiveAnalysis),
            competitive,
        ));
    }

    batch.push((
        TaskLabel::Comparison,
        compare_markets(pool, analyses)
            .map(|r| r.map(Artifact::Comparison))
            .boxed(),
    ));
    batch
}

/// Runs every task in the batch concurrently and returns labeled outcomes
/// in completion order.
pub async fn run_batch(batch: Vec<(TaskLabel, ArtifactTask<'_>)>) -> Vec<Outcome> {
    let outcomes = join_labeled(batch).await;
    for (label, outcome) in &outcomes {
        if let Err(e) = outcome {
            tracing::warn!(task = %label, error = %e, "generation task failed");
        }
    }
    outcomes
}
