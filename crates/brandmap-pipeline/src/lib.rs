//! Staged brand map orchestration.
//!
//! A request flows through four strictly sequential stages, each a concurrent
//! fan-out that fully joins before the next begins:
//!
//! 1. [`aggregator::fetch_profiles`]: one [`fetcher::fetch_country_profile`]
//!    per target country, each issuing its own six insight calls.
//! 2. [`analyzer::analyze_profiles`]: one cultural analysis per country.
//! 3. [`generation::run_batch`]: strategy, persona, and competitive analysis
//!    per country plus one cross-country comparison, as one labeled batch.
//! 4. [`assembler::assemble`]: regroups the batch by label into a [`BrandMap`].
//!
//! Every unit of work ends as a [`TaskResult`]. Failures, including panics,
//! are captured as data at the unit that produced them and never cancel
//! sibling units or abort the request.

pub mod aggregator;
pub mod analyzer;
pub mod artifacts;
pub mod assembler;
pub mod error;
pub mod fetcher;
pub mod generation;
pub mod join;
pub mod pipeline;
pub mod pool;
pub mod types;

pub use error::{BuildError, StageError};
pub use generation::{Artifact, ArtifactKind, TaskLabel};
pub use pipeline::{BrandMapPipeline, PipelineSettings};
pub use pool::GenerationPool;
pub use types::{
    BrandMap, BrandPersona, BrandStrategy, CompetitiveAnalysis, CulturalAnalysis, CulturalProfile,
    MarketComparison, ProfileSignals, TaskResult, TrendingSignals,
};
