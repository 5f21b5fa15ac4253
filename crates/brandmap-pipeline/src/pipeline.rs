use std::sync::Arc;
use std::time::Duration;

use brandmap_core::{AppConfig, BrandDescriptor};
use brandmap_gemini::{GeminiClient, TextGenerator};
use brandmap_qloo::{CulturalInsights, QlooClient};
use chrono::{NaiveDate, Utc};

use crate::aggregator::fetch_profiles;
use crate::analyzer::analyze_profiles;
use crate::assembler::assemble;
use crate::error::BuildError;
use crate::generation::{build_batch, run_batch};
use crate::pool::GenerationPool;
use crate::types::BrandMap;

/// Tunables that are not owned by either collaborator client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Upper bound on one country's whole profile fetch.
    pub profile_budget: Duration,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            profile_budget: Duration::from_secs(60),
        }
    }
}

/// Runs brand map requests against a pair of collaborators.
///
/// Holds no per-request state; one instance serves any number of concurrent
/// requests.
#[derive(Clone)]
pub struct BrandMapPipeline {
    insights: Arc<dyn CulturalInsights>,
    generation: GenerationPool,
    settings: PipelineSettings,
}

impl BrandMapPipeline {
    pub fn new(
        insights: Arc<dyn CulturalInsights>,
        generation: GenerationPool,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            insights,
            generation,
            settings,
        }
    }

    /// Builds the production pipeline from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if either HTTP client cannot be constructed.
    pub fn from_config(config: &AppConfig) -> Result<Self, BuildError> {
        let insights = QlooClient::new(
            config.qloo_api_key.as_deref(),
            config.qloo_request_timeout_secs,
            &config.qloo_base_url,
        )?;
        if !insights.has_api_key() {
            tracing::warn!(
                "QLOO_API_KEY is not set; every cultural profile will come back empty"
            );
        }
        if config.gemini_api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY is not set; every generated artifact will be empty");
        }

        let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(
            config.gemini_api_key.as_deref(),
            &config.gemini_model,
            config.gemini_request_timeout_secs,
            &config.gemini_base_url,
        )?);

        Ok(Self::new(
            Arc::new(insights),
            GenerationPool::new(generator, config.generation_workers),
            PipelineSettings {
                profile_budget: Duration::from_secs(config.profile_budget_secs),
            },
        ))
    }

    #[must_use]
    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    /// Produces the brand map for a validated request. Never fails: every
    /// degraded unit shows up as an error result inside the map.
    pub async fn run(&self, descriptor: BrandDescriptor) -> BrandMap {
        self.run_on(descriptor, Utc::now().date_naive()).await
    }

    /// Like [`run`](Self::run), with trending windows ending on `today`.
    pub async fn run_on(&self, descriptor: BrandDescriptor, today: NaiveDate) -> BrandMap {
        let countries = descriptor.target_countries();
        tracing::info!(
            brand = %descriptor.brand_name(),
            countries = countries.len(),
            "starting brand map"
        );

        let profiles = fetch_profiles(
            self.insights.as_ref(),
            countries,
            self.settings.profile_budget,
            today,
        )
        .await;
        let unavailable = profiles.values().filter(|p| p.error().is_some()).count();
        tracing::info!(unavailable, "cultural profiles fetched");

        let analyses = analyze_profiles(&self.generation, &profiles).await;
        tracing::info!(
            failed = analyses.values().filter(|r| !r.is_success()).count(),
            "cultural analysis complete"
        );

        let batch = build_batch(&self.generation, &descriptor, &profiles, &analyses);
        let tasks = batch.len();
        let outcomes = run_batch(batch).await;
        tracing::info!(
            tasks,
            failed = outcomes.iter().filter(|(_, r)| r.is_err()).count(),
            "generation batch complete"
        );

        assemble(descriptor, analyses, outcomes)
    }
}

impl std::fmt::Debug for BrandMapPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrandMapPipeline")
            .field("generation", &self.generation)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
