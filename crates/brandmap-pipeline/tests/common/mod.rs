#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use brandmap_core::{BrandDescriptor, BrandMapRequest};
use brandmap_gemini::{BlockingTextGenerator, TextGenerator};
use brandmap_pipeline::{BrandMapPipeline, GenerationPool, PipelineSettings};
use brandmap_qloo::{CulturalInsights, DateRange, Entity, EntityType, QlooError, Signal};
use serde_json::{json, Value};

pub const COUNTRIES: [&str; 5] = ["Japan", "Brazil", "Germany", "Kenya", "Mexico"];

pub fn location_id(country: &str) -> String {
    format!("LOC-{country}")
}

fn country_of(location_id: &str) -> String {
    location_id.trim_start_matches("LOC-").to_string()
}

/// One recorded collaborator call, attributed to the country it served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub endpoint: &'static str,
    pub country: String,
}

/// Deterministic cultural-insights stub.
#[derive(Default)]
pub struct StubInsights {
    pub no_location: HashSet<String>,
    pub missing_id: HashSet<String>,
    /// `(country, filter)` pairs whose insight call fails.
    pub failing: HashSet<(String, EntityType)>,
    pub panic_on_search: HashSet<String>,
    pub slow_search: HashMap<String, Duration>,
    pub slow_trending: HashMap<String, Duration>,
    calls: Mutex<Vec<Call>>,
}

impl StubInsights {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("lock").clone()
    }

    pub fn calls_for(&self, country: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.country == country)
            .collect()
    }

    fn record(&self, endpoint: &'static str, country: &str) {
        self.calls.lock().expect("lock").push(Call {
            endpoint,
            country: country.to_string(),
        });
    }
}

fn entities(prefix: &str, count: usize) -> Vec<Entity> {
    (0..count)
        .map(|i| Entity::named(&format!("{prefix} {i}")))
        .collect()
}

#[async_trait]
impl CulturalInsights for StubInsights {
    async fn search(&self, query: &str, _types: &[EntityType]) -> Result<Vec<Entity>, QlooError> {
        self.record("search", query);
        if let Some(delay) = self.slow_search.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.panic_on_search.contains(query) {
            panic!("search index corrupted for {query}");
        }
        if self.no_location.contains(query) {
            return Ok(Vec::new());
        }
        if self.missing_id.contains(query) {
            return Ok(vec![Entity::named(query)]);
        }
        Ok(vec![Entity {
            entity_id: Some(location_id(query)),
            id: None,
            name: Some(query.to_string()),
        }])
    }

    async fn insights(
        &self,
        filter: EntityType,
        signal: Signal<'_>,
        _take: u32,
    ) -> Result<Vec<Entity>, QlooError> {
        let country = match signal {
            Signal::Location(country) => country.to_string(),
            Signal::Interests(ids) => ids.first().map(|id| country_of(id)).unwrap_or_default(),
        };
        self.record("insights", &country);
        if self.failing.contains(&(country.clone(), filter)) {
            return Err(QlooError::Other("simulated timeout".to_string()));
        }
        Ok(entities(&format!("{country} {filter}"), 10))
    }

    async fn demographics(&self, entity_ids: &[String]) -> Result<Value, QlooError> {
        let country = entity_ids.first().map(|id| country_of(id)).unwrap_or_default();
        self.record("demographics", &country);
        Ok(json!({ "country": country, "median_age": 40 }))
    }

    async fn trending(
        &self,
        _filter: EntityType,
        entity_ids: &[String],
        _window: DateRange,
        _take: u32,
    ) -> Result<Vec<Entity>, QlooError> {
        let country = entity_ids.first().map(|id| country_of(id)).unwrap_or_default();
        self.record("trending", &country);
        if let Some(delay) = self.slow_trending.get(&country) {
            tokio::time::sleep(*delay).await;
        }
        Ok(entities(&format!("{country} trending"), 3))
    }
}

/// Generation stub that answers with the prompt's first line.
#[derive(Default)]
pub struct StubGenerator {
    /// Prompts containing any of these panic.
    pub panic_on: Vec<String>,
    /// Prompts containing the key are delayed by the value.
    pub delays: Vec<(String, Duration)>,
    /// Answer every prompt with empty text.
    pub silent: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl StubGenerator {
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("lock").clone()
    }

    fn answer(&self, prompt: &str) -> String {
        self.prompts.lock().expect("lock").push(prompt.to_string());
        if let Some(trigger) = self.panic_on.iter().find(|t| prompt.contains(t.as_str())) {
            panic!("generator crashed on {trigger}");
        }
        if self.silent {
            return String::new();
        }
        first_line(prompt)
    }
}

pub fn first_line(prompt: &str) -> String {
    prompt.lines().next().unwrap_or_default().to_string()
}

#[async_trait]
impl TextGenerator for StubGenerator {
    async fn complete(&self, prompt: &str) -> String {
        let delay = self
            .delays
            .iter()
            .find(|(key, _)| prompt.contains(key.as_str()))
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.answer(prompt)
    }
}

/// Blocking variant for exercising the worker-pool path.
pub struct BlockingStub;

impl BlockingTextGenerator for BlockingStub {
    fn complete_blocking(&self, prompt: &str) -> String {
        std::thread::sleep(Duration::from_millis(5));
        first_line(prompt)
    }
}

pub fn descriptor(countries: &[&str]) -> BrandDescriptor {
    BrandMapRequest {
        brand_name: Some("Koa Tea".to_string()),
        brand_description: Some("Small-batch Hawaiian tea".to_string()),
        origin_country: Some("United States".to_string()),
        target_countries: Some(countries.iter().map(ToString::to_string).collect()),
        brand_keywords: Some(vec!["tea".to_string(), "wellness".to_string()]),
        competitors: Some(vec!["Ito En".to_string()]),
    }
    .validate()
    .expect("valid descriptor")
}

pub fn pipeline(
    insights: Arc<StubInsights>,
    generator: Arc<StubGenerator>,
    budget: Duration,
) -> BrandMapPipeline {
    let generator: Arc<dyn TextGenerator> = generator;
    BrandMapPipeline::new(
        insights,
        GenerationPool::new(generator, 4),
        PipelineSettings {
            profile_budget: budget,
        },
    )
}
