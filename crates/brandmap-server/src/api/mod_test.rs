use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use brandmap_gemini::TextGenerator;
use brandmap_pipeline::{GenerationPool, PipelineSettings};
use brandmap_qloo::{CulturalInsights, DateRange, Entity, EntityType, QlooError, Signal};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::*;

#[derive(Default)]
struct CountingInsights {
    calls: AtomicUsize,
}

#[async_trait]
impl CulturalInsights for CountingInsights {
    async fn search(&self, query: &str, _types: &[EntityType]) -> Result<Vec<Entity>, QlooError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Entity {
            entity_id: Some(format!("LOC-{query}")),
            ..Entity::default()
        }])
    }

    async fn insights(
        &self,
        _filter: EntityType,
        _signal: Signal<'_>,
        _take: u32,
    ) -> Result<Vec<Entity>, QlooError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Entity::named("Sample")])
    }

    async fn demographics(&self, _entity_ids: &[String]) -> Result<Value, QlooError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(json!({}))
    }

    async fn trending(
        &self,
        _filter: EntityType,
        _entity_ids: &[String],
        _window: DateRange,
        _take: u32,
    ) -> Result<Vec<Entity>, QlooError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct CountingGenerator {
    calls: AtomicUsize,
}

#[async_trait]
impl TextGenerator for CountingGenerator {
    async fn complete(&self, prompt: &str) -> String {
        self.calls.fetch_add(1, Ordering::SeqCst);
        prompt.lines().next().unwrap_or_default().to_string()
    }
}

struct Harness {
    app: Router,
    insights: Arc<CountingInsights>,
    generator: Arc<CountingGenerator>,
}

impl Harness {
    fn new() -> Self {
        let insights = Arc::new(CountingInsights::default());
        let generator = Arc::new(CountingGenerator::default());
        let pool_generator: Arc<dyn TextGenerator> = generator.clone();
        let pipeline = BrandMapPipeline::new(
            insights.clone(),
            GenerationPool::new(pool_generator, 2),
            PipelineSettings::default(),
        );
        Self {
            app: build_app(AppState {
                pipeline: Arc::new(pipeline),
            }),
            insights,
            generator,
        }
    }

    fn collaborator_calls(&self) -> usize {
        self.insights.calls.load(Ordering::SeqCst) + self.generator.calls.load(Ordering::SeqCst)
    }
}

fn request_body(countries: &[&str]) -> Value {
    json!({
        "brand_name": "Koa Tea",
        "brand_description": "Small-batch Hawaiian tea",
        "origin_country": "United States",
        "target_countries": countries,
        "brand_keywords": ["tea", "wellness"],
        "competitors": ["Ito En"]
    })
}

async fn post_json(app: Router, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/brandmap")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    (status, serde_json::from_slice(&body).expect("json parse"))
}

#[test]
fn api_error_codes_map_to_statuses() {
    let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ApiError::new("req-1", "bad_request", "nope").into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ApiError::new("req-1", "internal_error", "boom").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = ApiError::new("req-1", "not_found", "gone").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn api_error_omits_absent_details() {
    let json = serde_json::to_value(ApiError::new("req-1", "bad_request", "nope")).expect("json");
    assert!(json["error"].get("details").is_none());
    assert_eq!(json["meta"]["request_id"], "req-1");
}

#[tokio::test]
async fn health_echoes_request_id() {
    let harness = Harness::new();
    let response = harness
        .app
        .oneshot(
            Request::builder()
                .uri("/api/v1/health")
                .header("x-request-id", "req-health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("req-health")
    );
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json: Value = serde_json::from_slice(&body).expect("json parse");
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["meta"]["request_id"], "req-health");
}

#[tokio::test]
async fn valid_request_returns_brand_map() {
    let harness = Harness::new();
    let (status, json) = post_json(
        harness.app.clone(),
        request_body(&["Japan", "Brazil"]).to_string(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let data = &json["data"];
    assert_eq!(data["brand_info"]["brand_name"], "Koa Tea");
    for section in [
        "cultural_analysis",
        "brand_strategies",
        "brand_personas",
        "competitive_analysis",
    ] {
        let keys: Vec<&String> = data[section].as_object().expect(section).keys().collect();
        assert_eq!(keys, ["Brazil", "Japan"], "{section}");
    }
    assert!(data["brand_personas"]["Japan"]["persona"].is_string());
    assert!(data["comparison"]["comparison"].is_string());
    assert!(json["meta"]["request_id"].is_string());
    assert!(harness.collaborator_calls() > 0);
}

#[tokio::test]
async fn country_count_outside_range_is_rejected_before_any_call() {
    let six = ["Japan", "Brazil", "Germany", "Kenya", "Mexico", "France"];
    for countries in [&[][..], &six[..]] {
        let harness = Harness::new();
        let (status, json) =
            post_json(harness.app.clone(), request_body(countries).to_string()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"]["code"], "validation_error");
        let fields: Vec<&str> = json["error"]["details"]
            .as_array()
            .expect("details")
            .iter()
            .filter_map(|d| d["field"].as_str())
            .collect();
        assert!(fields.contains(&"target_countries"), "{fields:?}");
        assert_eq!(harness.collaborator_calls(), 0);
    }
}

#[tokio::test]
async fn every_offending_field_is_reported() {
    let harness = Harness::new();
    let body = json!({
        "brand_name": "x".repeat(201),
        "origin_country": "United States",
        "target_countries": ["Japan"],
        "brand_keywords": []
    });

    let (status, json) = post_json(harness.app.clone(), body.to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = json["error"]["details"]
        .as_array()
        .expect("details")
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert!(fields.contains(&"brand_name"));
    assert!(fields.contains(&"brand_description"));
    assert!(fields.contains(&"brand_keywords"));
    assert_eq!(harness.collaborator_calls(), 0);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let harness = Harness::new();
    let (status, json) = post_json(harness.app.clone(), "{\"brand_name\":".to_string()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
    assert_eq!(harness.collaborator_calls(), 0);
}
