//! Integration tests for `GeminiClient` using wiremock HTTP mocks.

use brandmap_gemini::{GeminiClient, GeminiError, TextGenerator};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

fn test_client(base_url: &str) -> GeminiClient {
    GeminiClient::new(Some("test-key"), "gemini-2.5-flash", 5, base_url)
        .expect("client construction should not fail")
}

#[tokio::test]
async fn generate_content_joins_candidate_parts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"parts": [{"text": "Describe Japan"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "Japan values "}, {"text": "harmony."}]}
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let text = client
        .generate_content("Describe Japan")
        .await
        .expect("generation should succeed");
    assert_eq!(text, "Japan values harmony.");
}

#[tokio::test]
async fn generate_content_reports_status_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.generate_content("hi").await;
    assert!(
        matches!(result, Err(GeminiError::UnexpectedStatus { status: 429, ref body }) if body == "quota exceeded"),
        "expected UnexpectedStatus(429), got: {result:?}"
    );
}

#[tokio::test]
async fn generate_content_without_candidates_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [],
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.generate_content("hi").await;
    assert!(matches!(result, Err(GeminiError::NoCandidates)));
}

#[tokio::test]
async fn complete_degrades_failures_to_empty_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert_eq!(client.complete("hi").await, "");
}

#[tokio::test]
async fn complete_without_api_key_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = GeminiClient::new(None, "gemini-2.5-flash", 5, &server.uri()).expect("client");
    assert_eq!(client.complete("hi").await, "");
}
