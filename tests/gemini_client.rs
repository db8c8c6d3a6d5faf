//! Gemini client and composer against a mock Generative Language API

use std::sync::Arc;

use serde_json::json;
use travelsynth::config::GeminiConfig;
use travelsynth::error::GENERATION_FAILED_MESSAGE;
use travelsynth::{
    BudgetLevel, GeminiClient, GroundingSource, GuideComposer, TravelPreferences, TravelSynthError,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL_PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn composer_for(server: &MockServer) -> GuideComposer {
    let config = GeminiConfig {
        base_url: format!("{}/v1beta", server.uri()),
        model: "gemini-test".to_string(),
        ..GeminiConfig::default()
    };
    let client = GeminiClient::new(&config, "test-api-key").unwrap();
    GuideComposer::new(Arc::new(client))
}

fn urls(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_grounded_request_and_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .and(header("x-goog-api-key", "test-api-key"))
        .and(body_partial_json(json!({
            "tools": [{"googleSearch": {}}],
            "contents": [{"role": "user"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "# Seville\n## Executive Summary\n- **Alcázar** early"}]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://seville.example/a", "title": "Seville A"}},
                    {"web": {"uri": "https://seville.example/a", "title": "Seville A"}},
                    {"web": {"uri": "https://seville.example/b", "title": ""}}
                ]}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let preferences = TravelPreferences {
        budget: Some(BudgetLevel::Economy),
        ..Default::default()
    };
    let guide = composer_for(&server)
        .generate_guide(&urls(&["https://blog.example/seville", ""]), &preferences)
        .await
        .unwrap();

    assert!(guide.markdown_content.starts_with("# Seville"));
    assert_eq!(
        guide.sources,
        vec![GroundingSource::new("Seville A", "https://seville.example/a")]
    );
}

#[tokio::test]
async fn test_request_body_carries_generation_settings() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
        .mount(&server)
        .await;

    composer_for(&server)
        .generate_guide(&urls(&["https://a.example"]), &TravelPreferences::default())
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
    assert!((temperature - 0.4).abs() < 1e-6);
    assert!(
        body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("world-class travel writer")
    );
    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
    assert!(prompt.contains("1. https://a.example"));
}

#[tokio::test]
async fn test_http_error_becomes_generic_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
        .expect(1)
        .mount(&server)
        .await;

    let err = composer_for(&server)
        .generate_guide(&urls(&["https://a.example"]), &TravelPreferences::default())
        .await
        .unwrap_err();

    assert!(matches!(err, TravelSynthError::Generation { .. }));
    assert_eq!(err.user_message(), GENERATION_FAILED_MESSAGE);
}

#[tokio::test]
async fn test_malformed_body_becomes_generic_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(MODEL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = composer_for(&server)
        .generate_guide(&urls(&["https://a.example"]), &TravelPreferences::default())
        .await
        .unwrap_err();

    assert!(matches!(err, TravelSynthError::Generation { .. }));
}

#[tokio::test]
async fn test_blank_urls_make_no_network_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let err = composer_for(&server)
        .generate_guide(&urls(&["", "   "]), &TravelPreferences::default())
        .await
        .unwrap_err();

    assert!(matches!(err, TravelSynthError::Validation { .. }));
}
