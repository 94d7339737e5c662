//! Model relay against a mock generative-language API.

use std::time::Duration;

use relay_service::{
    Question, Relay, RelayError,
    config::model_config::ModelConfig,
    services::model_service::{MODEL_SOURCE, ModelService},
};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-test:generateContent";

fn config(server: &MockServer, api_key: Option<&str>) -> ModelConfig {
    ModelConfig {
        endpoint: server.uri(),
        model: "gemini-test".into(),
        api_key: api_key.map(str::to_owned),
        temperature: None,
        max_output_tokens: None,
        timeout: Duration::from_secs(5),
    }
}

fn question(text: &str) -> Question {
    Question::new(text).unwrap()
}

#[tokio::test]
async fn forwards_prompt_and_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "k-123"))
        .and(body_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "Explain ownership" }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Each value has one owner." }] },
                "finishReason": "STOP"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let svc = ModelService::new(config(&server, Some("k-123"))).unwrap();
    assert_eq!(svc.source(), MODEL_SOURCE);
    let answer = svc.ask(&question("Explain ownership")).await.unwrap();
    assert_eq!(answer, "Each value has one owner.");
}

#[tokio::test]
async fn generation_config_is_sent_when_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(body_json(json!({
            "contents": [{ "role": "user", "parts": [{ "text": "hi" }] }],
            "generationConfig": { "maxOutputTokens": 64 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "hey" }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cfg = config(&server, Some("k"));
    cfg.max_output_tokens = Some(64);
    let svc = ModelService::new(cfg).unwrap();
    assert_eq!(svc.ask(&question("hi")).await.unwrap(), "hey");
}

#[tokio::test]
async fn missing_key_fails_before_any_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let svc = ModelService::new(config(&server, None)).unwrap();
    assert!(matches!(
        svc.ask(&question("hi")).await,
        Err(RelayError::ConfigurationMissing("GEMINI_API_KEY"))
    ));
}

#[tokio::test]
async fn empty_candidates_is_no_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": { "blockReason": "SAFETY" }
        })))
        .mount(&server)
        .await;

    let svc = ModelService::new(config(&server, Some("k"))).unwrap();
    match svc.ask(&question("hi")).await {
        Err(RelayError::NoAnswerFound(debug)) => {
            assert_eq!(debug.keys, vec!["promptFeedback".to_string()]);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn upstream_error_status_is_kept() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "code": 429, "status": "RESOURCE_EXHAUSTED" }
        })))
        .mount(&server)
        .await;

    let svc = ModelService::new(config(&server, Some("k"))).unwrap();
    match svc.ask(&question("hi")).await {
        Err(RelayError::UpstreamHttp { status, .. }) => assert_eq!(status, 429),
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn undecodable_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>", "text/html"))
        .mount(&server)
        .await;

    let svc = ModelService::new(config(&server, Some("k"))).unwrap();
    assert!(matches!(
        svc.ask(&question("hi")).await,
        Err(RelayError::MalformedUpstreamResponse { .. })
    ));
}
