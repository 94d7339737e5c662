//! Health probe outcomes.

use std::time::Duration;

use relay_service::UpstreamHealth;
use relay_service::health_service::{HealthService, HealthTarget};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn no_target_is_unknown() {
    let svc = HealthService::new(HealthTarget::None, None).unwrap();
    assert_eq!(svc.check().await, UpstreamHealth::Unknown);
}

#[tokio::test]
async fn success_is_healthy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/healthz"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let svc = HealthService::new(HealthTarget::Url(format!("{}/healthz", server.uri())), None)
        .unwrap();
    assert_eq!(svc.check().await, UpstreamHealth::Healthy);
}

#[tokio::test]
async fn error_status_is_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let svc = HealthService::new(HealthTarget::Url(server.uri()), None).unwrap();
    assert_eq!(svc.check().await, UpstreamHealth::Unknown);
}

#[tokio::test]
async fn timeout_is_unhealthy() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let svc = HealthService::new(
        HealthTarget::Url(server.uri()),
        Some(Duration::from_millis(100)),
    )
    .unwrap();
    assert_eq!(svc.check().await, UpstreamHealth::Unhealthy);
}

#[tokio::test]
async fn model_probe_sends_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models/gemini-test"))
        .and(header("x-goog-api-key", "k"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let svc = HealthService::new(
        HealthTarget::Model {
            url: format!("{}/v1beta/models/gemini-test", server.uri()),
            api_key: "k".into(),
        },
        None,
    )
    .unwrap();
    assert_eq!(svc.check().await, UpstreamHealth::Healthy);
}
