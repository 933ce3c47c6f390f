//! Integration tests for the image capability client.

use std::time::Duration;

use muninn::types::ImageProvider;
use muninn::{ClientConfig, ImageClient, ImageRequest, MuninnError, RetryConfig};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry() -> RetryConfig {
    RetryConfig::new()
        .max_retries(2)
        .base_delay(Duration::from_millis(1))
}

#[tokio::test]
async fn missing_credentials_is_a_terminal_error() {
    let client = ImageClient::new(ClientConfig::new());
    let request = ImageRequest::new("a fox", "flux-schnell", ImageProvider::Replicate);
    let err = client.generate(&request).await.unwrap_err();
    match err {
        MuninnError::MissingCredentials {
            provider,
            capability,
        } => {
            assert_eq!(provider, "replicate");
            assert_eq!(capability, "image");
        }
        other => panic!("expected MissingCredentials, got {other:?}"),
    }
}

#[tokio::test]
async fn prediction_output_is_downloaded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/predictions"))
        .and(header("Authorization", "Bearer r8-test"))
        .and(body_json(json!({
            "version": "black-forest-labs/flux-dev",
            "input": {"prompt": "a fox"},
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "output": [format!("{}/out.png", server.uri())],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/out.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNGDATA".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let client = ImageClient::with_base_url(
        ClientConfig::new().replicate_api_key("r8-test"),
        server.uri(),
    );
    let request = ImageRequest::new("a fox", "flux-dev", ImageProvider::Replicate);
    assert_eq!(client.generate(&request).await.unwrap(), b"PNGDATA");
}

#[tokio::test]
async fn unrecognized_model_uses_the_fallback_version() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/predictions"))
        .and(body_json(json!({
            "version": "black-forest-labs/flux-schnell",
            "input": {"prompt": "a fox"},
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "output": [format!("{}/out.png", server.uri())],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/out.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNG".to_vec()))
        .mount(&server)
        .await;

    let client = ImageClient::with_base_url(
        ClientConfig::new().replicate_api_key("r8-test"),
        server.uri(),
    );
    let request = ImageRequest::new("a fox", "sdxl-turbo", ImageProvider::Replicate);
    assert!(client.generate(&request).await.is_ok());
}

#[tokio::test]
async fn empty_output_is_no_output() {
    for body in [json!({"output": []}), json!({}), json!({"output": [null]})] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/predictions"))
            .respond_with(ResponseTemplate::new(201).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let client = ImageClient::with_base_url(
            ClientConfig::new().replicate_api_key("r8-test"),
            server.uri(),
        );
        let request = ImageRequest::new("a fox", "flux-schnell", ImageProvider::Replicate);
        let err = client.generate(&request).await.unwrap_err();
        assert!(matches!(err, MuninnError::NoOutput));
    }
}

#[tokio::test]
async fn malformed_creation_body_is_terminal() {
    // Re-posting on a decode failure would create a new billable
    // prediction per retry, so the error must not be transient.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/predictions"))
        .respond_with(ResponseTemplate::new(201).set_body_string("not json at all"))
        .expect(1) // format errors are not retried
        .mount(&server)
        .await;

    let client = ImageClient::with_base_url(
        ClientConfig::new().replicate_api_key("r8-test"),
        server.uri(),
    )
    .retry_config(fast_retry());
    let request = ImageRequest::new("a fox", "flux-schnell", ImageProvider::Replicate);
    let err = client.generate(&request).await.unwrap_err();
    assert!(matches!(err, MuninnError::UnexpectedFormat(_)));
}

#[tokio::test]
async fn non_201_status_is_a_provider_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/predictions"))
        .respond_with(ResponseTemplate::new(422).set_body_string("invalid version"))
        .expect(1)
        .mount(&server)
        .await;

    let client = ImageClient::with_base_url(
        ClientConfig::new().replicate_api_key("r8-test"),
        server.uri(),
    )
    .retry_config(fast_retry());
    let request = ImageRequest::new("a fox", "flux-schnell", ImageProvider::Replicate);
    let err = client.generate(&request).await.unwrap_err();
    assert!(matches!(err, MuninnError::Provider { status: 422, .. }));
}

#[tokio::test]
async fn rate_limit_on_creation_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/predictions"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/predictions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "output": [format!("{}/out.png", server.uri())],
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/out.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNG".to_vec()))
        .mount(&server)
        .await;

    let client = ImageClient::with_base_url(
        ClientConfig::new().replicate_api_key("r8-test"),
        server.uri(),
    )
    .retry_config(fast_retry());
    let request = ImageRequest::new("a fox", "flux-schnell", ImageProvider::Replicate);
    assert_eq!(client.generate(&request).await.unwrap(), b"PNG");
}

#[tokio::test]
async fn local_endpoint_is_tried_first_even_for_replicate() {
    // No Replicate key configured: an Ok response proves the local path
    // served it before the remote provider was consulted.
    let local = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({
            "model": "flux-schnell",
            "messages": [{"role": "user", "content": "Generate an image of: a fox"}],
            "stream": false,
            "options": {"temperature": 1.0},
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": {"content": "imagedata"}})),
        )
        .expect(1)
        .mount(&local)
        .await;

    let client = ImageClient::new(ClientConfig::new().ollama_endpoint(local.uri()));
    let request = ImageRequest::new("a fox", "flux-schnell", ImageProvider::Replicate);
    assert_eq!(client.generate(&request).await.unwrap(), b"imagedata");
}

#[tokio::test]
async fn local_failure_falls_through_to_replicate() {
    let remote = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/predictions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "output": [format!("{}/out.png", remote.uri())],
        })))
        .expect(1)
        .mount(&remote)
        .await;
    Mock::given(method("GET"))
        .and(path("/out.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNG".to_vec()))
        .mount(&remote)
        .await;

    let config = ClientConfig::new()
        .ollama_endpoint("http://127.0.0.1:1")
        .replicate_api_key("r8-test");
    let client = ImageClient::with_base_url(config, remote.uri());
    let request = ImageRequest::new("a fox", "flux-schnell", ImageProvider::Replicate);
    assert_eq!(client.generate(&request).await.unwrap(), b"PNG");
}

#[tokio::test]
async fn ollama_provider_without_an_endpoint_is_unsupported() {
    let client = ImageClient::new(ClientConfig::new());
    let request = ImageRequest::new("a fox", "flux-schnell", ImageProvider::Ollama);
    let err = client.generate(&request).await.unwrap_err();
    match err {
        MuninnError::UnsupportedProvider { provider, options, .. } => {
            assert_eq!(provider, "ollama");
            assert!(options.contains("replicate"));
        }
        other => panic!("expected UnsupportedProvider, got {other:?}"),
    }
}
