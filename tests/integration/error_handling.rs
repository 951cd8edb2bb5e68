//! Integration tests for per-attempt failures and local errors

use crate::integration::mock_server::{completion_body, MockServerFixture};
use completion_cache::{ClientConfig, CompletionClient, Error, GenerateRequest, SamplingOptions};
use serde_json::json;
use std::time::Duration;

#[tokio::test]
async fn test_failed_attempt_does_not_abort_batch() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_sequence(vec![
            completion_body("first"),
            json!({"error": {"message": "upstream hiccup"}}).to_string(),
            completion_body("third"),
        ])
        .await;
    let client = fixture.client();
    let request = GenerateRequest::new("Tell me a fact.", "sys").with_completion_count(3);

    let entry = client.generate(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(entry.len(), 3);
    assert_eq!(entry.prompts.len(), 3);
    assert_eq!(entry.completions[0], vec!["first".to_string()]);
    assert_eq!(entry.completions[1].len(), 1);
    assert!(
        entry.completions[1][0].starts_with("API error: "),
        "got {:?}",
        entry.completions[1]
    );
    assert_eq!(entry.completions[2], vec!["third".to_string()]);

    // Partial batches are cached like any other.
    let stored = client
        .cache_store()
        .lookup(&request.fingerprint())
        .unwrap();
    assert_eq!(stored, Some(entry));
}

#[tokio::test]
async fn test_http_error_status_becomes_error_text() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_error_response(500, r#"{"error":{"message":"Internal server error"}}"#, 2)
        .await;

    let entry = fixture
        .client()
        .generate(&GenerateRequest::new("Hi", "sys").with_completion_count(2))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(entry.len(), 2);
    for slot in &entry.completions {
        assert_eq!(slot.len(), 1);
        assert!(slot[0].starts_with("API error: HTTP 500"), "got {:?}", slot);
        assert!(slot[0].contains("Internal server error"));
    }
}

#[tokio::test]
async fn test_empty_choices_becomes_error_text() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_sequence(vec![json!({"choices": []}).to_string()])
        .await;

    let entry = fixture
        .client()
        .generate(&GenerateRequest::new("Hi", "sys"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(entry.completions[0][0].contains("no completion found"));
}

#[tokio::test]
async fn test_unreachable_server_becomes_error_text() {
    let cache_dir = tempfile::tempdir().unwrap();
    let client = CompletionClient::new(
        ClientConfig::new("test-key")
            .with_api_base("http://127.0.0.1:1")
            .with_cache_dir(cache_dir.path())
            .with_request_delay(Duration::ZERO)
            .with_timeout(Duration::from_secs(5)),
    )
    .unwrap();

    let entry = client
        .generate(&GenerateRequest::new("Hi", "sys").with_completion_count(2))
        .await
        .unwrap();

    assert_eq!(entry.len(), 2);
    assert!(entry
        .completions
        .iter()
        .all(|slot| slot[0].starts_with("API error: HTTP error")));
}

#[tokio::test]
async fn test_corrupt_record_fails_the_call() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_completion("unused", 0).await;
    let client = fixture.client();
    let request = GenerateRequest::new("Hi", "sys");

    std::fs::write(
        client.cache_store().path_for(&request.fingerprint()),
        b"{\"prompts\": [\"Hi\"], \"completions\": [[",
    )
    .unwrap();

    let err = client.generate(&request).await.unwrap_err();
    assert!(err.is_cache_corruption(), "unexpected error: {}", err);
    assert_eq!(client.cache_stats().corrupt, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_bypass_replaces_corrupt_record() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_completion("repaired", 1).await;
    let client = fixture.client();
    let request = GenerateRequest::new("Hi", "sys");
    let path = client.cache_store().path_for(&request.fingerprint());

    std::fs::write(&path, b"not json").unwrap();

    client
        .generate(&request.clone().with_bypass_cache(true))
        .await
        .unwrap();
    let entry = client.generate(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(entry.completions, vec![vec!["repaired".to_string()]]);
}

#[tokio::test]
async fn test_invalid_request_fails_before_network() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_completion("unused", 0).await;

    let client = fixture.client();
    let invalid = [
        GenerateRequest::new("Hi", "sys").with_completion_count(0),
        GenerateRequest::new("Hi", "sys")
            .with_options(SamplingOptions::new().with_temperature(f64::NAN)),
    ];
    for request in &invalid {
        let err = client.generate(request).await.unwrap_err();
        assert!(matches!(err, Error::Validation { .. }), "unexpected error: {}", err);
    }

    mock.assert_async().await;
    assert_eq!(std::fs::read_dir(client.cache_store().root()).unwrap().count(), 0);
}

#[test]
fn test_missing_credentials_fail_at_construction() {
    let err = match CompletionClient::new(ClientConfig::new("")) {
        Ok(_) => panic!("client built without an API key"),
        Err(e) => e,
    };
    assert!(matches!(err, Error::Configuration { .. }));
}
