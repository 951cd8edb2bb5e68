//! Integration tests for cache hits, misses and bypass

use crate::integration::mock_server::MockServerFixture;
use completion_cache::{
    CacheEntry, CacheStore, CompletionClient, GenerateRequest, SamplingOptions, UserPrompt,
};
use std::time::{Duration, Instant};

fn summarize_request() -> GenerateRequest {
    GenerateRequest::new("Summarize: cats are mammals.", "You are concise.")
        .with_options(SamplingOptions::new().with_temperature(0.0))
}

#[tokio::test]
async fn test_second_identical_call_is_served_from_cache() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_completion("Cats are mammals.", 1).await;
    let client = fixture.client();
    let request = summarize_request();

    let first = client.generate(&request).await.unwrap();
    let second = client.generate(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, second);
    assert_eq!(
        first.prompts,
        vec![UserPrompt::from("Summarize: cats are mammals.")]
    );
    assert_eq!(first.completions, vec![vec!["Cats are mammals.".to_string()]]);
    assert!(client
        .cache_store()
        .path_for(&client.fingerprint(&request))
        .exists());

    let stats = client.cache_stats();
    assert_eq!((stats.misses, stats.hits, stats.writes), (1, 1, 1));
}

#[tokio::test]
async fn test_cache_survives_client_restart() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_completion("Cats are mammals.", 1).await;
    let request = summarize_request();

    let first = fixture.client().generate(&request).await.unwrap();
    let fresh_client = CompletionClient::new(fixture.config()).unwrap();
    let second = fresh_client.generate(&request).await.unwrap();

    mock.assert_async().await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_existing_record_avoids_network() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_completion("should not be fetched", 0).await;
    let request = summarize_request();

    let seeded = CacheEntry::new(
        &request.user_prompt,
        vec![vec!["seeded answer".into()], vec!["second seeded".into()]],
    );
    CacheStore::new(fixture.cache_dir.path())
        .store(&request.fingerprint(), &seeded)
        .unwrap();

    let entry = fixture.client().generate(&request).await.unwrap();

    mock.assert_async().await;
    // Returned unchanged, whatever the stored batch size.
    assert_eq!(entry, seeded);
}

#[tokio::test]
async fn test_bypass_refreshes_and_overwrites() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_completion("fresh", 2).await;
    let client = fixture.client();
    let request = summarize_request().with_completion_count(2);

    client
        .cache_store()
        .store(
            &request.fingerprint(),
            &CacheEntry::new(&request.user_prompt, vec![vec!["stale".into()]]),
        )
        .unwrap();

    let refreshed = client
        .generate(&request.clone().with_bypass_cache(true))
        .await
        .unwrap();
    assert_eq!(
        refreshed.completions,
        vec![vec!["fresh".to_string()], vec!["fresh".to_string()]]
    );

    // The overwrite is what later non-bypass calls see.
    let on_disk = client
        .cache_store()
        .lookup(&request.fingerprint())
        .unwrap();
    assert_eq!(on_disk, Some(refreshed.clone()));
    assert_eq!(client.generate(&request).await.unwrap(), refreshed);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_batch_returns_one_slot_per_completion() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_completion("variant", 4).await;

    let (prompts, completions) = fixture
        .client()
        .completion("Name a cat.")
        .system("You are playful.")
        .temperature(1.0)
        .completions(4)
        .execute()
        .await
        .unwrap()
        .into_parts();

    mock.assert_async().await;
    assert_eq!(prompts, vec![UserPrompt::from("Name a cat."); 4]);
    assert_eq!(completions.len(), 4);
    assert!(completions.iter().all(|c| c == &vec!["variant".to_string()]));
}

#[tokio::test]
async fn test_different_options_are_cached_separately() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_completion("answer", 2).await;
    let client = fixture.client();

    let cold = summarize_request();
    let warm = GenerateRequest::new("Summarize: cats are mammals.", "You are concise.")
        .with_options(SamplingOptions::new().with_temperature(0.9));

    client.generate(&cold).await.unwrap();
    client.generate(&warm).await.unwrap();
    client.generate(&cold).await.unwrap();
    client.generate(&warm).await.unwrap();

    mock.assert_async().await;
    assert_ne!(cold.fingerprint(), warm.fingerprint());
}

#[tokio::test]
async fn test_extra_option_order_shares_cache_entry() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_completion("answer", 1).await;
    let client = fixture.client();

    client
        .completion("Hi")
        .system("sys")
        .option("top_p", 0.9)
        .option("presence_penalty", 0.1)
        .execute()
        .await
        .unwrap();
    client
        .completion("Hi")
        .system("sys")
        .option("presence_penalty", 0.1)
        .option("top_p", 0.9)
        .execute()
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_attempts_pause_between_but_not_after() {
    let delay = Duration::from_millis(150);
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture.mock_completion("answer", 4).await;
    let client = CompletionClient::new(fixture.config().with_request_delay(delay)).unwrap();

    let started = Instant::now();
    let entry = client
        .generate(&GenerateRequest::new("Hi", "sys").with_completion_count(3))
        .await
        .unwrap();
    let batch_elapsed = started.elapsed();
    assert_eq!(entry.len(), 3);
    assert!(batch_elapsed >= delay * 2, "took {:?}", batch_elapsed);
    assert!(batch_elapsed < delay * 3, "took {:?}", batch_elapsed);

    let started = Instant::now();
    client
        .generate(&GenerateRequest::new("Hello", "sys"))
        .await
        .unwrap();
    let single_elapsed = started.elapsed();
    assert!(single_elapsed < delay, "took {:?}", single_elapsed);

    mock.assert_async().await;
}
