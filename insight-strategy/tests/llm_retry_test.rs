/// LLM retry tests
///
/// These tests verify the completion retry policy on a paused clock:
/// - Rate limits back off base^attempt seconds and retry
/// - Any other failure stops immediately
/// - Exhausted retries and timeouts yield no completion
mod common;

use common::{qqq_completion, rate_limited, test_llm_config, HangingBackend, ScriptedBackend};
use insight_strategy::{CompletionError, LlmClient, LlmConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_rate_limited_twice_then_success() {
    let backend = ScriptedBackend::new(vec![
        Err(rate_limited()),
        Err(rate_limited()),
        Ok(qqq_completion()),
    ]);
    let client = LlmClient::new(test_llm_config(), backend.clone()).unwrap();

    let start = Instant::now();
    let response = client
        .generate("prompt".to_string())
        .await
        .expect("third attempt should succeed");
    let elapsed = start.elapsed();

    assert_eq!(response.raw_response, qqq_completion());
    assert_eq!(response.attempts, 3);
    assert_eq!(backend.calls(), 3);
    // Two sleeps: 2^0 + 2^1 seconds.
    assert!(elapsed >= Duration::from_secs(3), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_millis(3100), "elapsed {:?}", elapsed);
}

#[tokio::test(start_paused = true)]
async fn test_rate_limit_exhausts_retry_budget() {
    let backend = ScriptedBackend::new(vec![
        Err(rate_limited()),
        Err(rate_limited()),
        Err(rate_limited()),
        Ok(qqq_completion()),
    ]);
    let client = LlmClient::new(test_llm_config(), backend.clone()).unwrap();

    assert!(client.generate("prompt".to_string()).await.is_none());
    assert_eq!(backend.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_provider_error_is_not_retried() {
    let backend = ScriptedBackend::new(vec![
        Err(CompletionError::Provider("invalid api key".to_string())),
        Ok(qqq_completion()),
    ]);
    let client = LlmClient::new(test_llm_config(), backend.clone()).unwrap();

    let start = Instant::now();
    assert!(client.generate("prompt".to_string()).await.is_none());
    assert_eq!(backend.calls(), 1);
    assert!(start.elapsed() < Duration::from_millis(100));
}

#[tokio::test(start_paused = true)]
async fn test_unexpected_error_after_rate_limit_stops() {
    let backend = ScriptedBackend::new(vec![
        Err(rate_limited()),
        Err(CompletionError::Unexpected("connection reset".to_string())),
        Ok(qqq_completion()),
    ]);
    let client = LlmClient::new(test_llm_config(), backend.clone()).unwrap();

    assert!(client.generate("prompt".to_string()).await.is_none());
    assert_eq!(backend.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_custom_backoff_base() {
    let backend = ScriptedBackend::new(vec![
        Err(rate_limited()),
        Err(rate_limited()),
        Ok(qqq_completion()),
    ]);
    let config = LlmConfig {
        backoff_base: 3,
        ..test_llm_config()
    };
    let client = LlmClient::new(config, backend).unwrap();

    let start = Instant::now();
    assert!(client.generate("prompt".to_string()).await.is_some());
    // 3^0 + 3^1 seconds.
    assert!(start.elapsed() >= Duration::from_secs(4));
    assert!(start.elapsed() < Duration::from_millis(4100));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_is_not_retried() {
    let config = LlmConfig {
        timeout_seconds: 5,
        ..test_llm_config()
    };
    let client = LlmClient::new(config, Arc::new(HangingBackend)).unwrap();

    let start = Instant::now();
    assert!(client.generate("prompt".to_string()).await.is_none());
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(5));
    assert!(elapsed < Duration::from_secs(6));
}
