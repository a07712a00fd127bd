use anyhow::{anyhow, Result};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

use super::completion::{ChatRequest, CompletionBackend, CompletionError, OpenAiBackend};

/// Configuration for the LLM client
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
    pub completion_count: u8,
    pub max_tokens: Option<u32>,
    pub requests_per_minute: u32,
    pub timeout_seconds: u64,
    /// Total attempts per `generate` call, including the first.
    pub max_retries: u32,
    /// Rate-limit backoff sleeps `backoff_base^attempt` seconds.
    pub backoff_base: u64,
    /// Language the recommendations must be written in.
    pub response_language: String,
    pub system_prompt: String,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.0,
            completion_count: 1,
            max_tokens: None,
            requests_per_minute: 20,
            timeout_seconds: 120,
            max_retries: 3,
            backoff_base: 2,
            response_language: "Korean".to_string(),
            system_prompt: "You are a financial expert and stock market analyst.".to_string(),
        }
    }
}

/// Completion text with call metadata
#[derive(Debug, Clone, PartialEq)]
pub struct LlmResponse {
    pub raw_response: String,
    pub model: String,
    /// Attempts used, including the successful one.
    pub attempts: u32,
}

/// LLM client with rate limiting and retry logic
pub struct LlmClient {
    backend: Arc<dyn CompletionBackend>,
    rate_limiter: Arc<RateLimiter<governor::state::direct::NotKeyed, governor::state::InMemoryState, governor::clock::DefaultClock>>,
    config: LlmConfig,
}

impl LlmClient {
    /// Create a client over any completion backend.
    pub fn new(config: LlmConfig, backend: Arc<dyn CompletionBackend>) -> Result<Self> {
        tracing::info!(
            "Initializing LLM client: backend={}, model={}, rate_limit={}/min",
            backend.name(),
            config.model,
            config.requests_per_minute
        );

        let requests_per_minute = NonZeroU32::new(config.requests_per_minute)
            .ok_or_else(|| anyhow!("requests_per_minute must be > 0"))?;
        if config.max_retries == 0 {
            return Err(anyhow!("max_retries must be > 0"));
        }

        let quota = Quota::per_minute(requests_per_minute);
        let rate_limiter = Arc::new(RateLimiter::direct(quota));

        Ok(Self {
            backend,
            rate_limiter,
            config,
        })
    }

    /// Create a client that talks to OpenAI.
    pub fn openai(config: LlmConfig, api_key: String) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(anyhow!("OpenAI API key is empty"));
        }
        Self::new(config, Arc::new(OpenAiBackend::new(api_key)))
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Send `prompt` and return the completion text.
    ///
    /// Rate-limit failures are retried after sleeping `backoff_base^attempt`
    /// seconds, up to `max_retries` attempts in total. Any other failure,
    /// including a timed-out attempt, stops immediately. `None` means no
    /// completion was obtained.
    pub async fn generate(&self, prompt: String) -> Option<LlmResponse> {
        self.rate_limiter.until_ready().await;

        tracing::debug!("Sending prompt to LLM (length: {} chars)", prompt.len());

        let request = ChatRequest {
            model: self.config.model.clone(),
            system: self.config.system_prompt.clone(),
            user: prompt,
            temperature: self.config.temperature,
            completion_count: self.config.completion_count,
            max_tokens: self.config.max_tokens,
        };

        let max_retries = self.config.max_retries;
        for attempt in 0..max_retries {
            match self.call_with_timeout(&request).await {
                Ok(text) => {
                    tracing::info!(
                        "LLM response received: model={}, attempts={}, length={} chars",
                        request.model,
                        attempt + 1,
                        text.len()
                    );
                    return Some(LlmResponse {
                        raw_response: text,
                        model: request.model.clone(),
                        attempts: attempt + 1,
                    });
                }
                Err(CompletionError::RateLimited(msg)) => {
                    tracing::warn!(
                        "Rate limit error encountered: {}. Attempt {} of {}.",
                        msg,
                        attempt + 1,
                        max_retries
                    );
                    if attempt + 1 < max_retries {
                        let backoff_secs = self.config.backoff_base.saturating_pow(attempt);
                        tracing::info!("Sleeping for {} seconds before retrying...", backoff_secs);
                        sleep(Duration::from_secs(backoff_secs)).await;
                    }
                }
                Err(e) => {
                    tracing::error!("LLM call failed without retry: {}", e);
                    break;
                }
            }
        }

        tracing::error!("All retries failed. Unable to get ETF recommendations.");
        None
    }

    async fn call_with_timeout(&self, request: &ChatRequest) -> Result<String, CompletionError> {
        let timeout = Duration::from_secs(self.config.timeout_seconds);
        tokio::time::timeout(timeout, self.backend.complete(request))
            .await
            .map_err(|_| {
                CompletionError::Unexpected(format!(
                    "LLM request timed out after {}s",
                    self.config.timeout_seconds
                ))
            })?
    }
}
