use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client as OpenAiClient,
};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failure of one completion attempt, classified for the retry policy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    /// The provider asked us to slow down. The only retryable failure.
    #[error("Rate limit error: {0}")]
    RateLimited(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl CompletionError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, CompletionError::RateLimited(_))
    }
}

/// One chat completion request: a system persona and a single user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub completion_count: u8,
    pub max_tokens: Option<u32>,
}

/// External text-completion capability.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Text of the first completion, trimmed.
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError>;

    fn name(&self) -> &str;
}

/// OpenAI chat completions.
pub struct OpenAiBackend {
    client: OpenAiClient<OpenAIConfig>,
}

impl OpenAiBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key.into());

        // The SDK retries 429s on its own by default; give it no time budget
        // so LlmClient's retry loop is the only one.
        let no_retry = backoff::ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();

        Self {
            client: OpenAiClient::with_config(config).with_backoff(no_retry),
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(request.system.as_str())
            .build()
            .map_err(classify)?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user.as_str())
            .build()
            .map_err(classify)?;

        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(request.model.as_str())
            .messages([system.into(), user.into()])
            .temperature(request.temperature)
            .n(request.completion_count);
        if let Some(max_tokens) = request.max_tokens {
            args.max_tokens(max_tokens);
        }
        let chat_request = args.build().map_err(classify)?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(classify)?;

        tracing::debug!(
            "OpenAI response: model={}, tokens={:?}",
            response.model,
            response.usage.as_ref().map(|u| u.total_tokens)
        );

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or_else(|| CompletionError::Unexpected("Empty response from LLM".to_string()))
    }

    fn name(&self) -> &str {
        "openai"
    }
}

fn classify(err: OpenAIError) -> CompletionError {
    match err {
        OpenAIError::ApiError(api) if is_rate_limit(&api) => {
            CompletionError::RateLimited(api.message)
        }
        OpenAIError::InvalidArgument(msg) => CompletionError::Unexpected(msg),
        other => CompletionError::Provider(other.to_string()),
    }
}

/// OpenAI reports request and token throttling with these error types.
/// Quota exhaustion (`insufficient_quota`) is not retryable.
fn is_rate_limit(api: &ApiError) -> bool {
    matches!(api.r#type.as_deref(), Some("requests") | Some("tokens"))
        || api.message.to_lowercase().contains("rate limit")
}
