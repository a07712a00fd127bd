//! Fakes for the external capabilities: completion, embedding, article fetch.
#![allow(dead_code)]

use async_trait::async_trait;
use insight_strategy::{
    CompletionBackend, CompletionError, EtfInsightConfig, EtfInsightPipeline, LlmClient,
    LlmConfig, RagRetriever,
};
use insight_strategy::llm::ChatRequest;
use research_data_services::{
    ArticleSource, CorpusIngestionPipeline, Embedder, EmbeddingError, FetchError,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Replays a fixed list of completion results, one per call.
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<String, CompletionError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(script: Vec<Result<String, CompletionError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.user.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CompletionError::Unexpected("script exhausted".to_string())))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Never answers within any reasonable timeout.
pub struct HangingBackend;

#[async_trait]
impl CompletionBackend for HangingBackend {
    async fn complete(&self, _request: &ChatRequest) -> Result<String, CompletionError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok("too late".to_string())
    }

    fn name(&self) -> &str {
        "hanging"
    }
}

/// Bag-of-words over three market topics.
pub struct TopicEmbedder;

impl Embedder for TopicEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Ok(texts
            .iter()
            .map(|t| {
                let t = t.to_lowercase();
                ["energy", "bond", "china"]
                    .iter()
                    .map(|w| t.matches(w).count() as f32)
                    .collect()
            })
            .collect())
    }

    fn model_name(&self) -> &str {
        "topics"
    }
}

/// Serves article text from a map; unknown URLs have no content.
pub struct StaticArticles(pub HashMap<String, String>);

#[async_trait]
impl ArticleSource for StaticArticles {
    async fn fetch(&self, url: &str) -> Result<Option<String>, FetchError> {
        Ok(self.0.get(url).cloned())
    }
}

pub fn rate_limited() -> CompletionError {
    CompletionError::RateLimited("Rate limit reached for gpt-4".to_string())
}

pub fn test_llm_config() -> LlmConfig {
    LlmConfig {
        requests_per_minute: 600,
        ..Default::default()
    }
}

pub fn qqq_completion() -> String {
    r#"{
        "ticker": "QQQ",
        "top5": ["Apple", "Microsoft", "NVIDIA", "Amazon", "Meta"],
        "explanation": "나스닥 100 지수를 추종하는 ETF입니다.",
        "holdings_weight": "8.9%, 8.1%, 7.6%, 5.3%, 4.9%",
        "expense_ratio": "0.20%"
    }"#
    .to_string()
}

pub fn pipeline(
    articles: &[(&str, &str)],
    backend: Arc<ScriptedBackend>,
    config: EtfInsightConfig,
) -> EtfInsightPipeline {
    let embedder: Arc<dyn Embedder> = Arc::new(TopicEmbedder);
    let (store, _) = CorpusIngestionPipeline::new(embedder.clone())
        .ingest_bundled()
        .unwrap();
    let retriever = Arc::new(RagRetriever::new(embedder, Arc::new(store)));
    let llm_client = Arc::new(LlmClient::new(test_llm_config(), backend).unwrap());
    let articles = StaticArticles(
        articles
            .iter()
            .map(|(url, text)| (url.to_string(), text.to_string()))
            .collect(),
    );

    EtfInsightPipeline::new(config, Arc::new(articles), retriever, llm_client)
}
