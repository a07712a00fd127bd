use research_core::{InsightFailure, InsightOutcome, SubjectKind};
use research_data_services::{truncate_tokens, ArticleFetcher, ArticleSource};
use serde::Serialize;
use std::sync::Arc;

use crate::llm::{
    EtfPromptFormatter, EtfResponseParser, InsightMetrics, LlmClient, MetricsTimer, RagRetriever,
};

/// Configuration for the ETF insight pipeline
#[derive(Debug, Clone)]
pub struct EtfInsightConfig {
    /// Number of commentary documents placed in an article prompt
    pub top_k: usize,

    /// Enable or disable commentary retrieval for article prompts
    pub rag_enabled: bool,

    /// Whitespace tokens of article text kept in the prompt
    pub max_article_tokens: usize,
}

impl Default for EtfInsightConfig {
    fn default() -> Self {
        Self {
            top_k: RagRetriever::DEFAULT_TOP_K,
            rag_enabled: true,
            max_article_tokens: ArticleFetcher::DEFAULT_MAX_TOKENS,
        }
    }
}

/// Outcome for one URL of a multi-URL request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UrlInsight {
    pub url: String,
    pub outcome: InsightOutcome,
}

/// ETF insight pipeline
///
/// For an article URL it:
/// 1. Fetches and extracts the article text
/// 2. Retrieves the most similar market commentary
/// 3. Prompts the LLM for ETF recommendations
/// 4. Validates the completion into an [`InsightOutcome`]
///
/// Keyword requests skip steps 1 and 2. No step raises to the caller;
/// every failure ends up as an `InsightOutcome::Failed`.
pub struct EtfInsightPipeline {
    config: EtfInsightConfig,
    article_source: Arc<dyn ArticleSource>,
    rag_retriever: Arc<RagRetriever>,
    llm_client: Arc<LlmClient>,
}

impl EtfInsightPipeline {
    pub fn new(
        config: EtfInsightConfig,
        article_source: Arc<dyn ArticleSource>,
        rag_retriever: Arc<RagRetriever>,
        llm_client: Arc<LlmClient>,
    ) -> Self {
        tracing::info!(
            "Initializing ETF insight pipeline: rag_enabled={}, top_k={}, max_article_tokens={}",
            config.rag_enabled,
            config.top_k,
            config.max_article_tokens
        );

        Self {
            config,
            article_source,
            rag_retriever,
            llm_client,
        }
    }

    /// Recommendations for the article at `url`.
    pub async fn insights_for_url(&self, url: &str) -> InsightOutcome {
        tracing::info!("Generating ETF insights for URL: {}", url);

        let article = match self.article_source.fetch(url).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                tracing::warn!("No article content at {}", url);
                return InsightOutcome::Failed(InsightFailure::ArticleUnavailable);
            }
            Err(e) => {
                tracing::error!("Error fetching the article from URL {}: {}", url, e);
                return InsightOutcome::Failed(InsightFailure::ArticleUnavailable);
            }
        };

        self.insights_for_article(&article).await
    }

    /// Each URL in turn, one outcome per URL in input order. Blank entries
    /// are skipped.
    pub async fn insights_for_urls(&self, urls: &[String]) -> Vec<UrlInsight> {
        let mut results = Vec::new();
        for url in urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty()) {
            let outcome = self.insights_for_url(url).await;
            results.push(UrlInsight {
                url: url.to_string(),
                outcome,
            });
        }
        results
    }

    /// Recommendations for already-extracted article text.
    pub async fn insights_for_article(&self, article: &str) -> InsightOutcome {
        let article = truncate_tokens(article, self.config.max_article_tokens);
        let mut metrics = InsightMetrics::new();

        let timer = MetricsTimer::start();
        let context = if self.config.rag_enabled {
            self.rag_retriever.retrieve(&article, self.config.top_k)
        } else {
            tracing::info!("RAG disabled, prompting without commentary context");
            Vec::new()
        };
        metrics.set_retrieval_latency(timer.stop());
        metrics.set_similarity_scores(context.iter().map(|d| d.score).collect());

        let prompt = EtfPromptFormatter::format_article(
            &article,
            &context,
            &self.llm_client.config().response_language,
        );

        self.complete_and_parse(prompt, None, SubjectKind::Article, metrics)
            .await
    }

    /// Recommendations for a keyword list. Keywords are trimmed and blank
    /// ones dropped; with none left the LLM is not called.
    pub async fn insights_for_keywords(&self, keywords: &[String]) -> InsightOutcome {
        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();

        if keywords.is_empty() {
            tracing::warn!("No keywords supplied");
            return InsightOutcome::Failed(InsightFailure::GenerationFailed);
        }

        tracing::info!("Generating ETF insights for keywords: {}", keywords.join(", "));

        let prompt =
            EtfPromptFormatter::format_keywords(&keywords, &self.llm_client.config().response_language);

        self.complete_and_parse(
            prompt,
            Some(&keywords),
            SubjectKind::Keywords,
            InsightMetrics::new(),
        )
        .await
    }

    async fn complete_and_parse(
        &self,
        prompt: String,
        keywords: Option<&[String]>,
        subject: SubjectKind,
        mut metrics: InsightMetrics,
    ) -> InsightOutcome {
        let timer = MetricsTimer::start();
        let response = self.llm_client.generate(prompt).await;
        metrics.set_llm_latency(timer.stop());

        let Some(response) = response else {
            metrics.report();
            return InsightOutcome::Failed(InsightFailure::GenerationFailed);
        };
        metrics.attempts = response.attempts;

        tracing::debug!("LLM completion: {}", response.raw_response);

        let parsed = EtfResponseParser::parse_detailed(&response.raw_response, keywords, subject);
        metrics.accepted = parsed.outcome.recommendations().len();
        metrics.rejected = parsed.rejected.len();
        metrics.report();

        parsed.outcome
    }
}

/// Split comma-separated caller input, trimming entries and dropping blanks.
pub fn split_csv_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
