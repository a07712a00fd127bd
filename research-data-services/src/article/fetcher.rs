use async_trait::async_trait;
use std::time::Duration;

use super::extract::{extract_article_text, truncate_tokens};
use crate::error::FetchError;

const USER_AGENT: &str = concat!("research-data-services/", env!("CARGO_PKG_VERSION"));

/// Source of article body text for a URL.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// `Ok(None)` when the page carries no article content.
    async fn fetch(&self, url: &str) -> Result<Option<String>, FetchError>;
}

/// HTTP article fetcher for news pages.
pub struct ArticleFetcher {
    client: reqwest::Client,
    max_tokens: usize,
}

impl ArticleFetcher {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_MAX_TOKENS: usize = 10_000;

    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            max_tokens: Self::DEFAULT_MAX_TOKENS,
        }
    }

    /// Cap on whitespace tokens kept from each article.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl ArticleSource for ArticleFetcher {
    async fn fetch(&self, url: &str) -> Result<Option<String>, FetchError> {
        let http_err = |source| FetchError::Http {
            url: url.to_string(),
            source,
        };

        tracing::debug!("Fetching article: {}", url);
        let body = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|resp| resp.error_for_status())
            .map_err(http_err)?
            .text()
            .await
            .map_err(http_err)?;

        match extract_article_text(&body) {
            Some(text) => Ok(Some(truncate_tokens(&text, self.max_tokens))),
            None => {
                tracing::error!("Could not find the article content in URL: {}", url);
                Ok(None)
            }
        }
    }
}
