mod extract;
pub mod fetcher;

pub use extract::{extract_article_text, truncate_tokens, ARTICLE_SELECTOR, DROPPED_TAGS};
pub use fetcher::{ArticleFetcher, ArticleSource};
