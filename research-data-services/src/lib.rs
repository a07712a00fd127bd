pub mod article;
pub mod error;
pub mod rag;
pub mod tabular;

// Re-export commonly used items
pub use article::{truncate_tokens, ArticleFetcher, ArticleSource};
pub use error::{DataError, EmbeddingError, FetchError};
pub use rag::{
    CorpusIngestionPipeline, Embedder, FastEmbedder, IngestStats, ScoredDocument, VectorStore,
};
pub use tabular::{
    ChartSeries, DataPaths, ScreeningParams, SimilarityParams, SimilarityWindow, TabularStore,
};
