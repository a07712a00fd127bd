pub mod corpus;
pub mod embedder;
pub mod ingestion_pipeline;
pub mod vector_store;

// Re-export commonly used items
pub use embedder::{Embedder, FastEmbedder};
pub use ingestion_pipeline::{CorpusIngestionPipeline, IngestStats};
pub use vector_store::{cosine_similarity, ScoredDocument, StoredDocument, VectorStore};
