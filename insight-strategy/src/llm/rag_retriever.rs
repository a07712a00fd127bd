use research_data_services::{Embedder, ScoredDocument, VectorStore};
use std::fmt::Display;
use std::sync::Arc;

/// Retrieves the commentary documents most similar to a query.
///
/// Uses the same embedder the corpus was ingested with.
pub struct RagRetriever {
    embedder: Arc<dyn Embedder>,
    vector_store: Arc<VectorStore>,
}

impl RagRetriever {
    pub const DEFAULT_TOP_K: usize = 3;

    pub fn new(embedder: Arc<dyn Embedder>, vector_store: Arc<VectorStore>) -> Self {
        tracing::info!(
            "RAG retriever ready: {} documents, model={}",
            vector_store.len(),
            embedder.model_name()
        );
        Self {
            embedder,
            vector_store,
        }
    }

    /// Up to `top_k` documents, most relevant first; ties keep corpus order.
    ///
    /// Any query is rendered to text first. Blank queries and embedding
    /// failures yield an empty list.
    pub fn retrieve(&self, query: impl Display, top_k: usize) -> Vec<ScoredDocument> {
        let query = query.to_string();
        if query.trim().is_empty() {
            tracing::warn!("Query is empty, skipping retrieval");
            return Vec::new();
        }

        let query_embedding = match self.embedder.embed_one(&query) {
            Ok(embedding) => embedding,
            Err(e) => {
                tracing::error!("Error in retrieve: {}", e);
                return Vec::new();
            }
        };

        let hits = self.vector_store.search(&query_embedding, top_k);

        tracing::debug!(
            "Retrieved {} documents (scores: {:?})",
            hits.len(),
            hits.iter().map(|h| h.score).collect::<Vec<_>>()
        );

        hits
    }
}
