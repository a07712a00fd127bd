use std::sync::Arc;
use std::time::Instant;

use super::corpus;
use super::embedder::Embedder;
use super::vector_store::{StoredDocument, VectorStore};
use crate::error::EmbeddingError;

/// Statistics from an ingestion run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IngestStats {
    pub documents_read: usize,
    pub embeddings_generated: usize,
    pub documents_stored: usize,
    pub elapsed_ms: u128,
}

/// Corpus ingestion pipeline that:
/// 1. Takes the commentary documents
/// 2. Generates embeddings in batches
/// 3. Loads them into an in-memory [`VectorStore`]
pub struct CorpusIngestionPipeline {
    embedder: Arc<dyn Embedder>,
    batch_size: usize,
}

impl CorpusIngestionPipeline {
    const BATCH_SIZE: usize = 16;

    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            batch_size: Self::BATCH_SIZE,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Embed the bundled ETF commentary.
    pub fn ingest_bundled(&self) -> Result<(VectorStore, IngestStats), EmbeddingError> {
        tracing::info!(
            "Ingesting bundled commentary: {}",
            corpus::document_names().join(", ")
        );
        self.ingest(corpus::etf_commentary())
    }

    /// Embed `documents` into a fresh store. Document ids are positions in
    /// the input.
    pub fn ingest(
        &self,
        documents: Vec<String>,
    ) -> Result<(VectorStore, IngestStats), EmbeddingError> {
        let started = Instant::now();
        let mut stats = IngestStats {
            documents_read: documents.len(),
            ..Default::default()
        };
        let mut store = VectorStore::new();

        tracing::info!(
            "Starting corpus ingestion: {} documents with {}",
            documents.len(),
            self.embedder.model_name()
        );

        if documents.is_empty() {
            tracing::warn!("Corpus is empty, nothing to ingest");
            return Ok((store, stats));
        }

        let mut next_id = 0usize;
        for batch in documents.chunks(self.batch_size) {
            let embeddings = self.embedder.embed(batch)?;
            if embeddings.len() != batch.len() {
                return Err(EmbeddingError::CountMismatch {
                    requested: batch.len(),
                    returned: embeddings.len(),
                });
            }
            stats.embeddings_generated += embeddings.len();

            let stored: Vec<StoredDocument> = batch
                .iter()
                .zip(embeddings)
                .map(|(text, embedding)| {
                    let doc = StoredDocument {
                        id: next_id,
                        text: text.clone(),
                        embedding,
                    };
                    next_id += 1;
                    doc
                })
                .collect();
            store.upsert(stored)?;

            tracing::debug!(
                "Processed {} embeddings (total: {})",
                batch.len(),
                stats.embeddings_generated
            );
        }

        stats.documents_stored = store.len();
        stats.elapsed_ms = started.elapsed().as_millis();
        tracing::info!("Corpus ingestion complete: {:?}", stats);

        Ok((store, stats))
    }
}
