use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::error::EmbeddingError;

/// Text → vector capability shared by corpus ingestion and query-time
/// retrieval. Both sides must use the same implementation.
pub trait Embedder: Send + Sync {
    /// Embed a batch of texts, one vector per input, in input order.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Name recorded in logs and metrics.
    fn model_name(&self) -> &str;

    /// Embed a single text.
    fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut vectors = self.embed(&[text.to_string()])?;
        if vectors.len() != 1 {
            return Err(EmbeddingError::CountMismatch {
                requested: 1,
                returned: vectors.len(),
            });
        }
        Ok(vectors.remove(0))
    }
}

/// Local ONNX sentence embedder (all-MiniLM-L6-v2 by default, 384 dimensions).
pub struct FastEmbedder {
    model: TextEmbedding,
    model_name: String,
}

impl FastEmbedder {
    /// Load (downloading on first run) the given fastembed model.
    pub fn new(model: EmbeddingModel) -> Result<Self, EmbeddingError> {
        let model_name = format!("{:?}", model);
        tracing::info!("Loading embedding model ({})...", model_name);

        let model = TextEmbedding::try_new(
            InitOptions::new(model).with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::Model(e.to_string()))?;

        tracing::info!("Embedding model loaded");

        Ok(Self { model, model_name })
    }

    pub fn all_minilm() -> Result<Self, EmbeddingError> {
        Self::new(EmbeddingModel::AllMiniLML6V2)
    }
}

impl Embedder for FastEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = self
            .model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::Model(e.to_string()))?;

        if vectors.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                requested: texts.len(),
                returned: vectors.len(),
            });
        }

        Ok(vectors)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
