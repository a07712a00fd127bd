use crate::error::EmbeddingError;

/// A corpus document with its precomputed embedding.
#[derive(Debug, Clone)]
pub struct StoredDocument {
    pub id: usize,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredDocument {
    pub id: usize,
    pub text: String,
    /// Cosine similarity in [-1, 1].
    pub score: f32,
}

/// In-process store of embedded corpus documents, searched by cosine
/// similarity. Filled once at startup, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct VectorStore {
    documents: Vec<StoredDocument>,
    dimension: Option<usize>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append documents. Every embedding must share one dimension.
    pub fn upsert(&mut self, documents: Vec<StoredDocument>) -> Result<(), EmbeddingError> {
        if documents.is_empty() {
            return Ok(());
        }

        // Only commit the dimension once the whole batch agrees with it.
        let expected = self
            .dimension
            .unwrap_or_else(|| documents[0].embedding.len());
        for doc in &documents {
            if doc.embedding.len() != expected {
                return Err(EmbeddingError::DimensionMismatch {
                    expected,
                    actual: doc.embedding.len(),
                });
            }
        }

        tracing::debug!("Upserting {} documents into vector store", documents.len());
        self.dimension = Some(expected);
        self.documents.extend(documents);
        Ok(())
    }

    /// Top `limit` documents by descending similarity. Equal scores keep
    /// insertion order.
    pub fn search(&self, query: &[f32], limit: usize) -> Vec<ScoredDocument> {
        let mut scored: Vec<ScoredDocument> = self
            .documents
            .iter()
            .map(|doc| ScoredDocument {
                id: doc.id,
                text: doc.text.clone(),
                score: cosine_similarity(query, &doc.embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(limit);
        scored
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }
}

/// Cosine similarity; 0.0 for mismatched lengths or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let x = f64::from(x);
        let y = f64::from(y);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom <= f64::EPSILON {
        0.0
    } else {
        (dot / denom) as f32
    }
}
