//! ETF Insight Metrics
//!
//! Per-request numbers for one insight run: how long retrieval and the
//! completion call took, how many attempts the completion needed, and how
//! many recommendations survived validation.

use std::time::{Duration, Instant};

/// Metrics for one ETF insight request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsightMetrics {
    /// Time taken to embed the query and search the corpus (milliseconds)
    pub retrieval_latency_ms: u64,

    /// Time taken by the completion call including retries (milliseconds)
    pub llm_latency_ms: u64,

    /// Completion attempts used; 0 when the call was never made
    pub attempts: u32,

    /// Number of commentary documents placed in the prompt
    pub documents_retrieved: usize,

    /// Similarity scores of the retrieved documents
    pub similarity_scores: Vec<f32>,

    /// Recommendations that passed validation
    pub accepted: usize,

    /// Completion elements rejected by validation
    pub rejected: usize,
}

impl InsightMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_retrieval_latency(&mut self, duration: Duration) {
        self.retrieval_latency_ms = duration.as_millis() as u64;
    }

    pub fn set_llm_latency(&mut self, duration: Duration) {
        self.llm_latency_ms = duration.as_millis() as u64;
    }

    pub fn set_similarity_scores(&mut self, scores: Vec<f32>) {
        self.documents_retrieved = scores.len();
        self.similarity_scores = scores;
    }

    /// Average similarity of the retrieved documents, 0.0 when none
    pub fn avg_similarity(&self) -> f32 {
        if self.similarity_scores.is_empty() {
            0.0
        } else {
            self.similarity_scores.iter().sum::<f32>() / self.similarity_scores.len() as f32
        }
    }

    pub fn total_latency_ms(&self) -> u64 {
        self.retrieval_latency_ms + self.llm_latency_ms
    }

    /// Report metrics to tracing logs
    pub fn report(&self) {
        tracing::info!(
            "Insight Metrics: retrieval={}ms, llm={}ms, total={}ms, attempts={}, docs={}, avg_sim={:.2}, accepted={}, rejected={}",
            self.retrieval_latency_ms,
            self.llm_latency_ms,
            self.total_latency_ms(),
            self.attempts,
            self.documents_retrieved,
            self.avg_similarity(),
            self.accepted,
            self.rejected,
        );
    }
}

/// Timer helper for measuring operation latency
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}
