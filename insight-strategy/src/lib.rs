pub mod llm;
pub mod strategy;

// Re-export commonly used items from llm module
pub use llm::{
    CompletionBackend, CompletionError, EtfPromptFormatter, EtfResponseParser, InsightMetrics,
    LlmClient, LlmConfig, LlmResponse, OpenAiBackend, RagRetriever,
};

// Re-export commonly used items from strategy module
pub use strategy::{split_csv_list, EtfInsightConfig, EtfInsightPipeline, UrlInsight};
