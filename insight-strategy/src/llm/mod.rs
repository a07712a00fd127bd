pub mod completion;
pub mod llm_client;
pub mod metrics;
pub mod prompt_formatter;
pub mod rag_retriever;
pub mod response_parser;

// Re-export commonly used items
pub use completion::{ChatRequest, CompletionBackend, CompletionError, OpenAiBackend};
pub use llm_client::{LlmClient, LlmConfig, LlmResponse};
pub use metrics::{InsightMetrics, MetricsTimer};
pub use prompt_formatter::{EtfPromptFormatter, NO_RELEVANT_ETFS_SENTINEL};
pub use rag_retriever::RagRetriever;
pub use response_parser::{strip_code_fence, EtfResponseParser, ParsedResponse};
