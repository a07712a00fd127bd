/// Strategy module containing the RAG-enhanced ETF insight pipeline
pub mod etf_insight;

pub use etf_insight::{split_csv_list, EtfInsightConfig, EtfInsightPipeline, UrlInsight};
