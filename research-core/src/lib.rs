//! Shared record types for the mezzanine bond tracker and the ETF insight
//! pipeline.

pub mod messages;
pub mod schema;
pub mod types;

// Re-export common types
pub use types::{
    normalize_security_name, BondRecord, CompanyName, EtfRecommendation, InsightFailure,
    InsightOutcome, IssuanceSummary, IssuerCandidate, MarketOverview, MarketSnapshot,
    QuarterlyFinancials, RejectedRecommendation, SimilarityCandidate, SubjectKind, MAX_TICKER_LEN,
    MAX_TOP_HOLDINGS,
};
