pub mod bond;
pub mod financials;
pub mod market_snapshot;
pub mod outcome;
pub mod recommendation;

// Re-export common types
pub use bond::{normalize_security_name, BondRecord, IssuanceSummary, SimilarityCandidate};
pub use financials::{IssuerCandidate, QuarterlyFinancials};
pub use market_snapshot::{MarketOverview, MarketSnapshot};
pub use outcome::{InsightFailure, InsightOutcome, SubjectKind};
pub use recommendation::{
    EtfRecommendation, RejectedRecommendation, MAX_TICKER_LEN, MAX_TOP_HOLDINGS,
};

/// Korean company name as written in the source reports (e.g. "삼성전자")
pub type CompanyName = String;
