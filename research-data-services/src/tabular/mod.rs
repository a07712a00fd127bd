pub mod bond_matcher;
mod cells;
pub mod issuer_screener;
pub mod market_aggregator;
pub mod store;

// Re-export commonly used items
pub use bond_matcher::{ChartSeries, SimilarityParams, SimilarityWindow};
pub use cells::{parse_date, parse_number};
pub use issuer_screener::{ScreeningParams, DAYS_PER_MONTH};
pub use store::{DataPaths, MarketTable, QuarterlyTable, TabularStore};
