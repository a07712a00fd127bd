use serde::{Deserialize, Serialize};

use super::CompanyName;

/// Point-in-time market data for one listed company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub company_name: CompanyName,
    pub share_price: Option<f64>,
    pub market_cap: Option<f64>,
}

impl MarketSnapshot {
    pub fn new(company_name: impl Into<String>, share_price: Option<f64>, market_cap: Option<f64>) -> Self {
        Self {
            company_name: company_name.into(),
            share_price,
            market_cap,
        }
    }
}

/// Summary statistics over the market snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketOverview {
    /// Sum of every non-null market cap; zero on empty data.
    pub total_market_cap: f64,
    /// Mean of non-null shareholder ratios across quarterly records; `None`
    /// when there is nothing to average.
    pub avg_shareholder_ratio: Option<f64>,
    /// Row count of the market snapshot.
    pub company_count: usize,
}
