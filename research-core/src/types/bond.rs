use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::CompanyName;

/// One historical mezzanine bond issuance. Read-only once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondRecord {
    pub issuer_name: String,
    pub security_name: String,
    /// `security_name` truncated to its first token; the key used to join
    /// bonds against the quarterly and market reports.
    pub company_name: CompanyName,
    pub total_amount: Option<f64>,
    pub coupon_rate: Option<f64>,
    pub issue_date: Option<NaiveDate>,
    pub maturity_date: Option<NaiveDate>,
}

impl BondRecord {
    /// Create a record with only names set; the join key is derived here so
    /// no caller has to normalize later.
    pub fn new(issuer_name: impl Into<String>, security_name: impl Into<String>) -> Self {
        let security_name = security_name.into();
        let company_name = normalize_security_name(&security_name).to_string();
        Self {
            issuer_name: issuer_name.into(),
            security_name,
            company_name,
            total_amount: None,
            coupon_rate: None,
            issue_date: None,
            maturity_date: None,
        }
    }

    pub fn with_terms(mut self, total_amount: f64, coupon_rate: f64) -> Self {
        self.total_amount = Some(total_amount);
        self.coupon_rate = Some(coupon_rate);
        self
    }

    pub fn with_dates(mut self, issue_date: Option<NaiveDate>, maturity_date: Option<NaiveDate>) -> Self {
        self.issue_date = issue_date;
        self.maturity_date = maturity_date;
        self
    }
}

/// First whitespace-delimited token of a security name ("에코프로 3CB" → "에코프로").
///
/// Idempotent: normalizing an already normalized name returns it unchanged.
pub fn normalize_security_name(name: &str) -> &str {
    name.split_whitespace().next().unwrap_or("")
}

/// A bond scored against a target amount and coupon rate. Lower score is
/// more similar.
///
/// `amount_diff` is relative to the target amount while `rate_diff` is in
/// absolute percentage points, so the two terms are on different scales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityCandidate {
    #[serde(flatten)]
    pub bond: BondRecord,
    pub amount_diff: f64,
    pub rate_diff: f64,
    pub similarity_score: f64,
    /// Issuer market cap from the market snapshot, if the company is listed there.
    pub market_cap: Option<f64>,
}

/// Aggregate view of the bond issuance dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssuanceSummary {
    pub total_issues: usize,
    pub avg_amount: Option<f64>,
    pub avg_interest_rate: Option<f64>,
    pub most_common_issuer: Option<String>,
    /// Newest first.
    pub recent_issues: Vec<BondRecord>,
}
