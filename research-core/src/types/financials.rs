use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CompanyName;

/// One row of the quarterly business report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuarterlyFinancials {
    pub company_name: CompanyName,
    /// Every quarter-labelled revenue and operating-profit column, keyed by
    /// its header. Header order lives on the table, not here.
    pub quarter_figures: BTreeMap<String, Option<f64>>,
    pub debt_ratio: Option<f64>,
    pub major_shareholder_ratio: Option<f64>,
    /// Maturity of a previously issued bond, when the report carries it.
    pub prior_bond_maturity: Option<NaiveDate>,
}

impl QuarterlyFinancials {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            ..Default::default()
        }
    }

    /// Value of a quarter-labelled column, `None` if absent or null.
    pub fn figure(&self, column: &str) -> Option<f64> {
        self.quarter_figures.get(column).copied().flatten()
    }
}

/// A company that passed the issuer screen: market snapshot joined with its
/// quarterly report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuerCandidate {
    pub company_name: CompanyName,
    pub share_price: Option<f64>,
    pub market_cap: f64,
    /// Header of the latest quarter revenue column, e.g. `2024년 2분기 매출액`.
    pub latest_revenue_label: String,
    pub latest_revenue: Option<f64>,
    pub latest_profit_label: String,
    pub latest_profit: Option<f64>,
    pub debt_ratio: f64,
    pub shareholder_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prior_bond_maturity: Option<NaiveDate>,
}
