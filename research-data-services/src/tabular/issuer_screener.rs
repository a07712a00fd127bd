use chrono::{Duration, Local, NaiveDate};
use research_core::schema;
use research_core::{IssuerCandidate, MarketSnapshot, QuarterlyFinancials};
use std::collections::HashMap;

use super::store::TabularStore;
use crate::error::DataError;

/// Days counted per month when computing the maturity cutoff.
pub const DAYS_PER_MONTH: i64 = 30;

/// Thresholds for [`TabularStore::find_potential_issuers`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningParams {
    pub min_market_cap: f64,
    /// May be `f64::INFINITY` for "no limit".
    pub max_debt_ratio: f64,
    pub min_shareholder_ratio: f64,
    pub months_to_maturity: u32,
    pub max_results: usize,
    /// Attach each company's earliest bond maturity from the bond report
    /// when the quarterly report has no prior-bond maturity column.
    pub attach_bond_maturity: bool,
}

impl Default for ScreeningParams {
    fn default() -> Self {
        Self {
            min_market_cap: 0.0,
            max_debt_ratio: f64::INFINITY,
            min_shareholder_ratio: 0.0,
            months_to_maturity: 9,
            max_results: 10,
            attach_bond_maturity: false,
        }
    }
}

impl ScreeningParams {
    /// Last maturity date that still passes the screen. A window reaching
    /// past the calendar's end saturates at `NaiveDate::MAX`.
    pub fn maturity_cutoff(&self, today: NaiveDate) -> NaiveDate {
        Duration::try_days(DAYS_PER_MONTH * i64::from(self.months_to_maturity))
            .and_then(|window| today.checked_add_signed(window))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Where the prior-bond maturity of a joined row comes from.
enum MaturitySource {
    Quarterly,
    Bonds(HashMap<String, NaiveDate>),
    Absent,
}

impl TabularStore {
    /// Companies likely to issue a new bond, highest market cap first.
    ///
    /// Any failure (missing column, no quarter data) is logged and yields an
    /// empty list.
    pub fn find_potential_issuers(&self, params: &ScreeningParams) -> Vec<IssuerCandidate> {
        self.find_potential_issuers_as_of(params, Local::now().date_naive())
    }

    /// Same as [`find_potential_issuers`](Self::find_potential_issuers) with
    /// an explicit "today".
    pub fn find_potential_issuers_as_of(
        &self,
        params: &ScreeningParams,
        today: NaiveDate,
    ) -> Vec<IssuerCandidate> {
        match self.screen_issuers(params, today) {
            Ok(issuers) => issuers,
            Err(e) => {
                tracing::error!("Error in find_potential_issuers: {}", e);
                Vec::new()
            }
        }
    }

    fn screen_issuers(
        &self,
        params: &ScreeningParams,
        today: NaiveDate,
    ) -> Result<Vec<IssuerCandidate>, DataError> {
        for column in [schema::MARKET_CAP, schema::SHARE_PRICE] {
            if !self.market.has_column(column) {
                return Err(DataError::MissingColumn(column.to_string()));
            }
        }
        for column in [schema::DEBT_RATIO, schema::SHAREHOLDER_RATIO] {
            if !self.quarterly.has_column(column) {
                return Err(DataError::MissingColumn(column.to_string()));
            }
        }

        let joined = self.join_market_quarterly();
        tracing::info!("Total companies before filtering: {}", joined.len());

        let headers = self
            .market
            .headers
            .iter()
            .chain(self.quarterly.headers.iter())
            .map(String::as_str);
        let revenue_label = schema::latest_revenue_column(headers)
            .ok_or_else(|| DataError::MissingColumn("<N>분기 매출액".to_string()))?
            .to_string();
        let profit_label = schema::profit_column_for(&revenue_label);
        if !self.quarterly.has_column(&profit_label) {
            return Err(DataError::MissingColumn(profit_label));
        }

        let maturity_source = self.maturity_source(params);
        let cutoff = params.maturity_cutoff(today);

        let mut issuers: Vec<IssuerCandidate> = joined
            .into_iter()
            .filter_map(|(market, quarterly)| {
                let market_cap = market.market_cap.filter(|c| *c >= params.min_market_cap)?;
                let debt_ratio = quarterly.debt_ratio.filter(|d| *d <= params.max_debt_ratio)?;
                let shareholder_ratio = quarterly
                    .major_shareholder_ratio
                    .filter(|s| *s >= params.min_shareholder_ratio)?;

                Some(IssuerCandidate {
                    company_name: market.company_name.clone(),
                    share_price: market.share_price,
                    market_cap,
                    latest_revenue_label: revenue_label.clone(),
                    latest_revenue: quarterly.figure(&revenue_label),
                    latest_profit_label: profit_label.clone(),
                    latest_profit: quarterly.figure(&profit_label),
                    debt_ratio,
                    shareholder_ratio,
                    prior_bond_maturity: match &maturity_source {
                        MaturitySource::Quarterly => quarterly.prior_bond_maturity,
                        MaturitySource::Bonds(by_company) => {
                            by_company.get(&market.company_name).copied()
                        }
                        MaturitySource::Absent => None,
                    },
                })
            })
            .collect();

        tracing::info!("Companies after threshold filtering: {}", issuers.len());

        if matches!(maturity_source, MaturitySource::Absent) {
            tracing::warn!(
                "'{}' column not found in the dataset",
                schema::PRIOR_BOND_MATURITY
            );
        } else {
            issuers.retain(|i| i.prior_bond_maturity.is_some_and(|d| d <= cutoff));
            tracing::info!(
                "Companies after maturity date filtering (cutoff {}): {}",
                cutoff,
                issuers.len()
            );
        }

        issuers.sort_by(|a, b| b.market_cap.total_cmp(&a.market_cap));
        issuers.truncate(params.max_results);

        Ok(issuers)
    }

    /// Inner join on company name, market row order first. Empty keys never join.
    fn join_market_quarterly(&self) -> Vec<(&MarketSnapshot, &QuarterlyFinancials)> {
        let mut by_company: HashMap<&str, Vec<&QuarterlyFinancials>> = HashMap::new();
        for row in &self.quarterly.rows {
            if !row.company_name.is_empty() {
                by_company.entry(row.company_name.as_str()).or_default().push(row);
            }
        }

        self.market
            .rows
            .iter()
            .filter(|m| !m.company_name.is_empty())
            .flat_map(|m| {
                by_company
                    .get(m.company_name.as_str())
                    .into_iter()
                    .flatten()
                    .map(move |q| (m, *q))
            })
            .collect()
    }

    fn maturity_source(&self, params: &ScreeningParams) -> MaturitySource {
        if self.quarterly.has_column(schema::PRIOR_BOND_MATURITY) {
            return MaturitySource::Quarterly;
        }
        if !params.attach_bond_maturity {
            return MaturitySource::Absent;
        }

        let mut earliest: HashMap<String, NaiveDate> = HashMap::new();
        for bond in &self.bonds {
            let Some(maturity) = bond.maturity_date else {
                continue;
            };
            if bond.company_name.is_empty() {
                continue;
            }
            earliest
                .entry(bond.company_name.clone())
                .and_modify(|d| *d = (*d).min(maturity))
                .or_insert(maturity);
        }
        MaturitySource::Bonds(earliest)
    }
}
