use research_core::{BondRecord, SimilarityCandidate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::store::TabularStore;

/// Knobs for [`TabularStore::find_similar_bonds`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityParams {
    /// Maximum number of bonds returned.
    pub count: usize,
    /// Fractional window around the target amount (0.3 = ±30%).
    pub amount_tolerance: f64,
    /// Window around the target coupon rate, in hundredths of a rate point.
    pub rate_tolerance_points: f64,
}

impl Default for SimilarityParams {
    fn default() -> Self {
        Self {
            count: 5,
            amount_tolerance: 0.3,
            rate_tolerance_points: 2.0,
        }
    }
}

/// Inclusive selection windows for one similarity query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityWindow {
    pub amount_lower: f64,
    pub amount_upper: f64,
    pub rate_lower: f64,
    pub rate_upper: f64,
}

impl SimilarityWindow {
    pub fn new(target_amount: f64, target_rate: f64, params: &SimilarityParams) -> Self {
        let rate_tolerance = params.rate_tolerance_points / 100.0;
        Self {
            amount_lower: target_amount * (1.0 - params.amount_tolerance),
            amount_upper: target_amount * (1.0 + params.amount_tolerance),
            rate_lower: target_rate - rate_tolerance,
            rate_upper: target_rate + rate_tolerance,
        }
    }

    pub fn contains_amount(&self, amount: Option<f64>) -> bool {
        amount.is_some_and(|a| a >= self.amount_lower && a <= self.amount_upper)
    }

    pub fn contains_rate(&self, rate: Option<f64>) -> bool {
        rate.is_some_and(|r| r >= self.rate_lower && r <= self.rate_upper)
    }

    /// A bond is a candidate when it falls in either window.
    pub fn admits(&self, bond: &BondRecord) -> bool {
        self.contains_amount(bond.total_amount) || self.contains_rate(bond.coupon_rate)
    }
}

impl TabularStore {
    /// Rank historical bonds by closeness to a target amount and coupon rate,
    /// most similar first.
    ///
    /// Candidates are bonds inside the amount window or the rate window. The
    /// score is `|amount - target| / target + |rate - target_rate|`. Bonds
    /// missing either figure cannot be scored and are skipped.
    pub fn find_similar_bonds(
        &self,
        target_amount: f64,
        target_rate: f64,
        params: &SimilarityParams,
    ) -> Vec<SimilarityCandidate> {
        if !(target_amount.is_finite() && target_amount > 0.0) || !target_rate.is_finite() {
            tracing::warn!(
                "Invalid similarity target: amount={}, rate={}",
                target_amount,
                target_rate
            );
            return Vec::new();
        }

        let window = SimilarityWindow::new(target_amount, target_rate, params);

        let mut scored: Vec<SimilarityCandidate> = self
            .bonds
            .iter()
            .filter(|bond| window.admits(bond))
            .filter_map(|bond| {
                let amount = bond.total_amount?;
                let rate = bond.coupon_rate?;
                let amount_diff = (amount - target_amount).abs() / target_amount;
                let rate_diff = (rate - target_rate).abs();
                Some(SimilarityCandidate {
                    bond: bond.clone(),
                    amount_diff,
                    rate_diff,
                    similarity_score: amount_diff + rate_diff,
                    market_cap: None,
                })
            })
            .collect();

        scored.sort_by(|a, b| a.similarity_score.total_cmp(&b.similarity_score));
        scored.truncate(params.count);

        let caps = self.market_caps_by_company();
        for candidate in &mut scored {
            candidate.market_cap = caps
                .get(candidate.bond.company_name.as_str())
                .copied()
                .flatten();
        }

        tracing::debug!(
            "Total bonds before filtering: {}, within amount range: {}, within rate range: {}",
            self.bonds.len(),
            self.bonds.iter().filter(|b| window.contains_amount(b.total_amount)).count(),
            self.bonds.iter().filter(|b| window.contains_rate(b.coupon_rate)).count()
        );
        tracing::info!("Similar bonds found: {}", scored.len());

        scored
    }

    /// First market cap seen per company; rows with an empty key never join.
    fn market_caps_by_company(&self) -> HashMap<&str, Option<f64>> {
        let mut caps = HashMap::new();
        for row in &self.market.rows {
            if row.company_name.is_empty() {
                continue;
            }
            caps.entry(row.company_name.as_str()).or_insert(row.market_cap);
        }
        caps
    }
}

/// Parallel series for charting a similarity result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub amounts: Vec<f64>,
    pub interest_rates: Vec<f64>,
}

impl ChartSeries {
    pub fn from_candidates(candidates: &[SimilarityCandidate]) -> Self {
        let mut series = Self::default();
        for c in candidates {
            series.labels.push(c.bond.issuer_name.clone());
            series.amounts.push(c.bond.total_amount.unwrap_or_default());
            series.interest_rates.push(c.bond.coupon_rate.unwrap_or_default());
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::store::{MarketTable, QuarterlyTable};
    use research_core::MarketSnapshot;

    fn bond(security: &str, amount: f64, rate: f64) -> BondRecord {
        let issuer = security.split_whitespace().next().unwrap_or_default();
        BondRecord::new(issuer, security).with_terms(amount, rate)
    }

    fn store(bonds: Vec<BondRecord>) -> TabularStore {
        let market = MarketTable {
            headers: vec![],
            rows: vec![
                MarketSnapshot::new("알파", Some(1000.0), Some(5.0e9)),
                MarketSnapshot::new("알파", Some(1000.0), Some(9.9e9)),
            ],
        };
        TabularStore::from_parts(bonds, QuarterlyTable::default(), market)
    }

    #[test]
    fn test_window_bounds() {
        let w = SimilarityWindow::new(1_000_000.0, 5.0, &SimilarityParams::default());
        assert!((w.amount_lower - 700_000.0).abs() < 1e-6);
        assert!((w.amount_upper - 1_300_000.0).abs() < 1e-6);
        assert!((w.rate_lower - 4.98).abs() < 1e-9);
        assert!((w.rate_upper - 5.02).abs() < 1e-9);
    }

    #[test]
    fn test_union_not_intersection() {
        let store = store(vec![
            bond("알파 1CB", 1_000_000.0, 12.0), // amount only
            bond("베타 2CB", 50_000_000.0, 5.0), // rate only
            bond("감마 3CB", 50_000_000.0, 12.0), // neither
        ]);

        let results = store.find_similar_bonds(1_000_000.0, 5.0, &SimilarityParams::default());
        let names: Vec<_> = results.iter().map(|c| c.bond.company_name.as_str()).collect();
        assert_eq!(results.len(), 2);
        assert!(names.contains(&"알파"));
        assert!(names.contains(&"베타"));
    }

    #[test]
    fn test_scores_sorted_and_truncated() {
        let store = store(vec![
            bond("A 1", 1_200_000.0, 5.0),
            bond("B 1", 1_000_000.0, 5.0),
            bond("C 1", 900_000.0, 6.0),
            bond("D 1", 1_100_000.0, 5.01),
        ]);

        let params = SimilarityParams {
            count: 3,
            ..Default::default()
        };
        let results = store.find_similar_bonds(1_000_000.0, 5.0, &params);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].bond.company_name, "B");
        assert_eq!(results[0].similarity_score, 0.0);
        assert!(results
            .windows(2)
            .all(|w| w[0].similarity_score <= w[1].similarity_score));
    }

    #[test]
    fn test_score_mixes_relative_amount_and_absolute_rate() {
        let store = store(vec![bond("A 1", 1_100_000.0, 6.0)]);
        let results = store.find_similar_bonds(1_000_000.0, 5.0, &SimilarityParams::default());
        let c = &results[0];
        assert!((c.amount_diff - 0.1).abs() < 1e-9);
        assert!((c.rate_diff - 1.0).abs() < 1e-9);
        assert!((c.similarity_score - 1.1).abs() < 1e-9);
    }

    #[test]
    fn test_market_cap_left_join() {
        let store = store(vec![bond("알파 1CB", 1_000_000.0, 5.0), bond("없음 1CB", 1_000_000.0, 5.0)]);
        let results = store.find_similar_bonds(1_000_000.0, 5.0, &SimilarityParams::default());

        assert_eq!(results.len(), 2);
        let alpha = results.iter().find(|c| c.bond.company_name == "알파").unwrap();
        let missing = results.iter().find(|c| c.bond.company_name == "없음").unwrap();
        assert_eq!(alpha.market_cap, Some(5.0e9)); // first market row wins
        assert_eq!(missing.market_cap, None);
    }

    #[test]
    fn test_blank_security_name_gets_no_market_cap() {
        let market = MarketTable {
            headers: vec![],
            rows: vec![
                MarketSnapshot::new("", Some(1.0), Some(7.0e9)),
                MarketSnapshot::new("알파", Some(1000.0), Some(5.0e9)),
            ],
        };
        let bonds = vec![
            BondRecord::new("", "   ").with_terms(1_000_000.0, 5.0),
            bond("알파 1CB", 1_000_000.0, 5.0),
        ];
        let store = TabularStore::from_parts(bonds, QuarterlyTable::default(), market);
        let results = store.find_similar_bonds(1_000_000.0, 5.0, &SimilarityParams::default());

        assert_eq!(results.len(), 2);
        let blank = results.iter().find(|c| c.bond.company_name.is_empty()).unwrap();
        assert_eq!(blank.market_cap, None);
        let alpha = results.iter().find(|c| c.bond.company_name == "알파").unwrap();
        assert_eq!(alpha.market_cap, Some(5.0e9));
    }

    #[test]
    fn test_unscorable_bonds_are_skipped() {
        let mut no_rate = BondRecord::new("A", "A 1");
        no_rate.total_amount = Some(1_000_000.0);
        let store = store(vec![no_rate]);
        assert!(store
            .find_similar_bonds(1_000_000.0, 5.0, &SimilarityParams::default())
            .is_empty());
    }

    #[test]
    fn test_empty_store_and_invalid_target() {
        let empty = TabularStore::default();
        assert!(empty
            .find_similar_bonds(1_000_000.0, 5.0, &SimilarityParams::default())
            .is_empty());

        let store = store(vec![bond("A 1", 1_000_000.0, 5.0)]);
        assert!(store.find_similar_bonds(0.0, 5.0, &SimilarityParams::default()).is_empty());
        assert!(store
            .find_similar_bonds(f64::NAN, 5.0, &SimilarityParams::default())
            .is_empty());
    }

    #[test]
    fn test_chart_series_follows_result_order() {
        let store = store(vec![bond("알파 1CB", 1_000_000.0, 5.0), bond("베타 1CB", 1_100_000.0, 5.0)]);
        let results = store.find_similar_bonds(1_000_000.0, 5.0, &SimilarityParams::default());
        let chart = ChartSeries::from_candidates(&results);
        assert_eq!(chart.labels, vec!["알파", "베타"]);
        assert_eq!(chart.amounts, vec![1_000_000.0, 1_100_000.0]);
        assert_eq!(chart.interest_rates, vec![5.0, 5.0]);
    }
}
