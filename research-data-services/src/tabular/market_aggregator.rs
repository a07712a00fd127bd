use research_core::{BondRecord, IssuanceSummary, MarketOverview};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::store::TabularStore;

/// Number of issues listed in [`IssuanceSummary::recent_issues`].
const RECENT_ISSUES: usize = 5;

impl TabularStore {
    /// Totals over the market snapshot and the quarterly shareholder ratios.
    pub fn market_overview(&self) -> MarketOverview {
        let total_market_cap = self.market.rows.iter().filter_map(|m| m.market_cap).sum();
        let avg_shareholder_ratio = mean(
            self.quarterly
                .rows
                .iter()
                .filter_map(|q| q.major_shareholder_ratio),
        );

        MarketOverview {
            total_market_cap,
            avg_shareholder_ratio,
            company_count: self.market.rows.len(),
        }
    }

    /// Totals and recent activity over the bond issuance report.
    pub fn issuance_summary(&self) -> IssuanceSummary {
        let mut issuer_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for bond in &self.bonds {
            if !bond.issuer_name.is_empty() {
                *issuer_counts.entry(bond.issuer_name.as_str()).or_default() += 1;
            }
        }
        // BTreeMap iterates names in order, so the first maximum wins ties.
        let most_common_issuer = issuer_counts
            .iter()
            .fold(None::<(&str, usize)>, |best, (name, count)| match best {
                Some((_, best_count)) if best_count >= *count => best,
                _ => Some((*name, *count)),
            })
            .map(|(name, _)| name.to_string());

        let mut recent: Vec<&BondRecord> = self.bonds.iter().collect();
        recent.sort_by(|a, b| match (a.issue_date, b.issue_date) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });

        IssuanceSummary {
            total_issues: self.bonds.len(),
            avg_amount: mean(self.bonds.iter().filter_map(|b| b.total_amount)),
            avg_interest_rate: mean(self.bonds.iter().filter_map(|b| b.coupon_rate)),
            most_common_issuer,
            recent_issues: recent.into_iter().take(RECENT_ISSUES).cloned().collect(),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::store::{MarketTable, QuarterlyTable};
    use chrono::NaiveDate;
    use research_core::{MarketSnapshot, QuarterlyFinancials};

    fn quarterly(ratios: &[Option<f64>]) -> QuarterlyTable {
        QuarterlyTable {
            headers: vec![],
            rows: ratios
                .iter()
                .enumerate()
                .map(|(i, r)| {
                    let mut row = QuarterlyFinancials::new(format!("회사{i}"));
                    row.major_shareholder_ratio = *r;
                    row
                })
                .collect(),
        }
    }

    fn market(caps: &[Option<f64>]) -> MarketTable {
        MarketTable {
            headers: vec![],
            rows: caps
                .iter()
                .enumerate()
                .map(|(i, c)| MarketSnapshot::new(format!("회사{i}"), None, *c))
                .collect(),
        }
    }

    fn issued(issuer: &str, date: Option<(i32, u32, u32)>) -> BondRecord {
        BondRecord::new(issuer, format!("{issuer} CB"))
            .with_terms(1_000_000.0, 5.0)
            .with_dates(date.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)), None)
    }

    #[test]
    fn test_market_overview() {
        let store = TabularStore::from_parts(
            vec![],
            quarterly(&[Some(40.0), None, Some(20.0)]),
            market(&[Some(100.0), None, Some(50.0), Some(25.0)]),
        );
        let overview = store.market_overview();
        assert_eq!(overview.total_market_cap, 175.0);
        assert_eq!(overview.avg_shareholder_ratio, Some(30.0));
        assert_eq!(overview.company_count, 4);
    }

    #[test]
    fn test_market_overview_empty() {
        let overview = TabularStore::default().market_overview();
        assert_eq!(overview.total_market_cap, 0.0);
        assert_eq!(overview.avg_shareholder_ratio, None);
        assert_eq!(overview.company_count, 0);
    }

    #[test]
    fn test_company_count_matches_market_rows() {
        for n in [0usize, 1, 7] {
            let store = TabularStore::from_parts(vec![], QuarterlyTable::default(), market(&vec![None; n]));
            assert_eq!(store.market_overview().company_count, n);
        }
    }

    #[test]
    fn test_issuance_summary() {
        let bonds = vec![
            issued("베타", Some((2023, 1, 1))),
            issued("알파", Some((2024, 6, 1))),
            issued("베타", None),
            issued("알파", Some((2022, 3, 1))),
            issued("감마", Some((2024, 9, 1))),
            issued("감마", Some((2021, 1, 1))),
        ];
        let store = TabularStore::from_parts(bonds, QuarterlyTable::default(), MarketTable::default());
        let summary = store.issuance_summary();

        assert_eq!(summary.total_issues, 6);
        assert_eq!(summary.avg_amount, Some(1_000_000.0));
        assert_eq!(summary.avg_interest_rate, Some(5.0));
        // Three-way tie at two issues each; lexically smallest wins.
        assert_eq!(summary.most_common_issuer.as_deref(), Some("감마"));

        let dates: Vec<_> = summary.recent_issues.iter().map(|b| b.issue_date).collect();
        assert_eq!(summary.recent_issues.len(), 5);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 9, 1));
        assert_eq!(dates[1], NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(dates[4], NaiveDate::from_ymd_opt(2021, 1, 1));
    }

    #[test]
    fn test_issuance_summary_empty() {
        let summary = TabularStore::default().issuance_summary();
        assert_eq!(summary.total_issues, 0);
        assert_eq!(summary.avg_amount, None);
        assert_eq!(summary.most_common_issuer, None);
        assert!(summary.recent_issues.is_empty());
    }
}
