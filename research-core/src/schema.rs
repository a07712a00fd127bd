//! Column headers of the three source CSV reports.
//!
//! The reports are exported from Korean disclosure data, so the headers are
//! Korean. Quarter-labelled columns are not fixed: a quarterly report carries
//! one revenue and one operating-profit column per reported quarter, e.g.
//! `2024년 2분기 매출액` / `2024년 2분기 영업이익`.

/// Security (issue) name. Also the company join key in the quarterly and
/// market reports.
pub const SECURITY_NAME: &str = "종목명";

/// Bond issuance report: company the bond was issued to/by.
pub const ISSUER_NAME: &str = "발행대상 회사";
pub const TOTAL_AMOUNT: &str = "총발행금액 (₩)";
pub const COUPON_RATE: &str = "표면이자율 (%)";
pub const ISSUE_DATE: &str = "발행일";
pub const MATURITY_DATE: &str = "만기일";

/// Quarterly report ratios.
pub const DEBT_RATIO: &str = "부채비율";
pub const SHAREHOLDER_RATIO: &str = "대주주 지분율(%)";

/// Maturity date of the company's previously issued bond.
pub const PRIOR_BOND_MATURITY: &str = "기발행사채만기일";

/// Market snapshot report.
pub const SHARE_PRICE: &str = "주가 (₩)";
pub const MARKET_CAP: &str = "시가총액 (₩)";

pub const REVENUE_METRIC: &str = "매출액";
pub const PROFIT_METRIC: &str = "영업이익";
const QUARTER_MARKER: &str = "분기";

/// Date format used by every date column.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// True when the header contains `<digit>분기 매출액`.
pub fn is_quarter_revenue_column(header: &str) -> bool {
    is_quarter_column(header, REVENUE_METRIC)
}

/// True when the header contains `<digit>분기 영업이익`.
pub fn is_quarter_profit_column(header: &str) -> bool {
    is_quarter_column(header, PROFIT_METRIC)
}

fn is_quarter_column(header: &str, metric: &str) -> bool {
    let needle = format!("{QUARTER_MARKER} {metric}");
    header.match_indices(&needle).any(|(idx, _)| {
        header[..idx]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_numeric())
    })
}

/// Operating-profit column paired with a quarter revenue column.
pub fn profit_column_for(revenue_column: &str) -> String {
    revenue_column.replace(REVENUE_METRIC, PROFIT_METRIC)
}

/// Last quarter revenue column in data-source order.
pub fn latest_revenue_column<'a, I>(headers: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    headers
        .into_iter()
        .filter(|h| is_quarter_revenue_column(h))
        .last()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarter_revenue_detection() {
        assert!(is_quarter_revenue_column("2024년 2분기 매출액"));
        assert!(is_quarter_revenue_column("3분기 매출액"));
        assert!(!is_quarter_revenue_column("분기 매출액"));
        assert!(!is_quarter_revenue_column("2024년 2분기 영업이익"));
        assert!(!is_quarter_revenue_column(DEBT_RATIO));
    }

    #[test]
    fn test_profit_column_pairing() {
        assert_eq!(profit_column_for("2024년 2분기 매출액"), "2024년 2분기 영업이익");
        assert!(is_quarter_profit_column(&profit_column_for("1분기 매출액")));
    }

    #[test]
    fn test_latest_revenue_column_uses_source_order() {
        let headers = [
            SECURITY_NAME,
            "2024년 1분기 매출액",
            "2024년 1분기 영업이익",
            "2024년 2분기 매출액",
            "2024년 2분기 영업이익",
            DEBT_RATIO,
        ];
        assert_eq!(latest_revenue_column(headers), Some("2024년 2분기 매출액"));
        assert_eq!(latest_revenue_column([SECURITY_NAME, DEBT_RATIO]), None);
    }
}
