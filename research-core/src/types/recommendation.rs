use serde::{Deserialize, Serialize};

/// Longest ticker accepted from a completion.
pub const MAX_TICKER_LEN: usize = 5;

/// Largest number of top holdings accepted from a completion.
pub const MAX_TOP_HOLDINGS: usize = 5;

/// A validated ETF recommendation parsed from one completion element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EtfRecommendation {
    /// Uppercase, at most [`MAX_TICKER_LEN`] characters.
    pub ticker: String,
    #[serde(rename = "top5")]
    pub top_holdings: Vec<String>,
    pub explanation: String,
    pub holdings_weight: String,
    pub expense_ratio: String,
    /// Comma-joined keywords, present for keyword-driven requests.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub search_keywords: Option<String>,
}

/// A completion element that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRecommendation {
    /// Position of the element in the decoded array.
    pub index: usize,
    pub reason: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_with_top5_key() {
        let rec = EtfRecommendation {
            ticker: "SOXX".to_string(),
            top_holdings: vec!["NVDA".to_string()],
            explanation: "반도체".to_string(),
            holdings_weight: "9%".to_string(),
            expense_ratio: "0.35%".to_string(),
            search_keywords: None,
        };

        let value = serde_json::to_value(&rec).unwrap();
        assert_eq!(value["top5"][0], "NVDA");
        assert!(value.get("search_keywords").is_none());
    }
}
