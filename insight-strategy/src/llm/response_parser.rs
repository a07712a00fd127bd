use research_core::{
    EtfRecommendation, InsightFailure, InsightOutcome, RejectedRecommendation, SubjectKind,
    MAX_TICKER_LEN, MAX_TOP_HOLDINGS,
};
use serde_json::Value;

use super::prompt_formatter::NO_RELEVANT_ETFS_SENTINEL;

/// Parser output plus the elements that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedResponse {
    pub outcome: InsightOutcome,
    pub rejected: Vec<RejectedRecommendation>,
}

/// Turns a raw completion into an [`InsightOutcome`].
pub struct EtfResponseParser;

impl EtfResponseParser {
    pub fn parse(raw: &str, keywords: Option<&[String]>, subject: SubjectKind) -> InsightOutcome {
        Self::parse_detailed(raw, keywords, subject).outcome
    }

    /// The completion is untrusted: every element is validated and the ones
    /// that fail are reported, not dropped silently.
    pub fn parse_detailed(
        raw: &str,
        keywords: Option<&[String]>,
        subject: SubjectKind,
    ) -> ParsedResponse {
        let body = strip_code_fence(raw);

        if body == NO_RELEVANT_ETFS_SENTINEL {
            return ParsedResponse {
                outcome: InsightOutcome::NoSignal(subject),
                rejected: Vec::new(),
            };
        }

        // The prompt asks for one object per ETF without an enclosing array.
        let decoded = if body.starts_with('[') {
            serde_json::from_str::<Value>(body)
        } else {
            serde_json::from_str::<Value>(&format!("[{}]", body))
        };

        let elements = match decoded {
            Ok(Value::Array(elements)) => elements,
            Ok(other) => vec![other],
            Err(e) => {
                tracing::warn!("Could not decode completion as JSON: {}", e);
                return ParsedResponse {
                    outcome: InsightOutcome::Failed(InsightFailure::Unparseable),
                    rejected: Vec::new(),
                };
            }
        };

        let search_keywords = keywords
            .filter(|k| !k.is_empty())
            .map(|k| k.join(", "));

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for (index, element) in elements.iter().enumerate() {
            match validate(element) {
                Ok(mut rec) => {
                    rec.search_keywords = search_keywords.clone();
                    accepted.push(rec);
                }
                Err(reason) => {
                    tracing::warn!("Rejected recommendation #{}: {}", index, reason);
                    rejected.push(RejectedRecommendation { index, reason });
                }
            }
        }

        let outcome = if accepted.is_empty() {
            InsightOutcome::Failed(InsightFailure::NoValidRecommendations {
                rejected: rejected.clone(),
            })
        } else {
            InsightOutcome::Recommendations(accepted)
        };

        ParsedResponse { outcome, rejected }
    }
}

/// Remove a surrounding Markdown fence (```json ... ```), if any. The fence
/// may sit on the same line as the payload.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(mut inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    if let Some(end) = inner.rfind("```") {
        inner = &inner[..end];
    }
    // Info string (`json`, `JSON`, ...) runs up to whitespace or the payload.
    let payload_start = inner
        .find(|c: char| c.is_whitespace() || c == '{' || c == '[')
        .unwrap_or(inner.len());
    inner[payload_start..].trim()
}

fn validate(element: &Value) -> Result<EtfRecommendation, String> {
    let obj = element
        .as_object()
        .ok_or_else(|| "element is not an object".to_string())?;

    let ticker = obj
        .get("ticker")
        .and_then(Value::as_str)
        .map(|t| t.trim().to_uppercase())
        .unwrap_or_default();
    if ticker.is_empty() {
        return Err("missing ticker".to_string());
    }
    if ticker.chars().count() > MAX_TICKER_LEN {
        return Err(format!("ticker '{}' longer than {} characters", ticker, MAX_TICKER_LEN));
    }

    let holdings = obj
        .get("top5")
        .and_then(Value::as_array)
        .ok_or_else(|| "missing top5 holdings".to_string())?;
    if holdings.is_empty() {
        return Err("empty top5 holdings".to_string());
    }
    if holdings.len() > MAX_TOP_HOLDINGS {
        return Err(format!(
            "{} holdings listed, at most {} allowed",
            holdings.len(),
            MAX_TOP_HOLDINGS
        ));
    }
    let top_holdings = holdings
        .iter()
        .map(|h| h.as_str().map(|s| s.trim().to_string()))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| "top5 holdings must be strings".to_string())?;

    let explanation = obj
        .get("explanation")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or_default();
    if explanation.is_empty() {
        return Err("missing explanation".to_string());
    }

    Ok(EtfRecommendation {
        ticker,
        top_holdings,
        explanation: explanation.to_string(),
        holdings_weight: text_field(obj.get("holdings_weight")),
        expense_ratio: text_field(obj.get("expense_ratio")),
        search_keywords: None,
    })
}

/// Optional descriptive field; non-string values keep their JSON text.
fn text_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_core::messages;
    use serde_json::json;

    fn qqq() -> Value {
        json!({
            "ticker": "qqq",
            "top5": ["Apple", "Microsoft", "NVIDIA", "Amazon", "Meta"],
            "explanation": "나스닥 100 지수를 추종하는 대표 ETF입니다.",
            "holdings_weight": "8.9%, 8.1%, 7.6%, 5.3%, 4.9%",
            "expense_ratio": "0.20%"
        })
    }

    #[test]
    fn test_single_object_round_trip() {
        let outcome = EtfResponseParser::parse(&qqq().to_string(), None, SubjectKind::Article);
        let recs = outcome.recommendations();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].ticker, "QQQ");
        assert_eq!(recs[0].top_holdings.len(), 5);
        assert_eq!(recs[0].search_keywords, None);
    }

    #[test]
    fn test_sentinel_is_no_signal() {
        let outcome = EtfResponseParser::parse("NO_RELEVANT_ETFS_FOUND", None, SubjectKind::Article);
        assert_eq!(outcome, InsightOutcome::NoSignal(SubjectKind::Article));
        assert_eq!(outcome.message(), Some(messages::NO_RELATED_ETFS_FOR_ARTICLE));

        let outcome = EtfResponseParser::parse(" NO_RELEVANT_ETFS_FOUND\n", None, SubjectKind::Keywords);
        assert_eq!(outcome.message(), Some(messages::NO_RELATED_ETFS_FOR_KEYWORDS));
    }

    #[test]
    fn test_truncated_json_is_unparseable() {
        let raw = r#"{"ticker": "QQQ", "top5": ["Apple", "Micro"#;
        let outcome = EtfResponseParser::parse(raw, None, SubjectKind::Article);
        assert_eq!(outcome, InsightOutcome::Failed(InsightFailure::Unparseable));
        assert_eq!(outcome.message(), Some(messages::UNPARSEABLE_RESPONSE));
    }

    #[test]
    fn test_comma_separated_objects_and_existing_array() {
        let mut soxl = qqq();
        soxl["ticker"] = json!("SOXL");

        let bare = format!("{},\n{}", qqq(), soxl);
        let outcome = EtfResponseParser::parse(&bare, None, SubjectKind::Article);
        assert_eq!(outcome.recommendations().len(), 2);

        let array = json!([qqq(), soxl]).to_string();
        let outcome = EtfResponseParser::parse(&array, None, SubjectKind::Article);
        assert_eq!(outcome.recommendations().len(), 2);
        assert_eq!(outcome.recommendations()[1].ticker, "SOXL");
    }

    #[test]
    fn test_code_fence_is_stripped() {
        let fenced = format!("```json\n{}\n```", qqq());
        let outcome = EtfResponseParser::parse(&fenced, None, SubjectKind::Article);
        assert_eq!(outcome.recommendations()[0].ticker, "QQQ");
    }

    #[test]
    fn test_invalid_elements_are_reported() {
        let mut long_ticker = qqq();
        long_ticker["ticker"] = json!("TOOLONG");
        let mut no_holdings = qqq();
        no_holdings["top5"] = json!([]);

        let raw = json!([long_ticker, qqq(), no_holdings]).to_string();
        let parsed = EtfResponseParser::parse_detailed(&raw, None, SubjectKind::Article);

        assert_eq!(parsed.outcome.recommendations().len(), 1);
        let indexes: Vec<_> = parsed.rejected.iter().map(|r| r.index).collect();
        assert_eq!(indexes, vec![0, 2]);
    }

    #[test]
    fn test_all_invalid_is_distinct_from_no_signal() {
        let mut no_explanation = qqq();
        no_explanation["explanation"] = json!("  ");

        let outcome =
            EtfResponseParser::parse(&no_explanation.to_string(), None, SubjectKind::Article);
        match &outcome {
            InsightOutcome::Failed(InsightFailure::NoValidRecommendations { rejected }) => {
                assert_eq!(rejected.len(), 1);
                assert_eq!(rejected[0].reason, "missing explanation");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(outcome.message(), Some(messages::NO_VALID_ETF_INFO));
    }

    #[test]
    fn test_keywords_attached_and_scalars_stringified() {
        let mut rec = qqq();
        rec["expense_ratio"] = json!(0.2);
        rec["holdings_weight"] = json!(null);

        let keywords = vec!["AI".to_string(), "반도체".to_string()];
        let outcome =
            EtfResponseParser::parse(&rec.to_string(), Some(&keywords), SubjectKind::Keywords);
        let parsed = &outcome.recommendations()[0];
        assert_eq!(parsed.search_keywords.as_deref(), Some("AI, 반도체"));
        assert_eq!(parsed.expense_ratio, "0.2");
        assert_eq!(parsed.holdings_weight, "");
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```\n[1]\n```\n"), "[1]");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json {\"a\":1} ```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```[\n{\"a\":1}\n]\n```"), "[\n{\"a\":1}\n]");
    }

    #[test]
    fn test_single_line_fence_is_stripped() {
        let fenced = format!("```json {} ```", qqq());
        let outcome = EtfResponseParser::parse(&fenced, None, SubjectKind::Article);
        assert_eq!(outcome.recommendations().len(), 1);
        assert_eq!(outcome.recommendations()[0].ticker, "QQQ");
    }
}
