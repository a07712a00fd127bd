use serde::{Deserialize, Serialize};

use super::{EtfRecommendation, RejectedRecommendation};
use crate::messages;

/// What an insight request was about. Selects the wording of the
/// "nothing relevant" message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubjectKind {
    Article,
    Keywords,
}

/// Why an insight request produced no recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsightFailure {
    /// The article could not be fetched or had no content region.
    ArticleUnavailable,
    /// The completion call failed or exhausted its retries.
    GenerationFailed,
    /// The completion text did not decode as JSON.
    Unparseable,
    /// The completion decoded but every element failed validation.
    NoValidRecommendations { rejected: Vec<RejectedRecommendation> },
}

impl InsightFailure {
    pub fn message(&self) -> &'static str {
        match self {
            InsightFailure::ArticleUnavailable => messages::ARTICLE_UNAVAILABLE,
            InsightFailure::GenerationFailed => messages::GENERATION_FAILED,
            InsightFailure::Unparseable => messages::UNPARSEABLE_RESPONSE,
            InsightFailure::NoValidRecommendations { .. } => messages::NO_VALID_ETF_INFO,
        }
    }
}

/// Result of one ETF insight request.
///
/// Callers branch on the variant: data, a deliberate "nothing relevant"
/// answer from the model, or a failure with a user-facing message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum InsightOutcome {
    Recommendations(Vec<EtfRecommendation>),
    NoSignal(SubjectKind),
    Failed(InsightFailure),
}

impl InsightOutcome {
    /// Localized message for the non-data variants.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            InsightOutcome::Recommendations(_) => None,
            InsightOutcome::NoSignal(SubjectKind::Article) => {
                Some(messages::NO_RELATED_ETFS_FOR_ARTICLE)
            }
            InsightOutcome::NoSignal(SubjectKind::Keywords) => {
                Some(messages::NO_RELATED_ETFS_FOR_KEYWORDS)
            }
            InsightOutcome::Failed(failure) => Some(failure.message()),
        }
    }

    pub fn recommendations(&self) -> &[EtfRecommendation] {
        match self {
            InsightOutcome::Recommendations(recs) => recs,
            _ => &[],
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, InsightOutcome::Failed(_))
    }
}
