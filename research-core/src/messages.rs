//! Localized (Korean) informational and failure messages shown to end users.

pub const NO_RELATED_ETFS_FOR_ARTICLE: &str = "해당 기사와 관련된 ETF가 없습니다";
pub const NO_RELATED_ETFS_FOR_KEYWORDS: &str = "해당 키워드와 관련된 ETF가 없습니다";
pub const UNPARSEABLE_RESPONSE: &str = "응답을 구문 분석할 수 없습니다.";
pub const NO_VALID_ETF_INFO: &str = "응답에 유효한 ETF 정보가 없습니다.";
pub const ARTICLE_UNAVAILABLE: &str = "해당 기사 내용을 가져오지 못했습니다.";
pub const GENERATION_FAILED: &str = "ETF 추천을 가져오는 데 실패했습니다.";
