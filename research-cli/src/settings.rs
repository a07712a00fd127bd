use anyhow::{Context, Result};
use std::path::PathBuf;

/// Process configuration read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub data_dir: PathBuf,
    pub llm_model: String,
}

impl Settings {
    pub const DEFAULT_DATA_DIR: &'static str = "data";
    pub const DEFAULT_LLM_MODEL: &'static str = "gpt-4";

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Blank values count as unset.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            openai_api_key: get("OPENAI_API_KEY"),
            data_dir: get("RESEARCH_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_DATA_DIR)),
            llm_model: get("LLM_MODEL").unwrap_or_else(|| Self::DEFAULT_LLM_MODEL.to_string()),
        }
    }

    pub fn require_openai_api_key(&self) -> Result<&str> {
        self.openai_api_key
            .as_deref()
            .context("OPENAI_API_KEY is not set. Please check your .env file.")
    }
}
