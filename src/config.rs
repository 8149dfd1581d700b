use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_STORE_PATH: &str = "shamba_store.json";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model credential; `None` degrades the guide and ranker
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub store_path: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    /// Blank values are treated as unset.
    pub fn from_env() -> Self {
        Self {
            api_key: non_empty_env("GEMINI_API_KEY").or_else(|| non_empty_env("API_KEY")),
            model: non_empty_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base: non_empty_env("GEMINI_API_BASE")
                .map(|value| value.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            store_path: non_empty_env("SHAMBA_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
        }
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
