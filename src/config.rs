use crate::storage::resolve_data_path;
use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_INSIGHT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_INSIGHT_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_INSIGHT_TIMEOUT_SECS: u64 = 30;

/// Process settings, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub insight: InsightConfig,
}

#[derive(Debug, Clone)]
pub struct InsightConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: parse_var("PORT").unwrap_or(DEFAULT_PORT),
            data_path: resolve_data_path(),
            insight: InsightConfig::from_env(),
        }
    }
}

impl InsightConfig {
    pub fn from_env() -> Self {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        Self {
            api_key,
            model: env::var("OBSIDIAN_INSIGHT_MODEL").unwrap_or_else(|_| DEFAULT_INSIGHT_MODEL.to_string()),
            base_url: env::var("OBSIDIAN_INSIGHT_URL").unwrap_or_else(|_| DEFAULT_INSIGHT_URL.to_string()),
            timeout: Duration::from_secs(
                parse_var("OBSIDIAN_INSIGHT_TIMEOUT_SECS").unwrap_or(DEFAULT_INSIGHT_TIMEOUT_SECS),
            ),
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_INSIGHT_MODEL.to_string(),
            base_url: DEFAULT_INSIGHT_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_INSIGHT_TIMEOUT_SECS),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.trim().parse::<T>().ok())
}
