use std::env;
use std::time::Duration;

use anyhow::{Result, anyhow};

pub const API_KEY_ENV: &str = "PERPLEXITY_API_KEY";
pub const TIMEOUT_MS_ENV: &str = "PERPLEXITY_TIMEOUT_MS";
pub const BASE_URL_ENV: &str = "PERPLEXITY_BASE_URL";

const DEFAULT_API_BASE_URL: &str = "https://api.perplexity.ai";
const DEFAULT_TIMEOUT_MS: u64 = 300_000;

/// Runtime configuration, resolved once at startup and passed by reference
/// into every flow. Nothing reads the environment after this point.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base_url: String,
    pub timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(|key| env::var(key).ok())
    }

    fn from_env_with(mut get_var: impl FnMut(&str) -> Option<String>) -> Result<Self> {
        let api_key = get_var(API_KEY_ENV)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| anyhow!("{} environment variable is required", API_KEY_ENV))?;
        let api_base_url =
            get_var(BASE_URL_ENV).unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let timeout_ms = parse_timeout_ms(get_var(TIMEOUT_MS_ENV).as_deref());

        Ok(Self {
            api_key,
            api_base_url,
            timeout_ms,
        })
    }

    /// Timeout applied to the single outbound request.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Timeout in seconds, for diagnostics.
    pub fn timeout_secs(&self) -> f64 {
        self.timeout_ms as f64 / 1000.0
    }
}

fn parse_timeout_ms(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_TIMEOUT_MS)
}
