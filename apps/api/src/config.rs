use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if neither a database nor a profiles file is configured.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Postgres for profiles and feedback. Optional when `profiles_path` is set.
    pub database_url: Option<String>,
    /// JSON array of candidates, used instead of the `professionals` table.
    pub profiles_path: Option<PathBuf>,
    /// JSON sector catalog overriding the built-in one.
    pub sectors_path: Option<PathBuf>,
    pub index_refresh_interval: Duration,
    pub weight_adjust_interval: Duration,
    pub feedback_window_hours: i64,
    pub feedback_min_samples: usize,
    pub max_shortlist: usize,
    pub max_top_k: usize,
    /// Scoring threads. 0 means one per available core.
    pub match_workers: usize,
    pub suggest_poll_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Config {
            port: parse_or(&get, "PORT", 8080)?,
            rust_log: get("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            database_url: get("DATABASE_URL"),
            profiles_path: get("PROFILES_PATH").map(PathBuf::from),
            sectors_path: get("SECTORS_PATH").map(PathBuf::from),
            index_refresh_interval: Duration::from_secs(parse_or(&get, "INDEX_REFRESH_SECS", 300)?),
            weight_adjust_interval: Duration::from_secs(parse_or(&get, "WEIGHT_ADJUST_SECS", 3600)?),
            feedback_window_hours: parse_or(&get, "FEEDBACK_WINDOW_HOURS", 168)?,
            feedback_min_samples: parse_or(&get, "FEEDBACK_MIN_SAMPLES", 20)?,
            max_shortlist: parse_or(&get, "MATCH_MAX_SHORTLIST", 500)?,
            max_top_k: parse_or(&get, "MATCH_MAX_TOP_K", 50)?,
            match_workers: parse_or(&get, "MATCH_WORKERS", 0)?,
            suggest_poll_secs: parse_or(&get, "SUGGEST_POLL_SECS", 3)?,
        };

        if config.database_url.is_none() && config.profiles_path.is_none() {
            bail!("Either DATABASE_URL or PROFILES_PATH must be set");
        }
        if config.index_refresh_interval.is_zero() || config.weight_adjust_interval.is_zero() {
            bail!("INDEX_REFRESH_SECS and WEIGHT_ADJUST_SECS must be positive");
        }
        if config.feedback_window_hours <= 0 {
            bail!("FEEDBACK_WINDOW_HOURS must be positive");
        }
        if config.max_top_k == 0 || config.max_shortlist == 0 {
            bail!("MATCH_MAX_TOP_K and MATCH_MAX_SHORTLIST must be positive");
        }

        Ok(config)
    }
}

fn parse_or<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}
