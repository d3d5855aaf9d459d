//! Runtime configuration resolved from the environment.
//!
//! `main` loads `.env` with dotenvy first, so values there behave like real
//! environment variables. CLI flags override whatever is resolved here.

use crate::core::RetryPolicy;
use crate::error::{Result, StatsError};
use crate::storage::StatStore;
use std::path::PathBuf;
use std::time::Duration;

pub const DB_PATH_VAR: &str = "EPL_DB_PATH";
pub const DATA_DIR_VAR: &str = "EPL_DATA_DIR";
pub const LOG_LEVEL_VAR: &str = "EPL_LOG_LEVEL";
pub const STORE_TIMEOUT_VAR: &str = "EPL_STORE_TIMEOUT_SECS";
pub const HTTP_TIMEOUT_VAR: &str = "EPL_HTTP_TIMEOUT_SECS";
pub const RETRY_ATTEMPTS_VAR: &str = "EPL_RETRY_ATTEMPTS";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Directory holding the `TEAM_*.csv` and `EPL_*.csv` season files.
    pub data_dir: PathBuf,
    pub log_level: String,
    pub store_timeout: Duration,
    pub http_timeout: Duration,
    pub retry_attempts: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let db_path = match get(DB_PATH_VAR) {
            Some(path) => PathBuf::from(path),
            None => StatStore::default_path()?,
        };
        let data_dir = get(DATA_DIR_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));
        let log_level = get(LOG_LEVEL_VAR).unwrap_or_else(|| "info".to_string());

        let store_secs = parse_number(STORE_TIMEOUT_VAR, get(STORE_TIMEOUT_VAR), 5)?;
        let http_secs = parse_number(HTTP_TIMEOUT_VAR, get(HTTP_TIMEOUT_VAR), 10)?;
        let attempts = parse_number(RETRY_ATTEMPTS_VAR, get(RETRY_ATTEMPTS_VAR), 3)?;

        let store_timeout = Duration::from_secs(store_secs);
        let http_timeout = Duration::from_secs(http_secs);
        let retry_attempts = u32::try_from(attempts.max(1)).unwrap_or(u32::MAX);

        Ok(Self {
            db_path,
            data_dir,
            log_level,
            store_timeout,
            http_timeout,
            retry_attempts,
        })
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts)
    }
}

fn parse_number(key: &str, value: Option<String>, default: u64) -> Result<u64> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
            StatsError::configuration(format!("{key} must be a whole number, got '{raw}'"))
        }),
    }
}
