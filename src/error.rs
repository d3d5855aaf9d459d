//! Error types for the EPL analytics pipeline

use thiserror::Error;

#[cfg(test)]
mod tests;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Error, Debug)]
pub enum StatsError {
    /// A required identity field is missing or malformed on one record.
    #[error("Validation failed: missing or invalid field '{field}'")]
    Validation { field: String },

    /// A structural precondition does not hold; the run cannot continue.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The store was busy, locked or timed out. Safe to retry the whole batch.
    #[error("Transient store error: {message}")]
    TransientStore { message: String },

    #[error("Source not found: {path}")]
    SourceNotFound { path: String },

    #[error("Invalid season '{season}' (expected e.g. 2023-24)")]
    InvalidSeason { season: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("System time error: {0}")]
    SystemTime(#[from] std::time::SystemTimeError),
}

impl StatsError {
    pub fn validation(field: impl Into<String>) -> Self {
        StatsError::Validation {
            field: field.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        StatsError::Configuration {
            message: message.into(),
        }
    }

    /// Errors worth retrying at the batch or request boundary.
    pub fn is_transient(&self) -> bool {
        match self {
            StatsError::TransientStore { .. } => true,
            StatsError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.status().is_some_and(|s| {
                        s.is_server_error() || s == reqwest::StatusCode::TOO_MANY_REQUESTS
                    })
            }
            _ => false,
        }
    }

    /// Errors that abort the whole run rather than a single source.
    pub fn is_fatal(&self) -> bool {
        matches!(self, StatsError::Configuration { .. })
    }
}

/// Map SQLite busy/locked failures to `TransientStore`, leaving the rest as `Database`.
pub(crate) fn classify_db_error(err: rusqlite::Error) -> StatsError {
    match err.sqlite_error_code() {
        Some(rusqlite::ErrorCode::DatabaseBusy) | Some(rusqlite::ErrorCode::DatabaseLocked) => {
            StatsError::TransientStore {
                message: err.to_string(),
            }
        }
        _ => StatsError::Database(err),
    }
}
