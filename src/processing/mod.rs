//! Validation and per-90 normalization of raw statistic rows.

pub mod per90;
pub mod schema;
pub mod table;
pub mod validator;

pub use per90::{normalize_per_90, per90_column, DEFAULT_PER90_COLUMNS, MINUTES_FIELD};
pub use table::StatTable;
pub use validator::{RecordValidator, SkippedRecord, ValidatedBatch};

/// One untrusted row as read from a CSV file or an API response.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;
