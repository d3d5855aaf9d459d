//! Premier League statistics ingestion and comparison library
//!
//! Ingests player and team statistics from season CSV exports, a deterministic
//! mock generator or the live Premier League pulse API, validates them and
//! upserts them idempotently into a local SQLite store. The analytics layer
//! normalizes counting stats per 90 minutes, derives clinicality and goal
//! contribution, and ranks players by percentile for radar comparisons.
//!
//! ## Quick Start
//!
//! ```rust
//! use epl_analytics::{
//!     analysis::{with_derived_metrics, PercentileFrame},
//!     ingest::{IngestPipeline, UniqueKey},
//!     processing::{normalize_per_90, RawRecord, StatTable},
//!     storage::{ListQuery, StatStore},
//!     MergePolicy, RecordKind, RetryPolicy, Season,
//! };
//!
//! # fn main() -> epl_analytics::Result<()> {
//! let season = Season::new("2023-24")?;
//! let row: RawRecord = serde_json::from_str(
//!     r#"{"id": "p1", "name": "Test", "goals": 10, "xg": 8.0, "minutes_played": 900}"#,
//! )?;
//!
//! let mut store = StatStore::open_in_memory()?;
//! let report = IngestPipeline::new(&mut store, RetryPolicy::default()).ingest_raw(
//!     "doc",
//!     RecordKind::Player,
//!     &season,
//!     &[row],
//!     &UniqueKey::default_for(RecordKind::Player),
//!     MergePolicy::Merge,
//! )?;
//! assert_eq!(report.created, 1);
//!
//! let table: StatTable = store
//!     .list(&ListQuery::new(RecordKind::Player, season))?
//!     .into_iter()
//!     .collect();
//! let table = with_derived_metrics(&normalize_per_90(&table, &["goals"])?);
//! assert_eq!(table.records()[0].stat("goals_per90"), Some(1.0));
//! assert_eq!(table.records()[0].stat("clinicality"), Some(2.0));
//!
//! let frame = PercentileFrame::from_table(&table, &["goals_per90"]);
//! assert_eq!(frame.rank("goals_per90", 1.0), Some(1.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! ```bash
//! export EPL_DB_PATH=~/.cache/epl-analytics/epl.db
//! export EPL_DATA_DIR=./data/processed
//! ```

pub mod analysis;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod ingest;
pub mod processing;
pub mod source;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{MergePolicy, RecordKind, Season, SourceKind};
pub use config::AppConfig;
pub use core::RetryPolicy;
pub use error::{Result, StatsError};
pub use storage::{StatRecord, StatStore};
