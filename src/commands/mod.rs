//! Command implementations for the EPL analytics CLI

pub mod backup;
pub mod common;
pub mod compare;
pub mod fetch;
pub mod ingest;
pub mod list;

pub use backup::{handle_backup, handle_clear, handle_restore};
pub use common::{print_reports, sync_season, SyncOptions};
pub use compare::{handle_compare, CompareParams};
pub use fetch::{handle_fetch, FetchParams};
pub use ingest::{handle_ingest, IngestParams};
pub use list::{handle_list, ListParams};
