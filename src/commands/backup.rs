//! Backup, restore and season clear commands

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    cli::types::{MergePolicy, Season},
    core::RetryPolicy,
    ingest::IngestPipeline,
    storage::{BulkOutcome, RecordKey, StatRecord, StatStore},
    Result,
};

/// One stored record with the key it was stored under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackupEntry {
    pub key: String,
    pub record: StatRecord,
}

/// Write every stored record to `output` as pretty JSON. Returns the count.
pub fn handle_backup(store: &StatStore, output: &Path) -> Result<usize> {
    let entries: Vec<BackupEntry> = store
        .dump()?
        .into_iter()
        .map(|(key, record)| BackupEntry { key, record })
        .collect();

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, serde_json::to_string_pretty(&entries)?)?;
    info!("Wrote {} records to {}", entries.len(), output.display());
    println!("✓ Backed up {} records to {}", entries.len(), output.display());
    Ok(entries.len())
}

/// Re-upsert a backup under the keys it was taken with.
///
/// Restored records replace whatever is stored under the same key, so stats
/// added after the backup are dropped.
pub fn handle_restore(
    store: &mut StatStore,
    input: &Path,
    retry: RetryPolicy,
) -> Result<BulkOutcome> {
    let entries: Vec<BackupEntry> = serde_json::from_str(&fs::read_to_string(input)?)?;
    let items: Vec<(RecordKey, StatRecord)> = entries
        .into_iter()
        .map(|entry| {
            let key = RecordKey {
                kind: entry.record.kind,
                season: entry.record.season.clone(),
                key: entry.key,
            };
            (key, entry.record)
        })
        .collect();

    let outcome = IngestPipeline::new(store, retry).ingest_keyed(&items, MergePolicy::Replace)?;
    println!(
        "✓ Restored {} records from {}: {} created, {} updated, {} failed",
        items.len(),
        input.display(),
        outcome.created,
        outcome.updated,
        outcome.failed.len()
    );
    for failed in &outcome.failed {
        println!("    failed {}: {}", failed.identity, failed.reason);
    }
    Ok(outcome)
}

/// Delete every record of `season`. Returns the number removed.
pub fn handle_clear(store: &mut StatStore, season: &Season) -> Result<usize> {
    let removed = store.clear_season(season)?;
    println!("✓ Cleared {} records for {}", removed, season);
    Ok(removed)
}
