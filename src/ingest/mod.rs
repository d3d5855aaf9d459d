//! Idempotent upsert ingestion of validated records.
//!
//! A batch goes to the store as one transaction. Records the store rejects
//! are counted as failed and the rest proceed; a busy or locked store aborts
//! the transaction and the whole batch is retried with backoff.

use crate::cli::types::{MergePolicy, RecordKind, Season};
use crate::core::{retry_blocking, RetryPolicy};
use crate::error::{Result, StatsError};
use crate::processing::{RawRecord, RecordValidator, SkippedRecord};
use crate::storage::{BulkOutcome, FailedRecord, RecordKey, StatRecord, StatStore};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

#[cfg(test)]
mod tests;

/// A record field that can take part in a uniqueness key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyField {
    Season,
    Id,
    Team,
    Name,
}

impl KeyField {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyField::Season => "season",
            KeyField::Id => "id",
            KeyField::Team => "team",
            KeyField::Name => "name",
        }
    }

    fn value<'a>(&self, record: &'a StatRecord) -> &'a str {
        match self {
            KeyField::Season => record.season.as_str(),
            KeyField::Id => &record.id,
            KeyField::Team => &record.team,
            KeyField::Name => &record.name,
        }
    }
}

impl FromStr for KeyField {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "season" => Ok(KeyField::Season),
            "id" | "player_id" => Ok(KeyField::Id),
            "team" | "team_name" => Ok(KeyField::Team),
            "name" => Ok(KeyField::Name),
            other => Err(StatsError::configuration(format!(
                "unknown unique key field '{other}'"
            ))),
        }
    }
}

/// Ordered identity tuple records are matched on. Always includes `season`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueKey {
    fields: Vec<KeyField>,
}

impl UniqueKey {
    pub fn new(fields: &[&str]) -> Result<Self> {
        let mut parsed: Vec<KeyField> = Vec::with_capacity(fields.len());
        for field in fields {
            let field: KeyField = field.parse()?;
            if parsed.contains(&field) {
                return Err(StatsError::configuration(format!(
                    "unique key lists '{}' twice",
                    field.as_str()
                )));
            }
            parsed.push(field);
        }
        if !parsed.contains(&KeyField::Season) {
            return Err(StatsError::configuration("unique key must include 'season'"));
        }
        if parsed.len() < 2 {
            return Err(StatsError::configuration(
                "unique key needs at least one field besides 'season'",
            ));
        }
        Ok(Self { fields: parsed })
    }

    /// Parse a comma-separated key such as `season,id`.
    pub fn parse(text: &str) -> Result<Self> {
        let fields: Vec<&str> = text.split(',').filter(|f| !f.trim().is_empty()).collect();
        Self::new(&fields)
    }

    /// `(season, id)`; a team's id is its name.
    pub fn default_for(_kind: RecordKind) -> Self {
        Self {
            fields: vec![KeyField::Season, KeyField::Id],
        }
    }

    pub fn fields(&self) -> &[KeyField] {
        &self.fields
    }

    /// Store key for `record`; an empty key field is a validation error.
    pub fn resolve(&self, record: &StatRecord) -> Result<RecordKey> {
        let mut parts = Vec::with_capacity(self.fields.len() - 1);
        for field in self.fields.iter().filter(|f| **f != KeyField::Season) {
            let value = field.value(record).trim();
            if value.is_empty() {
                return Err(StatsError::validation(field.as_str()));
            }
            parts.push(value);
        }
        Ok(RecordKey {
            kind: record.kind,
            season: record.season.clone(),
            key: parts.join("|"),
        })
    }
}

impl fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.fields.iter().map(KeyField::as_str).collect();
        write!(f, "({})", names.join(", "))
    }
}

/// Counts from one [`IngestPipeline::ingest`] call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestOutcome {
    pub created: usize,
    pub updated: usize,
    /// Records that never reached the store (wrong kind, empty key field).
    pub skipped: Vec<SkippedRecord>,
    /// Records the store rejected.
    pub failed: Vec<FailedRecord>,
}

/// Upserts batches into an injected store.
pub struct IngestPipeline<'a> {
    store: &'a mut StatStore,
    retry: RetryPolicy,
}

impl<'a> IngestPipeline<'a> {
    pub fn new(store: &'a mut StatStore, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Upsert `records` keyed by `key`.
    ///
    /// Re-running an identical batch creates nothing and leaves stored values
    /// as they were.
    pub fn ingest(
        &mut self,
        kind: RecordKind,
        records: &[StatRecord],
        key: &UniqueKey,
        policy: MergePolicy,
    ) -> Result<IngestOutcome> {
        let mut outcome = IngestOutcome::default();
        let mut items = Vec::with_capacity(records.len());
        for record in records {
            if record.kind != kind {
                outcome.skipped.push(SkippedRecord {
                    identity: record.identity(),
                    reason: format!("expected a {kind} record"),
                });
                continue;
            }
            match key.resolve(record) {
                Ok(record_key) => items.push((record_key, record.clone())),
                Err(e) => outcome.skipped.push(SkippedRecord {
                    identity: record.identity(),
                    reason: e.to_string(),
                }),
            }
        }

        if items.is_empty() {
            debug!("Nothing to upsert for {} batch", kind);
            return Ok(outcome);
        }

        let bulk = self.ingest_keyed(&items, policy)?;
        info!(
            "Upserted {} {} records keyed by {}: {} created, {} updated, {} failed",
            items.len(),
            kind,
            key,
            bulk.created,
            bulk.updated,
            bulk.failed.len()
        );

        outcome.created = bulk.created;
        outcome.updated = bulk.updated;
        outcome.failed = bulk.failed;
        Ok(outcome)
    }

    /// Upsert records whose store keys are already known, retrying the whole
    /// batch on transient store errors.
    pub fn ingest_keyed(
        &mut self,
        items: &[(RecordKey, StatRecord)],
        policy: MergePolicy,
    ) -> Result<BulkOutcome> {
        let store = &mut *self.store;
        retry_blocking(&self.retry, "bulk upsert", || store.bulk_upsert(items, policy))
    }

    /// Validate raw rows and upsert the valid ones, producing a run report.
    ///
    /// Only the fields each row supplied are written, so under `Merge` a
    /// source that lacks a column keeps what another source stored.
    pub fn ingest_raw(
        &mut self,
        source: &str,
        kind: RecordKind,
        season: &Season,
        raws: &[RawRecord],
        key: &UniqueKey,
        policy: MergePolicy,
    ) -> Result<SourceReport> {
        let batch = RecordValidator::new(kind, season.clone()).validate_batch_supplied(raws);
        let mut report = SourceReport::new(source, kind, season);
        report.validated = batch.records.len();
        report.skipped_invalid = batch.skipped.len();
        report.skipped = batch.skipped;

        let outcome = self.ingest(kind, &batch.records, key, policy)?;
        report.record(outcome);
        Ok(report)
    }
}

/// Per-source summary printed at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub source: String,
    pub kind: RecordKind,
    pub season: Season,
    pub validated: usize,
    pub skipped_invalid: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    pub skipped: Vec<SkippedRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceReport {
    pub fn new(source: &str, kind: RecordKind, season: &Season) -> Self {
        Self {
            source: source.to_string(),
            kind,
            season: season.clone(),
            validated: 0,
            skipped_invalid: 0,
            created: 0,
            updated: 0,
            failed: 0,
            skipped: Vec::new(),
            error: None,
        }
    }

    /// Report for a source that failed before anything was written.
    pub fn failed_source(
        source: &str,
        kind: RecordKind,
        season: &Season,
        err: &StatsError,
    ) -> Self {
        let mut report = Self::new(source, kind, season);
        report.error = Some(err.to_string());
        report
    }

    /// Fold a pipeline outcome into this report.
    pub fn record(&mut self, outcome: IngestOutcome) {
        self.created += outcome.created;
        self.updated += outcome.updated;
        self.skipped_invalid += outcome.skipped.len();
        self.skipped.extend(outcome.skipped);
        self.failed += outcome.failed.len();
        self.skipped
            .extend(outcome.failed.into_iter().map(|f| SkippedRecord {
                identity: f.identity,
                reason: f.reason,
            }));
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

impl fmt::Display for SourceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: validated={} skipped_invalid={} created={} updated={} failed={}",
            self.source,
            self.season,
            self.kind,
            self.validated,
            self.skipped_invalid,
            self.created,
            self.updated,
            self.failed
        )?;
        if let Some(error) = &self.error {
            write!(f, " error={error}")?;
        }
        Ok(())
    }
}
