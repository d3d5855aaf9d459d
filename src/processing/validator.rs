//! Turns untrusted raw rows into validated [`StatRecord`]s.

use super::schema::{
    fields_for, normalize_header, PLAYER_ID_ALIASES, PLAYER_NAME_ALIASES, POSITION_ALIASES,
    TEAM_NAME_ALIASES,
};
use super::RawRecord;
use crate::cli::types::{ids::derived_player_id, RecordKind, Season};
use crate::error::{Result, StatsError};
use crate::storage::{StatMap, StatRecord};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;


/// A raw row that did not make it into the batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    pub identity: String,
    pub reason: String,
}

/// Output of [`RecordValidator::validate_batch`].
#[derive(Debug, Clone, Default)]
pub struct ValidatedBatch {
    pub records: Vec<StatRecord>,
    pub skipped: Vec<SkippedRecord>,
}

/// Parse a raw cell as a number, falling back to `default`.
///
/// Accepts JSON numbers and numeric strings (thousands separators and a
/// trailing `%` are tolerated). Anything else, including null, empty strings
/// and non-finite values, yields `default`. Never fails.
pub fn coerce_number(value: Option<&Value>, default: f64) -> f64 {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let cleaned: String = s
                .trim()
                .trim_end_matches('%')
                .chars()
                .filter(|c| *c != ',')
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(default)
}

/// Read a raw cell as a trimmed, non-empty string.
fn coerce_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Validates rows of one kind for one season.
#[derive(Debug, Clone)]
pub struct RecordValidator {
    kind: RecordKind,
    season: Season,
}

impl RecordValidator {
    pub fn new(kind: RecordKind, season: Season) -> Self {
        Self { kind, season }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Validate one raw row.
    ///
    /// Every schema field is present on the result (zero when absent or
    /// malformed), counts are whole numbers, negatives are clamped to zero and
    /// percentages into [0, 100]. Only a missing identity is an error.
    pub fn validate(&self, raw: &RawRecord) -> Result<StatRecord> {
        self.build(raw, true)
    }

    /// Like [`validate`](Self::validate), but only fields whose header is in
    /// the row get a stat. A present header with a malformed cell still counts
    /// as supplied and is stored as zero.
    ///
    /// This is what gets upserted, so a `Merge` leaves stored fields the row
    /// never mentioned alone.
    pub fn validate_supplied(&self, raw: &RawRecord) -> Result<StatRecord> {
        self.build(raw, false)
    }

    fn build(&self, raw: &RawRecord, fill_defaults: bool) -> Result<StatRecord> {
        let normalized: HashMap<String, &Value> = raw
            .iter()
            .map(|(k, v)| (normalize_header(k), v))
            .collect();

        let mut record = match self.kind {
            RecordKind::Player => {
                let name = coerce_text(lookup(&normalized, PLAYER_NAME_ALIASES));
                let team = coerce_text(lookup(&normalized, TEAM_NAME_ALIASES));
                let id = match coerce_text(lookup(&normalized, PLAYER_ID_ALIASES)) {
                    Some(id) => id,
                    None => match (&name, &team) {
                        (Some(name), Some(team)) => derived_player_id(team, name),
                        (None, _) => return Err(StatsError::validation("player_id")),
                        (Some(_), None) => return Err(StatsError::validation("team")),
                    },
                };
                let mut record = StatRecord::new(RecordKind::Player, id, self.season.clone());
                record.name = name.unwrap_or_default();
                record.team = team.unwrap_or_default();
                record.position =
                    coerce_text(lookup(&normalized, POSITION_ALIASES)).unwrap_or_default();
                record
            }
            RecordKind::Team => {
                let team_name = coerce_text(lookup(&normalized, TEAM_NAME_ALIASES))
                    .or_else(|| coerce_text(lookup(&normalized, &["name"])))
                    .ok_or_else(|| StatsError::validation("team_name"))?;
                StatRecord::new(RecordKind::Team, team_name.clone(), self.season.clone())
                    .with_name(team_name)
            }
        };

        let mut stats = StatMap::new();
        for field in fields_for(self.kind) {
            let raw_value = lookup(&normalized, &[field.name])
                .or_else(|| lookup(&normalized, field.aliases));
            if raw_value.is_none() && !fill_defaults {
                continue;
            }
            stats.insert(field.name.to_string(), field.bound(coerce_number(raw_value, 0.0)));
        }
        record.stats = stats;

        Ok(record)
    }

    /// Validate a batch, collecting rows with a missing identity as skipped.
    pub fn validate_batch(&self, raws: &[RawRecord]) -> ValidatedBatch {
        self.collect_batch(raws, true)
    }

    /// Batch form of [`validate_supplied`](Self::validate_supplied).
    pub fn validate_batch_supplied(&self, raws: &[RawRecord]) -> ValidatedBatch {
        self.collect_batch(raws, false)
    }

    fn collect_batch(&self, raws: &[RawRecord], fill_defaults: bool) -> ValidatedBatch {
        let mut batch = ValidatedBatch::default();
        for (row, raw) in raws.iter().enumerate() {
            match self.build(raw, fill_defaults) {
                Ok(record) => batch.records.push(record),
                Err(e) => {
                    let identity = describe_row(raw, row);
                    debug!("Skipping {} {}: {}", self.kind, identity, e);
                    batch.skipped.push(SkippedRecord {
                        identity,
                        reason: e.to_string(),
                    });
                }
            }
        }
        batch
    }
}

fn lookup<'a>(normalized: &HashMap<String, &'a Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|a| normalized.get(*a).copied())
}

/// Best-effort label for a row that failed validation.
fn describe_row(raw: &RawRecord, row: usize) -> String {
    let hint = raw
        .iter()
        .filter(|(k, _)| {
            let k = normalize_header(k);
            PLAYER_NAME_ALIASES.contains(&k.as_str()) || TEAM_NAME_ALIASES.contains(&k.as_str())
        })
        .find_map(|(_, v)| coerce_text(Some(v)));
    match hint {
        Some(hint) => format!("row {} ({})", row + 1, hint),
        None => format!("row {}", row + 1),
    }
}
