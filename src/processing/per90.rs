//! Per-90-minutes normalization of counting statistics.

use super::table::StatTable;
use crate::error::{Result, StatsError};

pub const PER90_SUFFIX: &str = "_per90";
pub const MINUTES_FIELD: &str = "minutes_played";

/// Columns the dashboard compares players on.
pub const DEFAULT_PER90_COLUMNS: &[&str] = &[
    "goals",
    "assists",
    "progressive_carries",
    "progressive_passes",
    "xg",
    "xag",
];

/// Name of the derived column for `column`.
pub fn per90_column(column: &str) -> String {
    format!("{column}{PER90_SUFFIX}")
}

/// `value` rescaled to 90 minutes; `0.0` when no minutes were played.
pub fn per_90(value: f64, minutes: f64) -> f64 {
    if minutes > 0.0 {
        // Scale first so exactly 90 minutes gives back `value` bit for bit.
        // Can differ from `value / minutes * 90.0` in the last ulp.
        value * (90.0 / minutes)
    } else {
        0.0
    }
}

/// Add `<column>_per90` for each requested column.
///
/// Every record must carry `minutes_played`; a missing one is a
/// configuration error for the whole table, not a per-record skip. Records
/// that lack a requested column get no derived entry. Only base columns are
/// read, so applying this twice gives the same result as applying it once.
pub fn normalize_per_90(table: &StatTable, columns: &[&str]) -> Result<StatTable> {
    if let Some(column) = columns.iter().find(|c| c.ends_with(PER90_SUFFIX)) {
        return Err(StatsError::configuration(format!(
            "'{column}' is already a per-90 column"
        )));
    }
    if let Some(record) = table.iter().find(|r| r.stat(MINUTES_FIELD).is_none()) {
        return Err(StatsError::configuration(format!(
            "{} has no {MINUTES_FIELD} column",
            record.identity()
        )));
    }

    let normalized = table
        .iter()
        .map(|record| {
            let minutes = record.stat(MINUTES_FIELD).unwrap_or(0.0);
            let mut out = record.clone();
            for column in columns {
                if let Some(value) = record.stat(column) {
                    out.stats.insert(per90_column(column), per_90(value, minutes));
                }
            }
            out
        })
        .collect();
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::types::{RecordKind, Season};
    use crate::storage::StatRecord;

    fn player(id: &str, minutes: Option<f64>, goals: f64) -> StatRecord {
        let record = StatRecord::new(RecordKind::Player, id, Season::default())
            .with_stat("goals", goals)
            .with_stat("assists", 2.0);
        match minutes {
            Some(m) => record.with_stat(MINUTES_FIELD, m),
            None => record,
        }
    }

    #[test]
    fn test_per_90_values() {
        let table = StatTable::new(vec![
            player("full", Some(90.0), 1.0),
            player("half", Some(45.0), 1.0),
            player("ten", Some(900.0), 10.0),
        ]);
        let out = normalize_per_90(&table, &["goals", "assists"]).unwrap();
        let records = out.records();

        assert_eq!(records[0].stat("goals_per90"), Some(1.0));
        assert_eq!(records[0].stat("assists_per90"), Some(2.0));
        assert_eq!(records[1].stat("goals_per90"), Some(2.0));
        assert_eq!(records[2].stat("goals_per90"), Some(1.0));
        // Base column untouched
        assert_eq!(records[2].stat("goals"), Some(10.0));
    }

    #[test]
    fn test_full_match_is_exact() {
        for k in 0..500 {
            let value = k as f64 * 0.1;
            assert_eq!(per_90(value, 90.0), value);
            let divided_first = value / 1234.0 * 90.0;
            assert!((per_90(value, 1234.0) - divided_first).abs() <= 1e-12);
        }
    }

    #[test]
    fn test_zero_minutes_gives_zero() {
        let table = StatTable::new(vec![player("bench", Some(0.0), 3.0)]);
        let out = normalize_per_90(&table, &["goals", "assists"]).unwrap();
        assert_eq!(out.records()[0].stat("goals_per90"), Some(0.0));
        assert_eq!(out.records()[0].stat("assists_per90"), Some(0.0));
    }

    #[test]
    fn test_missing_minutes_is_configuration_error() {
        let table = StatTable::new(vec![
            player("ok", Some(90.0), 1.0),
            player("broken", None, 1.0),
        ]);
        let err = normalize_per_90(&table, &["goals"]).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_per90_column_request_rejected() {
        let table = StatTable::new(vec![player("p1", Some(90.0), 1.0)]);
        let err = normalize_per_90(&table, &["goals_per90"]).unwrap_err();
        assert!(matches!(err, StatsError::Configuration { .. }));
    }

    #[test]
    fn test_missing_column_gets_no_entry() {
        let table = StatTable::new(vec![player("p1", Some(90.0), 1.0)]);
        let out = normalize_per_90(&table, &["xg"]).unwrap();
        assert_eq!(out.records()[0].stat("xg_per90"), None);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let table = StatTable::new(vec![
            player("a", Some(270.0), 4.0),
            player("b", Some(0.0), 1.0),
        ]);
        let once = normalize_per_90(&table, DEFAULT_PER90_COLUMNS).unwrap();
        let twice = normalize_per_90(&once, DEFAULT_PER90_COLUMNS).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_empty_table() {
        let out = normalize_per_90(&StatTable::default(), &["goals"]).unwrap();
        assert!(out.is_empty());
    }
}
