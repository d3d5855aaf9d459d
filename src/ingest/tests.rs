//! Unit tests for the ingest pipeline

use super::*;
use crate::analysis::with_derived_metrics;
use crate::processing::{normalize_per_90, StatTable};
use crate::storage::Lookup;
use serde_json::json;

fn raw(value: serde_json::Value) -> RawRecord {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("test rows must be objects"),
    }
}

fn season() -> Season {
    Season::new("2023-24").unwrap()
}

fn player_key() -> UniqueKey {
    UniqueKey::default_for(RecordKind::Player)
}

fn p1_batch() -> Vec<RawRecord> {
    vec![raw(json!({
        "id": "p1",
        "season": "2023-24",
        "goals": 10,
        "xg": 8.0,
        "minutes_played": 900
    }))]
}

#[test]
fn test_unique_key_parsing() {
    let key = UniqueKey::parse("season, id").unwrap();
    assert_eq!(key.fields(), &[KeyField::Season, KeyField::Id]);
    assert_eq!(key.to_string(), "(season, id)");

    let key = UniqueKey::new(&["team", "name", "season"]).unwrap();
    assert_eq!(key.fields().len(), 3);
}

#[test]
fn test_unique_key_rejects_bad_fields() {
    for bad in ["id", "season,age", "season", "season,id,id", ""] {
        let err = UniqueKey::parse(bad).unwrap_err();
        assert!(err.is_fatal(), "'{bad}' should be a configuration error");
    }
}

#[test]
fn test_resolve_composite_key() {
    let record = StatRecord::new(RecordKind::Player, "p1", season())
        .with_name("Declan Rice")
        .with_team("Arsenal");
    let key = UniqueKey::parse("season,team,name").unwrap();

    let resolved = key.resolve(&record).unwrap();
    assert_eq!(resolved.key, "Arsenal|Declan Rice");
    assert_eq!(resolved.season, season());
    assert_eq!(resolved.kind, RecordKind::Player);

    let nameless = StatRecord::new(RecordKind::Player, "p2", season()).with_team("Arsenal");
    match key.resolve(&nameless).unwrap_err() {
        StatsError::Validation { field } => assert_eq!(field, "name"),
        other => panic!("Expected Validation error, got {other:?}"),
    }
}

#[test]
fn test_ingest_twice_is_idempotent() {
    let mut store = StatStore::open_in_memory().unwrap();
    let mut pipeline = IngestPipeline::new(&mut store, RetryPolicy::immediate(3));

    let first = pipeline
        .ingest_raw(
            "test",
            RecordKind::Player,
            &season(),
            &p1_batch(),
            &player_key(),
            MergePolicy::Merge,
        )
        .unwrap();
    assert_eq!(first.validated, 1);
    assert_eq!(first.created, 1);
    assert_eq!(first.updated, 0);

    let record_key = RecordKey {
        kind: RecordKind::Player,
        season: season(),
        key: "p1".to_string(),
    };
    let after_first = store.find_one(&record_key).unwrap();

    let mut pipeline = IngestPipeline::new(&mut store, RetryPolicy::immediate(3));
    let second = pipeline
        .ingest_raw(
            "test",
            RecordKind::Player,
            &season(),
            &p1_batch(),
            &player_key(),
            MergePolicy::Merge,
        )
        .unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 1);

    assert_eq!(store.find_one(&record_key).unwrap(), after_first);
    assert_eq!(store.count(RecordKind::Player, &season()).unwrap(), 1);

    let Lookup::Found(stored) = after_first else {
        panic!("p1 should be stored");
    };
    let table = StatTable::new(vec![*stored]);
    let analysed = with_derived_metrics(&normalize_per_90(&table, &["goals"]).unwrap());
    let p1 = &analysed.records()[0];
    assert_eq!(p1.stat("goals_per90"), Some(1.0));
    assert_eq!(p1.stat("clinicality"), Some(2.0));
}

#[test]
fn test_merge_keeps_fields_missing_from_later_rows() {
    let mut store = StatStore::open_in_memory().unwrap();
    let later = vec![raw(json!({"id": "p1", "goals": 11}))];
    for rows in [p1_batch(), later] {
        IngestPipeline::new(&mut store, RetryPolicy::immediate(1))
            .ingest_raw(
                "test",
                RecordKind::Player,
                &season(),
                &rows,
                &player_key(),
                MergePolicy::Merge,
            )
            .unwrap();
    }

    let key = player_key()
        .resolve(&StatRecord::new(RecordKind::Player, "p1", season()))
        .unwrap();
    let stored = store.find_one(&key).unwrap().into_option().unwrap();
    assert_eq!(stored.stat("goals"), Some(11.0));
    assert_eq!(stored.stat("xg"), Some(8.0));
    assert_eq!(stored.stat("minutes_played"), Some(900.0));
    // Never supplied by either row
    assert_eq!(stored.stat("assists"), None);
}

#[test]
fn test_replace_drops_fields_missing_from_later_rows() {
    let mut store = StatStore::open_in_memory().unwrap();
    let later = vec![raw(json!({"id": "p1", "goals": 11}))];
    for (rows, policy) in [(p1_batch(), MergePolicy::Merge), (later, MergePolicy::Replace)] {
        IngestPipeline::new(&mut store, RetryPolicy::immediate(1))
            .ingest_raw("test", RecordKind::Player, &season(), &rows, &player_key(), policy)
            .unwrap();
    }

    let key = player_key()
        .resolve(&StatRecord::new(RecordKind::Player, "p1", season()))
        .unwrap();
    let stored = store.find_one(&key).unwrap().into_option().unwrap();
    assert_eq!(stored.stat("goals"), Some(11.0));
    assert_eq!(stored.stat("xg"), None);
}

#[test]
fn test_negative_input_stored_as_zero() {
    let mut store = StatStore::open_in_memory().unwrap();
    let rows = vec![raw(json!({"id": "p9", "xg": -1.0}))];
    IngestPipeline::new(&mut store, RetryPolicy::immediate(1))
        .ingest_raw(
            "test",
            RecordKind::Player,
            &season(),
            &rows,
            &player_key(),
            MergePolicy::Merge,
        )
        .unwrap();

    let key = player_key()
        .resolve(&StatRecord::new(RecordKind::Player, "p9", season()))
        .unwrap();
    let stored = store.find_one(&key).unwrap().into_option().unwrap();
    assert_eq!(stored.stat("xg"), Some(0.0));
}

#[test]
fn test_invalid_rows_reported_not_fatal() {
    let mut store = StatStore::open_in_memory().unwrap();
    let rows = vec![
        raw(json!({"id": "a", "goals": 1})),
        raw(json!({"goals": 2})),
        raw(json!({"id": "c", "goals": "three"})),
    ];

    let report = IngestPipeline::new(&mut store, RetryPolicy::immediate(1))
        .ingest_raw(
            "csv",
            RecordKind::Player,
            &season(),
            &rows,
            &player_key(),
            MergePolicy::Merge,
        )
        .unwrap();
    assert_eq!(report.validated, 2);
    assert_eq!(report.skipped_invalid, 1);
    assert_eq!(report.created, 2);
    assert!(report.is_ok());
    assert!(report.skipped[0].reason.contains("player_id"));
    assert!(report.to_string().starts_with("[csv] 2023-24 player:"));
}

#[test]
fn test_wrong_kind_and_empty_key_are_skipped() {
    let mut store = StatStore::open_in_memory().unwrap();
    let records = vec![
        StatRecord::new(RecordKind::Team, "Arsenal", season()).with_name("Arsenal"),
        StatRecord::new(RecordKind::Player, "p1", season()),
        StatRecord::new(RecordKind::Player, "p2", season()).with_name("Named"),
    ];
    let key = UniqueKey::parse("season,name").unwrap();

    let outcome = IngestPipeline::new(&mut store, RetryPolicy::immediate(1))
        .ingest(RecordKind::Player, &records, &key, MergePolicy::Merge)
        .unwrap();
    assert_eq!(outcome.created, 1);
    assert_eq!(outcome.skipped.len(), 2);
}

#[test]
fn test_team_records_keyed_by_name() {
    let mut store = StatStore::open_in_memory().unwrap();
    let rows = vec![raw(json!({"Team": "Arsenal", "Points": "89"}))];
    let report = IngestPipeline::new(&mut store, RetryPolicy::immediate(1))
        .ingest_raw(
            "csv",
            RecordKind::Team,
            &season(),
            &rows,
            &UniqueKey::default_for(RecordKind::Team),
            MergePolicy::Merge,
        )
        .unwrap();
    assert_eq!(report.created, 1);

    let key = RecordKey {
        kind: RecordKind::Team,
        season: season(),
        key: "Arsenal".to_string(),
    };
    let stored = store.find_one(&key).unwrap().into_option().unwrap();
    assert_eq!(stored.stat("points"), Some(89.0));
}

#[test]
fn test_empty_batch() {
    let mut store = StatStore::open_in_memory().unwrap();
    let outcome = IngestPipeline::new(&mut store, RetryPolicy::immediate(1))
        .ingest(RecordKind::Player, &[], &player_key(), MergePolicy::Merge)
        .unwrap();
    assert_eq!(outcome, IngestOutcome::default());
}
