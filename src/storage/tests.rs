//! Unit tests for storage functionality

use super::*;
use crate::cli::types::{MergePolicy, RecordKind, Season};

fn season() -> Season {
    Season::new("2023-24").unwrap()
}

fn create_test_store() -> StatStore {
    StatStore::open_in_memory().unwrap()
}

fn player_key(id: &str) -> RecordKey {
    RecordKey {
        kind: RecordKind::Player,
        season: season(),
        key: id.to_string(),
    }
}

fn test_player(id: &str, goals: f64) -> StatRecord {
    StatRecord::new(RecordKind::Player, id, season())
        .with_name("Test Player")
        .with_team("Test FC")
        .with_stat("goals", goals)
        .with_stat("minutes_played", 900.0)
}

#[test]
fn test_store_creation() {
    let store = create_test_store();
    assert_eq!(store.count(RecordKind::Player, &season()).unwrap(), 0);
}

#[test]
fn test_upsert_one_creates_then_updates() {
    let mut store = create_test_store();
    let key = player_key("p1");

    let status = store
        .upsert_one(&key, &test_player("p1", 10.0), MergePolicy::Merge)
        .unwrap();
    assert_eq!(status, UpsertStatus::Created);

    let status = store
        .upsert_one(&key, &test_player("p1", 12.0), MergePolicy::Merge)
        .unwrap();
    assert_eq!(status, UpsertStatus::Updated);

    let stored = store.find_one(&key).unwrap().into_option().unwrap();
    assert_eq!(stored.stat("goals"), Some(12.0));
    assert_eq!(store.count(RecordKind::Player, &season()).unwrap(), 1);
}

#[test]
fn test_find_one_not_found() {
    let store = create_test_store();
    assert_eq!(store.find_one(&player_key("missing")).unwrap(), Lookup::NotFound);
}

#[test]
fn test_merge_keeps_absent_stats_and_names() {
    let mut store = create_test_store();
    let key = player_key("p1");
    let original = test_player("p1", 10.0).with_stat("assists", 4.0);
    store.upsert_one(&key, &original, MergePolicy::Merge).unwrap();

    // Patch only goals, with no name supplied
    let patch = StatRecord::new(RecordKind::Player, "p1", season()).with_stat("goals", 11.0);
    store.upsert_one(&key, &patch, MergePolicy::Merge).unwrap();

    let stored = store.find_one(&key).unwrap().into_option().unwrap();
    assert_eq!(stored.stat("goals"), Some(11.0));
    assert_eq!(stored.stat("assists"), Some(4.0));
    assert_eq!(stored.stat("minutes_played"), Some(900.0));
    assert_eq!(stored.name, "Test Player");
    assert_eq!(stored.team, "Test FC");
}

#[test]
fn test_replace_drops_absent_stats() {
    let mut store = create_test_store();
    let key = player_key("p1");
    store
        .upsert_one(&key, &test_player("p1", 10.0).with_stat("assists", 4.0), MergePolicy::Merge)
        .unwrap();

    let replacement = StatRecord::new(RecordKind::Player, "p1", season())
        .with_name("Renamed")
        .with_stat("goals", 3.0);
    store
        .upsert_one(&key, &replacement, MergePolicy::Replace)
        .unwrap();

    let stored = store.find_one(&key).unwrap().into_option().unwrap();
    assert_eq!(stored.stat("goals"), Some(3.0));
    assert_eq!(stored.stat("assists"), None);
    assert_eq!(stored.name, "Renamed");
    assert_eq!(stored.team, "");
}

#[test]
fn test_bulk_upsert_counts() {
    let mut store = create_test_store();
    let items: Vec<(RecordKey, StatRecord)> = ["a", "b", "c"]
        .iter()
        .map(|id| (player_key(id), test_player(id, 1.0)))
        .collect();

    let first = store.bulk_upsert(&items, MergePolicy::Merge).unwrap();
    assert_eq!(first.created, 3);
    assert_eq!(first.updated, 0);
    assert!(first.failed.is_empty());

    let second = store.bulk_upsert(&items, MergePolicy::Merge).unwrap();
    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 3);
}

#[test]
fn test_bulk_upsert_skips_rejected_record() {
    let mut store = create_test_store();
    // NaN binds as NULL and violates the NOT NULL constraint on value
    let items = vec![
        (player_key("ok1"), test_player("ok1", 1.0)),
        (player_key("bad"), test_player("bad", f64::NAN)),
        (player_key("ok2"), test_player("ok2", 2.0)),
    ];

    let outcome = store.bulk_upsert(&items, MergePolicy::Merge).unwrap();
    assert_eq!(outcome.created, 2);
    assert_eq!(outcome.failed.len(), 1);
    assert!(outcome.failed[0].identity.contains("bad"));

    assert_eq!(store.find_one(&player_key("bad")).unwrap(), Lookup::NotFound);
    assert!(store.find_one(&player_key("ok2")).unwrap().into_option().is_some());
}

#[test]
fn test_same_id_in_two_seasons() {
    let mut store = create_test_store();
    let other_season = Season::new("2022-23").unwrap();
    store
        .upsert_one(&player_key("p1"), &test_player("p1", 10.0), MergePolicy::Merge)
        .unwrap();

    let old_key = RecordKey {
        kind: RecordKind::Player,
        season: other_season.clone(),
        key: "p1".to_string(),
    };
    let old = StatRecord::new(RecordKind::Player, "p1", other_season.clone()).with_stat("goals", 4.0);
    let status = store.upsert_one(&old_key, &old, MergePolicy::Merge).unwrap();
    assert_eq!(status, UpsertStatus::Created);

    assert_eq!(store.count(RecordKind::Player, &season()).unwrap(), 1);
    assert_eq!(store.count(RecordKind::Player, &other_season).unwrap(), 1);
}

#[test]
fn test_list_sorts_by_ranking_stat_and_searches() {
    let mut store = create_test_store();
    for (id, name, team, goals) in [
        ("p1", "Erling Haaland", "Manchester City", 27.0),
        ("p2", "Cole Palmer", "Chelsea", 22.0),
        ("p3", "Phil Foden", "Manchester City", 19.0),
    ] {
        let record = StatRecord::new(RecordKind::Player, id, season())
            .with_name(name)
            .with_team(team)
            .with_stat("goals", goals)
            .with_stat("assists", 30.0 - goals);
        store.upsert_one(&player_key(id), &record, MergePolicy::Merge).unwrap();
    }

    let all = store.list(&ListQuery::new(RecordKind::Player, season())).unwrap();
    let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2", "p3"]);

    let mut by_assists = ListQuery::new(RecordKind::Player, season());
    by_assists.order_by = Some("assists".to_string());
    let ids: Vec<String> = store
        .list(&by_assists)
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec!["p3", "p2", "p1"]);

    let mut city = ListQuery::new(RecordKind::Player, season());
    city.search = Some("manchester".to_string());
    city.limit = Some(1);
    let found = store.list(&city).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Erling Haaland");
    assert_eq!(found[0].stat("goals"), Some(27.0));
}

#[test]
fn test_clear_season_only_touches_that_season() {
    let mut store = create_test_store();
    let other_season = Season::new("2020-21").unwrap();
    store
        .upsert_one(&player_key("p1"), &test_player("p1", 1.0), MergePolicy::Merge)
        .unwrap();
    let old_key = RecordKey {
        kind: RecordKind::Player,
        season: other_season.clone(),
        key: "p1".to_string(),
    };
    store
        .upsert_one(
            &old_key,
            &StatRecord::new(RecordKind::Player, "p1", other_season.clone()),
            MergePolicy::Merge,
        )
        .unwrap();

    assert_eq!(store.clear_season(&season()).unwrap(), 1);
    assert_eq!(store.count(RecordKind::Player, &season()).unwrap(), 0);
    assert_eq!(store.count(RecordKind::Player, &other_season).unwrap(), 1);
}

#[test]
fn test_dump_returns_keys_and_stats() {
    let mut store = create_test_store();
    store
        .upsert_one(&player_key("p1"), &test_player("p1", 5.0), MergePolicy::Merge)
        .unwrap();

    let dumped = store.dump().unwrap();
    assert_eq!(dumped.len(), 1);
    assert_eq!(dumped[0].0, "p1");
    assert_eq!(dumped[0].1.stat("goals"), Some(5.0));
}
