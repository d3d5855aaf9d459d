//! Keyed upsert, lookup and listing operations

use super::{models::*, schema::StatStore};
use crate::cli::types::{MergePolicy, RecordKind, Season};
use crate::error::{classify_db_error, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, warn};

/// Raw identity columns as read from `stat_records`.
type IdentityRow = (String, String, String, String, String, String, String);

const UPSERT_RECORD_SQL: &str = "INSERT INTO stat_records
     (kind, season, record_key, record_id, name, team, position, revision, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8)
     ON CONFLICT(kind, season, record_key) DO UPDATE SET
        record_id = excluded.record_id,
        name = CASE WHEN ?9 = 1 OR excluded.name <> '' THEN excluded.name ELSE name END,
        team = CASE WHEN ?9 = 1 OR excluded.team <> '' THEN excluded.team ELSE team END,
        position = CASE WHEN ?9 = 1 OR excluded.position <> '' THEN excluded.position ELSE position END,
        revision = revision + 1,
        updated_at = excluded.updated_at
     RETURNING revision";

const UPSERT_STAT_SQL: &str = "INSERT INTO record_stats (kind, season, record_key, stat, value)
     VALUES (?1, ?2, ?3, ?4, ?5)
     ON CONFLICT(kind, season, record_key, stat) DO UPDATE SET value = excluded.value";

fn now_secs() -> Result<i64> {
    Ok(SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() as i64)
}

/// One upsert of a record and its stats against any connection-like handle
/// (plain connection, transaction or savepoint).
///
/// Insert-or-update is decided by SQLite inside the statement; a revision of 0
/// coming back means the row was just inserted.
fn upsert_record(
    conn: &Connection,
    key: &RecordKey,
    record: &StatRecord,
    policy: MergePolicy,
    now: i64,
) -> Result<UpsertStatus> {
    let replace = policy == MergePolicy::Replace;
    let kind = key.kind.as_str();
    let season = key.season.as_str();

    let revision: i64 = conn
        .prepare_cached(UPSERT_RECORD_SQL)?
        .query_row(
            params![
                kind,
                season,
                key.key,
                record.id,
                record.name,
                record.team,
                record.position,
                now,
                replace as i32,
            ],
            |row| row.get(0),
        )
        .map_err(classify_db_error)?;

    if replace {
        conn.execute(
            "DELETE FROM record_stats WHERE kind = ?1 AND season = ?2 AND record_key = ?3",
            params![kind, season, key.key],
        )
        .map_err(classify_db_error)?;
    }

    let mut stmt = conn.prepare_cached(UPSERT_STAT_SQL)?;
    for (stat, value) in &record.stats {
        stmt.execute(params![kind, season, key.key, stat, value])
            .map_err(classify_db_error)?;
    }

    Ok(if revision == 0 {
        UpsertStatus::Created
    } else {
        UpsertStatus::Updated
    })
}

impl StatStore {
    /// Insert or update one record under `key`.
    pub fn upsert_one(
        &mut self,
        key: &RecordKey,
        record: &StatRecord,
        policy: MergePolicy,
    ) -> Result<UpsertStatus> {
        let now = now_secs()?;
        let tx = self.conn.transaction().map_err(classify_db_error)?;
        let status = upsert_record(&tx, key, record, policy, now)?;
        tx.commit().map_err(classify_db_error)?;
        Ok(status)
    }

    /// Upsert a whole batch in one transaction.
    ///
    /// A record the store rejects is rolled back to its own savepoint and
    /// reported in `failed`; the rest of the batch still commits. A transient
    /// failure (busy, locked) aborts the whole transaction so the caller can
    /// retry the batch as a unit.
    pub fn bulk_upsert(
        &mut self,
        items: &[(RecordKey, StatRecord)],
        policy: MergePolicy,
    ) -> Result<BulkOutcome> {
        let now = now_secs()?;
        let mut outcome = BulkOutcome::default();
        let mut tx = self.conn.transaction().map_err(classify_db_error)?;

        for (key, record) in items {
            let sp = tx.savepoint().map_err(classify_db_error)?;
            match upsert_record(&sp, key, record, policy, now) {
                Ok(status) => {
                    sp.commit().map_err(classify_db_error)?;
                    match status {
                        UpsertStatus::Created => outcome.created += 1,
                        UpsertStatus::Updated => outcome.updated += 1,
                    }
                }
                Err(e) if e.is_transient() => return Err(e),
                Err(e) => {
                    warn!("Skipping {}: {}", record.identity(), e);
                    outcome.failed.push(FailedRecord {
                        identity: record.identity(),
                        reason: e.to_string(),
                    });
                    // dropping the savepoint rolls this record back
                }
            }
        }

        tx.commit().map_err(classify_db_error)?;
        debug!(
            "Bulk upsert committed: {} created, {} updated, {} failed",
            outcome.created,
            outcome.updated,
            outcome.failed.len()
        );
        Ok(outcome)
    }

    /// Look up one record by key.
    pub fn find_one(&self, key: &RecordKey) -> Result<Lookup> {
        let row: Option<IdentityRow> = self
            .conn
            .query_row(
                "SELECT kind, season, record_key, record_id, name, team, position
                 FROM stat_records
                 WHERE kind = ?1 AND season = ?2 AND record_key = ?3",
                params![key.kind.as_str(), key.season.as_str(), key.key],
                identity_row,
            )
            .optional()
            .map_err(classify_db_error)?;

        let Some(row) = row else {
            return Ok(Lookup::NotFound);
        };

        let stats = self.load_stats(key)?;
        let (_, record) = row_to_record(row, stats)?;
        Ok(Lookup::Found(Box::new(record)))
    }

    /// List records of one kind and season, best first by the ranking stat.
    pub fn list(&self, query: &ListQuery) -> Result<Vec<StatRecord>> {
        let mut sql = String::from(
            "SELECT r.kind, r.season, r.record_key, r.record_id, r.name, r.team, r.position
             FROM stat_records r
             LEFT JOIN record_stats s
               ON s.kind = r.kind AND s.season = r.season
              AND s.record_key = r.record_key AND s.stat = ?
             WHERE r.kind = ? AND r.season = ?",
        );

        let mut params: Vec<Box<dyn rusqlite::ToSql>> = vec![
            Box::new(query.sort_stat().to_string()),
            Box::new(query.kind.as_str()),
            Box::new(query.season.as_str().to_string()),
        ];

        if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
            let pattern = format!("%{}%", search.trim().to_lowercase());
            push_search_clause(&mut sql, query.kind);
            params.push(Box::new(pattern.clone()));
            if query.kind == RecordKind::Player {
                params.push(Box::new(pattern));
            }
        }

        sql.push_str(" ORDER BY COALESCE(s.value, 0) DESC, r.name ASC");

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            params.push(Box::new(limit));
        }

        let rows: Vec<IdentityRow> = {
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(
                rusqlite::params_from_iter(params.iter().map(|p| p.as_ref())),
                identity_row,
            )?;
            let collected = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            collected
        };

        let mut stats_by_key = self.load_season_stats(query.kind, &query.season)?;
        rows.into_iter()
            .map(|row| {
                let stats = stats_by_key.remove(&row.2).unwrap_or_default();
                row_to_record(row, stats).map(|(_, record)| record)
            })
            .collect()
    }

    /// Every stored record with its store key, for backups.
    pub fn dump(&self) -> Result<Vec<(String, StatRecord)>> {
        let rows: Vec<IdentityRow> = {
            let mut stmt = self.conn.prepare(
                "SELECT kind, season, record_key, record_id, name, team, position
                 FROM stat_records
                 ORDER BY season, kind, record_key",
            )?;
            let rows = stmt.query_map([], identity_row)?;
            let collected = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            collected
        };

        let mut all_stats: HashMap<(String, String, String), StatMap> = HashMap::new();
        {
            let mut stmt = self
                .conn
                .prepare("SELECT kind, season, record_key, stat, value FROM record_stats")?;
            let stat_rows = stmt.query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, f64>(4)?,
                ))
            })?;
            for stat_row in stat_rows {
                let (kind, season, key, stat, value) = stat_row?;
                all_stats
                    .entry((kind, season, key))
                    .or_default()
                    .insert(stat, value);
            }
        }

        rows.into_iter()
            .map(|row| {
                let stats = all_stats
                    .remove(&(row.0.clone(), row.1.clone(), row.2.clone()))
                    .unwrap_or_default();
                row_to_record(row, stats)
            })
            .collect()
    }

    /// Number of stored records of one kind in a season.
    pub fn count(&self, kind: RecordKind, season: &Season) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM stat_records WHERE kind = ?1 AND season = ?2",
            params![kind.as_str(), season.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Delete every record of a season. Returns the number of records removed.
    pub fn clear_season(&mut self, season: &Season) -> Result<usize> {
        let tx = self.conn.transaction().map_err(classify_db_error)?;
        tx.execute(
            "DELETE FROM record_stats WHERE season = ?1",
            params![season.as_str()],
        )
        .map_err(classify_db_error)?;
        let removed = tx
            .execute(
                "DELETE FROM stat_records WHERE season = ?1",
                params![season.as_str()],
            )
            .map_err(classify_db_error)?;
        tx.commit().map_err(classify_db_error)?;
        Ok(removed)
    }

    fn load_stats(&self, key: &RecordKey) -> Result<StatMap> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT stat, value FROM record_stats
             WHERE kind = ?1 AND season = ?2 AND record_key = ?3",
        )?;
        let rows = stmt.query_map(
            params![key.kind.as_str(), key.season.as_str(), key.key],
            |row| Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?)),
        )?;

        let mut stats = StatMap::new();
        for row in rows {
            let (stat, value) = row?;
            stats.insert(stat, value);
        }
        Ok(stats)
    }

    fn load_season_stats(
        &self,
        kind: RecordKind,
        season: &Season,
    ) -> Result<HashMap<String, StatMap>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT record_key, stat, value FROM record_stats
             WHERE kind = ?1 AND season = ?2",
        )?;
        let rows = stmt.query_map(params![kind.as_str(), season.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, f64>(2)?,
            ))
        })?;

        let mut by_key: HashMap<String, StatMap> = HashMap::new();
        for row in rows {
            let (key, stat, value) = row?;
            by_key.entry(key).or_default().insert(stat, value);
        }
        Ok(by_key)
    }
}

fn push_search_clause(sql: &mut String, kind: RecordKind) {
    match kind {
        RecordKind::Player => sql.push_str(" AND (LOWER(r.name) LIKE ? OR LOWER(r.team) LIKE ?)"),
        RecordKind::Team => sql.push_str(" AND LOWER(r.name) LIKE ?"),
    }
}

fn identity_row(row: &rusqlite::Row) -> rusqlite::Result<IdentityRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn row_to_record(row: IdentityRow, stats: StatMap) -> Result<(String, StatRecord)> {
    let (kind, season, record_key, record_id, name, team, position) = row;
    Ok((
        record_key,
        StatRecord {
            kind: kind.parse()?,
            id: record_id,
            season: season.parse()?,
            name,
            team,
            position,
            stats,
        },
    ))
}
