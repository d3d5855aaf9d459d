//! Data models for the storage layer

use crate::cli::types::{RecordKind, Season};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Statistic name → value, ordered for stable output.
pub type StatMap = BTreeMap<String, f64>;

/// A validated player or team record for one season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRecord {
    pub kind: RecordKind,
    pub id: String,
    pub season: Season,
    pub name: String,
    /// Club name for players, empty for teams.
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub stats: StatMap,
}

impl StatRecord {
    pub fn new(kind: RecordKind, id: impl Into<String>, season: Season) -> Self {
        Self {
            kind,
            id: id.into(),
            season,
            name: String::new(),
            team: String::new(),
            position: String::new(),
            stats: StatMap::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_team(mut self, team: impl Into<String>) -> Self {
        self.team = team.into();
        self
    }

    pub fn with_stat(mut self, stat: &str, value: f64) -> Self {
        self.stats.insert(stat.to_string(), value);
        self
    }

    pub fn stat(&self, stat: &str) -> Option<f64> {
        self.stats.get(stat).copied()
    }

    /// Human-readable identity used in skip reports and logs.
    pub fn identity(&self) -> String {
        if self.name.is_empty() || self.name == self.id {
            format!("{} {} ({})", self.kind, self.id, self.season)
        } else {
            format!("{} {} '{}' ({})", self.kind, self.id, self.name, self.season)
        }
    }
}

/// Store key of a record: kind plus season-scoped key string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordKey {
    pub kind: RecordKind,
    pub season: Season,
    pub key: String,
}

/// Result of a single keyed lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Found(Box<StatRecord>),
    NotFound,
}

impl Lookup {
    pub fn into_option(self) -> Option<StatRecord> {
        match self {
            Lookup::Found(record) => Some(*record),
            Lookup::NotFound => None,
        }
    }
}

/// What a single upsert did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStatus {
    Created,
    Updated,
}

/// Aggregate outcome of a bulk upsert.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkOutcome {
    pub created: usize,
    pub updated: usize,
    pub failed: Vec<FailedRecord>,
}

/// A record the store rejected inside a bulk request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedRecord {
    pub identity: String,
    pub reason: String,
}

/// Read-only listing request.
#[derive(Debug, Clone)]
pub struct ListQuery {
    pub kind: RecordKind,
    pub season: Season,
    /// Case-insensitive substring matched against name (and team for players).
    pub search: Option<String>,
    /// Ranking stat, descending. Defaults to the kind's default sort stat.
    pub order_by: Option<String>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn new(kind: RecordKind, season: Season) -> Self {
        Self {
            kind,
            season,
            search: None,
            order_by: None,
            limit: None,
        }
    }

    pub fn sort_stat(&self) -> &str {
        self.order_by
            .as_deref()
            .unwrap_or_else(|| self.kind.default_sort_stat())
    }
}
