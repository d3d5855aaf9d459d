//! In-memory table of records used by the analytics steps.

use super::schema::fields_for;
use crate::storage::StatRecord;

/// An ordered collection of records owned by the caller.
///
/// Normalization and derived metrics take a table and hand back a new one;
/// nothing here is cached or shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatTable {
    records: Vec<StatRecord>,
}

impl StatTable {
    pub fn new(records: Vec<StatRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[StatRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<StatRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StatRecord> {
        self.records.iter()
    }

    /// True when at least one record carries `column`.
    pub fn has_column(&self, column: &str) -> bool {
        self.records.iter().any(|r| r.stats.contains_key(column))
    }

    /// Values of `column` for the records that carry it.
    pub fn column(&self, column: &str) -> Vec<f64> {
        self.records.iter().filter_map(|r| r.stat(column)).collect()
    }

    /// Find a record by name: exact (case-insensitive) match first, then substring.
    pub fn find_by_name(&self, name: &str) -> Option<&StatRecord> {
        let needle = name.trim().to_lowercase();
        self.records
            .iter()
            .find(|r| r.name.to_lowercase() == needle)
            .or_else(|| {
                self.records
                    .iter()
                    .find(|r| r.name.to_lowercase().contains(&needle))
            })
    }

    /// Give every record a zero for each schema field it does not carry.
    ///
    /// Stored records only hold the fields their sources supplied; analytics
    /// read them through this so every column exists.
    pub fn with_schema_defaults(self) -> Self {
        self.records
            .into_iter()
            .map(|mut record| {
                for field in fields_for(record.kind) {
                    record.stats.entry(field.name.to_string()).or_insert(0.0);
                }
                record
            })
            .collect()
    }

    /// Keep only records with at least `minutes` in `minutes_played`.
    pub fn with_min_minutes(self, minutes: f64) -> Self {
        self.records
            .into_iter()
            .filter(|r| r.stat("minutes_played").unwrap_or(0.0) >= minutes)
            .collect()
    }
}

impl FromIterator<StatRecord> for StatTable {
    fn from_iter<I: IntoIterator<Item = StatRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for StatTable {
    type Item = StatRecord;
    type IntoIter = std::vec::IntoIter<StatRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
