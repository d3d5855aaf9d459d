//! Percentile ranking for radar-style comparisons.

use crate::processing::StatTable;
use crate::storage::StatRecord;
use serde::Serialize;
use std::collections::HashMap;


/// Statistics plotted on the comparison radar.
pub const DEFAULT_RADAR_STATS: &[&str] = &[
    "goals_per90",
    "assists_per90",
    "xg_per90",
    "xag_per90",
    "pass_completion_rate",
];

/// Fraction of `population` with a value <= `value`.
///
/// Ties share a rank, the minimum ranks `1/N` and the maximum `1.0`.
/// Returns `None` for an empty population.
pub fn percentile_rank(population: &[f64], value: f64) -> Option<f64> {
    if population.is_empty() {
        return None;
    }
    let at_or_below = population.iter().filter(|x| **x <= value).count();
    Some(at_or_below as f64 / population.len() as f64)
}

/// One axis of a radar profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarPoint {
    pub stat: String,
    pub value: f64,
    pub percentile: f64,
}

/// Immutable snapshot of a population, sorted per statistic.
#[derive(Debug, Clone, Default)]
pub struct PercentileFrame {
    sorted: HashMap<String, Vec<f64>>,
}

impl PercentileFrame {
    /// Snapshot `stats` from every record in `table` that carries them.
    pub fn from_table(table: &StatTable, stats: &[&str]) -> Self {
        let sorted = stats
            .iter()
            .map(|stat| {
                let mut values: Vec<f64> = table
                    .column(stat)
                    .into_iter()
                    .filter(|v| v.is_finite())
                    .collect();
                values.sort_by(f64::total_cmp);
                (stat.to_string(), values)
            })
            .collect();
        Self { sorted }
    }

    pub fn population_size(&self, stat: &str) -> usize {
        self.sorted.get(stat).map_or(0, Vec::len)
    }

    /// Rank of `value` within the population of `stat`.
    pub fn rank(&self, stat: &str, value: f64) -> Option<f64> {
        let values = self.sorted.get(stat).filter(|v| !v.is_empty())?;
        let at_or_below = values.partition_point(|x| *x <= value);
        Some(at_or_below as f64 / values.len() as f64)
    }

    /// Radar inputs for `record`; a stat the record lacks is plotted at `0.0`.
    pub fn profile(&self, record: &StatRecord, stats: &[&str]) -> Vec<RadarPoint> {
        stats
            .iter()
            .map(|stat| {
                let value = record.stat(stat).unwrap_or(0.0);
                RadarPoint {
                    stat: stat.to_string(),
                    value,
                    percentile: self.rank(stat, value).unwrap_or(0.0),
                }
            })
            .collect()
    }
}
