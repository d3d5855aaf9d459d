//! Secondary statistics computed from raw or normalized fields.
//!
//! Each metric reads only its own inputs, so a record lacking the inputs of
//! one metric still gets the others.

use crate::cli::types::{RecordKind, Season};
use crate::processing::StatTable;
use crate::storage::StatRecord;
use std::collections::BTreeMap;

pub const CLINICALITY: &str = "clinicality";
pub const GOAL_CONTRIBUTION: &str = "goal_contribution";

/// `goals - xg`; positive means finishing above expectation.
///
/// `0.0` when either input is missing.
pub fn clinicality(record: &StatRecord) -> f64 {
    match (record.stat("goals"), record.stat("xg")) {
        (Some(goals), Some(xg)) => goals - xg,
        _ => 0.0,
    }
}

/// `goals + assists`, or `None` when either input is missing.
pub fn goal_contribution(record: &StatRecord) -> Option<f64> {
    Some(record.stat("goals")? + record.stat("assists")?)
}

/// Copy of `table` with every derived metric whose inputs exist.
pub fn with_derived_metrics(table: &StatTable) -> StatTable {
    table
        .iter()
        .map(|record| {
            let mut out = record.clone();
            out.stats.insert(CLINICALITY.to_string(), clinicality(record));
            if let Some(contribution) = goal_contribution(record) {
                out.stats.insert(GOAL_CONTRIBUTION.to_string(), contribution);
            }
            out
        })
        .collect()
}

/// Team `xg_for` summed from player-level `xg`.
///
/// Returns one team record per club carrying only `xg_for`, rounded to two
/// decimals, ready to be merged onto the stored team rows. Players without a
/// team are ignored.
pub fn aggregate_team_xg(players: &[StatRecord]) -> Vec<StatRecord> {
    let mut totals: BTreeMap<(&str, &Season), f64> = BTreeMap::new();
    for player in players.iter().filter(|p| p.kind == RecordKind::Player) {
        if player.team.is_empty() {
            continue;
        }
        *totals.entry((player.team.as_str(), &player.season)).or_default() +=
            player.stat("xg").unwrap_or(0.0);
    }

    totals
        .into_iter()
        .map(|((team, season), xg)| {
            StatRecord::new(RecordKind::Team, team, season.clone())
                .with_name(team)
                .with_stat("xg_for", (xg * 100.0).round() / 100.0)
        })
        .collect()
}
