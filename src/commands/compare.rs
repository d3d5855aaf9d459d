//! Percentile radar comparison of one or two players

use serde::Serialize;

use crate::{
    analysis::{with_derived_metrics, PercentileFrame, RadarPoint},
    cli::types::{RecordKind, Season},
    error::StatsError,
    processing::{normalize_per_90, StatTable, DEFAULT_PER90_COLUMNS},
    storage::{ListQuery, StatStore},
    Result,
};

use super::list::format_stat;

/// Parameters for [`handle_compare`].
#[derive(Debug, Clone)]
pub struct CompareParams {
    pub season: Season,
    /// One or two player names (exact match first, then substring).
    pub players: Vec<String>,
    /// Population filter: players below this many minutes are not ranked against.
    pub min_minutes: f64,
    pub stats: Vec<String>,
    pub as_json: bool,
}

/// Radar profile of one player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerProfile {
    pub id: String,
    pub name: String,
    pub team: String,
    pub clinicality: f64,
    pub population: usize,
    pub points: Vec<RadarPoint>,
}

/// Build percentile profiles for the requested players.
pub fn handle_compare(store: &StatStore, params: CompareParams) -> Result<Vec<PlayerProfile>> {
    if params.players.is_empty() || params.players.len() > 2 {
        return Err(StatsError::configuration("compare takes one or two players"));
    }

    let stored: StatTable = store
        .list(&ListQuery::new(RecordKind::Player, params.season.clone()))?
        .into_iter()
        .collect::<StatTable>()
        .with_schema_defaults();
    let table = with_derived_metrics(&normalize_per_90(&stored, DEFAULT_PER90_COLUMNS)?);
    let population = table.clone().with_min_minutes(params.min_minutes);

    let stats: Vec<&str> = params.stats.iter().map(String::as_str).collect();
    let frame = PercentileFrame::from_table(&population, &stats);

    let mut profiles = Vec::with_capacity(params.players.len());
    for name in &params.players {
        let record = table.find_by_name(name).ok_or_else(|| {
            StatsError::configuration(format!(
                "no player matching '{}' in {}",
                name, params.season
            ))
        })?;
        profiles.push(PlayerProfile {
            id: record.id.clone(),
            name: record.name.clone(),
            team: record.team.clone(),
            clinicality: record.stat("clinicality").unwrap_or(0.0),
            population: population.len(),
            points: frame.profile(record, &stats),
        });
    }

    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
    } else {
        print_profiles(&profiles, &params.season);
    }
    Ok(profiles)
}

fn print_profiles(profiles: &[PlayerProfile], season: &Season) {
    let mut header = format!("{:<24}", "Stat");
    for profile in profiles {
        header.push_str(&format!(" {:>26}", format!("{} ({})", profile.name, profile.team)));
    }
    println!("Percentile ranks for {} (population {})", season, profiles[0].population);
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));

    for (i, point) in profiles[0].points.iter().enumerate() {
        let mut line = format!("{:<24}", point.stat);
        for profile in profiles {
            let p = &profile.points[i];
            line.push_str(&format!(
                " {:>26}",
                format!("{} / {:.0}%", format_stat(p.value), p.percentile * 100.0)
            ));
        }
        println!("{}", line);
    }

    let mut line = format!("{:<24}", "clinicality");
    for profile in profiles {
        line.push_str(&format!(" {:>26}", format!("{:+.2}", profile.clinicality)));
    }
    println!("{}", line);
}
