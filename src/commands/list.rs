//! Read-only listing of stored records

use crate::{
    cli::types::{RecordKind, Season},
    storage::{ListQuery, StatRecord, StatStore},
    Result,
};

/// Parameters for [`handle_list`].
#[derive(Debug, Clone)]
pub struct ListParams {
    pub kind: RecordKind,
    pub season: Season,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub limit: Option<u32>,
    pub as_json: bool,
}

/// Columns shown in text output, after name (and team for players).
fn display_stats(kind: RecordKind) -> &'static [&'static str] {
    match kind {
        RecordKind::Player => &["minutes_played", "goals", "assists", "xg", "xag"],
        RecordKind::Team => &[
            "points",
            "wins",
            "draws",
            "losses",
            "goals_for",
            "goals_against",
            "xg_for",
        ],
    }
}

/// List a season's players or teams sorted by a ranking stat.
pub fn handle_list(store: &StatStore, params: ListParams) -> Result<Vec<StatRecord>> {
    let query = ListQuery {
        kind: params.kind,
        season: params.season.clone(),
        search: params.search.clone(),
        order_by: params.sort.clone(),
        limit: params.limit,
    };
    let records = store.list(&query)?;

    if params.as_json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(records);
    }

    if records.is_empty() {
        println!("No {} records found for {}", params.kind, params.season);
        return Ok(records);
    }

    let sort_stat = query.sort_stat();
    let mut columns: Vec<&str> = display_stats(params.kind).to_vec();
    if !columns.contains(&sort_stat) {
        columns.insert(0, sort_stat);
    }

    let mut header = format!("{:<4} {:<28}", "#", "Name");
    if params.kind == RecordKind::Player {
        header.push_str(&format!(" {:<20} {:<6}", "Team", "Pos"));
    }
    for column in &columns {
        header.push_str(&format!(" {:>14}", column));
    }
    println!("{}", header);
    println!("{}", "-".repeat(header.len()));

    for (rank, record) in records.iter().enumerate() {
        let mut line = format!("{:<4} {:<28}", rank + 1, truncate(&record.name, 28));
        if params.kind == RecordKind::Player {
            line.push_str(&format!(
                " {:<20} {:<6}",
                truncate(&record.team, 20),
                truncate(&record.position, 6)
            ));
        }
        for column in &columns {
            match record.stat(column) {
                Some(value) => line.push_str(&format!(" {:>14}", format_stat(value))),
                None => line.push_str(&format!(" {:>14}", "-")),
            }
        }
        println!("{}", line);
    }
    println!("\n✓ {} {} records for {}", records.len(), params.kind, params.season);

    Ok(records)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

/// Whole numbers without decimals, everything else with two.
pub(crate) fn format_stat(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
