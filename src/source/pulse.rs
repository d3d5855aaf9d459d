//! Live fetcher for the Premier League "pulse" football API.

use super::StatFetcher;
use crate::cli::types::Season;
use crate::core::{pulse_header_map, retry_async, RetryPolicy, PULSE_BASE_URL};
use crate::error::{Result, StatsError};
use crate::processing::RawRecord;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};


/// Competition-season ids the pulse API uses for the Premier League.
const SEASON_IDS: &[(&str, u32)] = &[
    ("2024/25", 719),
    ("2023/24", 578),
    ("2022/23", 489),
    ("2021/22", 418),
    ("2020/21", 363),
];

/// Ranked player lists used to discover players worth fetching.
pub const RANKED_METRICS: &[&str] = &["goals", "goal_assist", "appearances", "clean_sheet"];
const RANKED_PAGE_SIZE: u32 = 50;

pub fn season_id(season: &Season) -> Result<u32> {
    let label = season.api_label();
    SEASON_IDS
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, id)| *id)
        .ok_or_else(|| StatsError::configuration(format!("no pulse season id for {season}")))
}

pub struct PulseFetcher {
    client: Client,
    retry: RetryPolicy,
    base_url: String,
}

impl PulseFetcher {
    pub fn new(timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(pulse_header_map())
            .build()?;
        Ok(Self {
            client,
            retry,
            base_url: PULSE_BASE_URL.to_string(),
        })
    }

    /// GET `{base}{path}` as JSON, retrying transient failures.
    async fn get_json(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        retry_async(&self.retry, &url, || {
            let request = self.client.get(&url).query(params);
            async move {
                let value = request
                    .send()
                    .await?
                    .error_for_status()?
                    .json::<Value>()
                    .await?;
                Ok::<Value, StatsError>(value)
            }
        })
        .await
    }
}

impl StatFetcher for PulseFetcher {
    fn name(&self) -> &str {
        "pulse"
    }

    async fn fetch_teams(&self, season: &Season) -> Result<Vec<RawRecord>> {
        let comp_season = season_id(season)?.to_string();
        let listing = self
            .get_json(
                "/teams",
                &[
                    ("pageSize", "100".to_string()),
                    ("compSeasons", comp_season.clone()),
                    ("comps", "1".to_string()),
                    ("altIds", "true".to_string()),
                ],
            )
            .await?;

        let mut rows = Vec::new();
        for team in listing["content"].as_array().into_iter().flatten() {
            let Some(id) = entity_id(team) else {
                debug!("Skipping team without id: {}", team);
                continue;
            };
            let stats = self
                .get_json(&format!("/stats/team/{id}"), &[("compSeasons", comp_season.clone())])
                .await?;
            if let Some(row) = team_row(team, &stats) {
                rows.push(row);
            }
        }
        info!("Fetched {} teams from pulse for {}", rows.len(), season);
        Ok(rows)
    }

    async fn fetch_players(&self, season: &Season) -> Result<Vec<RawRecord>> {
        let comp_season = season_id(season)?.to_string();
        let mut seen = HashSet::new();
        let mut rows = Vec::new();

        for metric in RANKED_METRICS {
            let ranked = self
                .get_json(
                    &format!("/stats/ranked/players/{metric}"),
                    &[
                        ("page", "0".to_string()),
                        ("pageSize", RANKED_PAGE_SIZE.to_string()),
                        ("compSeasons", comp_season.clone()),
                        ("comps", "1".to_string()),
                        ("compCodeForFilter", "EN_PR".to_string()),
                        ("altIds", "true".to_string()),
                    ],
                )
                .await?;

            for player in ranked_players(&ranked) {
                let Some(id) = entity_id(player) else {
                    continue;
                };
                if !seen.insert(id) {
                    continue;
                }
                let stats = self
                    .get_json(
                        &format!("/stats/player/{id}"),
                        &[("compSeasons", comp_season.clone())],
                    )
                    .await?;
                rows.push(player_row(id, player, &stats));
            }
            debug!("{} unique players after '{}'", rows.len(), metric);
        }
        info!("Fetched {} players from pulse for {}", rows.len(), season);
        Ok(rows)
    }
}

/// Numeric id of a pulse entity; ids sometimes arrive as floats.
fn entity_id(entity: &Value) -> Option<u64> {
    match &entity["id"] {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f as u64)),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Player objects from a ranked list; entries carry either `player` or `owner`.
fn ranked_players(ranked: &Value) -> Vec<&Value> {
    ranked["stats"]["content"]
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|entry| {
            entry
                .get("player")
                .or_else(|| entry.get("owner"))
                .filter(|p| p.is_object())
        })
        .collect()
}

/// Copy a pulse `stats` array of `{name, value}` pairs into `row`.
fn merge_stats(row: &mut RawRecord, stats: &Value) {
    for stat in stats["stats"].as_array().into_iter().flatten() {
        if let (Some(name), Some(value)) = (stat["name"].as_str(), stat.get("value")) {
            row.insert(name.to_string(), value.clone());
        }
    }
}

fn stat_value(row: &RawRecord, name: &str) -> Option<f64> {
    row.get(name).and_then(Value::as_f64)
}

fn team_row(team: &Value, stats: &Value) -> Option<RawRecord> {
    let name = team["name"].as_str()?;
    let mut row = RawRecord::new();
    merge_stats(&mut row, stats);
    row.insert("team_name".to_string(), Value::from(name));

    if !row.contains_key("points") {
        let wins = stat_value(&row, "wins").unwrap_or(0.0);
        let draws = stat_value(&row, "draws").unwrap_or(0.0);
        row.insert("points".to_string(), Value::from(wins * 3.0 + draws));
    }
    Some(row)
}

fn player_row(id: u64, player: &Value, stats: &Value) -> RawRecord {
    let mut row = RawRecord::new();
    merge_stats(&mut row, stats);
    row.insert("player_id".to_string(), Value::from(id.to_string()));

    if let Some(name) = player["name"]["display"].as_str() {
        row.insert("name".to_string(), Value::from(name));
    }
    let team = player["currentTeam"]["name"]
        .as_str()
        .or_else(|| stats["entity"]["currentTeam"]["name"].as_str());
    if let Some(team) = team {
        row.insert("team".to_string(), Value::from(team));
    }
    if let Some(position) = player["info"]["position"].as_str().and_then(position_code) {
        row.insert("position".to_string(), Value::from(position));
    }

    if !row.contains_key("pass_completion_rate") {
        if let (Some(accurate), Some(total)) = (
            stat_value(&row, "accurate_pass"),
            stat_value(&row, "total_pass"),
        ) {
            if total > 0.0 {
                row.insert(
                    "pass_completion_rate".to_string(),
                    Value::from(accurate * 100.0 / total),
                );
            }
        }
    }
    row
}

fn position_code(code: &str) -> Option<&'static str> {
    match code {
        "F" => Some("FW"),
        "M" => Some("MF"),
        "D" => Some("DF"),
        "G" => Some("GK"),
        _ => None,
    }
}
