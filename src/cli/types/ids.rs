//! Identity types for stored statistical records.

use crate::error::{Result, StatsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which entity a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Player,
    Team,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Player => "player",
            RecordKind::Team => "team",
        }
    }

    /// Ranking statistic used when the caller does not choose one.
    pub fn default_sort_stat(&self) -> &'static str {
        match self {
            RecordKind::Player => "goals",
            RecordKind::Team => "points",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "player" | "players" => Ok(RecordKind::Player),
            "team" | "teams" => Ok(RecordKind::Team),
            other => Err(StatsError::configuration(format!(
                "unknown record kind '{other}'"
            ))),
        }
    }
}

/// Build the id for a player row that carries no external id.
///
/// ```rust
/// use epl_analytics::cli::types::ids::derived_player_id;
///
/// assert_eq!(derived_player_id("Man City", "Erling Haaland"), "Man_City_Erling_Haaland");
/// ```
pub fn derived_player_id(team: &str, name: &str) -> String {
    format!("{}_{}", team.trim(), name.trim()).replace(' ', "_")
}
