//! Deterministic synthetic data for demos and offline runs.

use super::StatFetcher;
use crate::cli::types::Season;
use crate::error::Result;
use crate::processing::RawRecord;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::info;

pub const MOCK_TEAMS: &[&str] = &[
    "Arsenal",
    "Man City",
    "Liverpool",
    "Aston Villa",
    "Tottenham",
    "Chelsea",
    "Newcastle",
    "Man Utd",
];
pub const PLAYERS_PER_TEAM: usize = 15;
const POSITIONS: &[&str] = &["FW", "MF", "DF", "GK"];
const MOCK_MATCHES: u32 = 20;

/// Generates the same rows for the same seed and season.
#[derive(Debug, Clone, Copy)]
pub struct MockFetcher {
    seed: u64,
}

impl Default for MockFetcher {
    fn default() -> Self {
        Self::new(42)
    }
}

impl MockFetcher {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    fn rng(&self, season: &Season, salt: u64) -> StdRng {
        StdRng::seed_from_u64(self.seed ^ (u64::from(season.start_year()) << 8) ^ salt)
    }

    pub fn players(&self, season: &Season) -> Vec<RawRecord> {
        let mut rng = self.rng(season, 1);
        let mut players = Vec::with_capacity(MOCK_TEAMS.len() * PLAYERS_PER_TEAM);
        for team in MOCK_TEAMS {
            for _ in 0..PLAYERS_PER_TEAM {
                let row = json!({
                    "player_id": format!("{:08x}", rng.gen::<u32>()),
                    "name": format!("Player {:04x}", rng.gen::<u16>()),
                    "team": team,
                    "position": POSITIONS.choose(&mut rng).copied().unwrap_or("MF"),
                    "age": rng.gen_range(18..=35),
                    "matches_played": rng.gen_range(1..=MOCK_MATCHES),
                    "minutes_played": rng.gen_range(90..=1800),
                    "goals": rng.gen_range(0..=15),
                    "assists": rng.gen_range(0..=10),
                    "xg": round2(rng.gen_range(0.0..10.0)),
                    "xag": round2(rng.gen_range(0.0..8.0)),
                    "pass_completion_rate": round2(rng.gen_range(60.0..95.0)),
                    "progressive_carries": rng.gen_range(0..=50),
                    "progressive_passes": rng.gen_range(0..=60),
                    "tackles_won": rng.gen_range(0..=30),
                    "interceptions": rng.gen_range(0..=25),
                });
                if let serde_json::Value::Object(map) = row {
                    players.push(map);
                }
            }
        }
        players
    }

    pub fn teams(&self, season: &Season) -> Vec<RawRecord> {
        let mut rng = self.rng(season, 2);
        MOCK_TEAMS
            .iter()
            .filter_map(|team| {
                let wins = rng.gen_range(0..=MOCK_MATCHES);
                let draws = rng.gen_range(0..=MOCK_MATCHES - wins);
                let losses = MOCK_MATCHES - wins - draws;
                let row = json!({
                    "team_name": team,
                    "matches_played": MOCK_MATCHES,
                    "wins": wins,
                    "draws": draws,
                    "losses": losses,
                    "goals_for": rng.gen_range(10..=50),
                    "goals_against": rng.gen_range(10..=50),
                    "xg_for": round2(rng.gen_range(15.0..45.0)),
                    "xg_against": round2(rng.gen_range(15.0..45.0)),
                    "points": wins * 3 + draws,
                });
                match row {
                    serde_json::Value::Object(map) => Some(map),
                    _ => None,
                }
            })
            .collect()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl StatFetcher for MockFetcher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_players(&self, season: &Season) -> Result<Vec<RawRecord>> {
        let players = self.players(season);
        info!("Generated {} mock players for {}", players.len(), season);
        Ok(players)
    }

    async fn fetch_teams(&self, season: &Season) -> Result<Vec<RawRecord>> {
        Ok(self.teams(season))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::types::RecordKind;
    use crate::processing::RecordValidator;

    #[tokio::test]
    async fn test_mock_shapes() {
        let fetcher = MockFetcher::default();
        let season = Season::default();

        let players = fetcher.fetch_players(&season).await.unwrap();
        let teams = fetcher.fetch_teams(&season).await.unwrap();
        assert_eq!(players.len(), MOCK_TEAMS.len() * PLAYERS_PER_TEAM);
        assert_eq!(teams.len(), MOCK_TEAMS.len());
    }

    #[tokio::test]
    async fn test_same_seed_same_rows() {
        let season = Season::default();
        let a = MockFetcher::new(7).fetch_players(&season).await.unwrap();
        let b = MockFetcher::new(7).fetch_players(&season).await.unwrap();
        let c = MockFetcher::new(8).fetch_players(&season).await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_mock_rows_validate() {
        let season = Season::default();
        let fetcher = MockFetcher::new(3);

        let batch = RecordValidator::new(RecordKind::Player, season.clone())
            .validate_batch(&fetcher.players(&season));
        assert!(batch.skipped.is_empty());
        assert!(batch.records.iter().all(|r| r.stat("minutes_played").unwrap() >= 90.0));

        let teams = RecordValidator::new(RecordKind::Team, season.clone())
            .validate_batch(&fetcher.teams(&season));
        for team in &teams.records {
            let (w, d, l) = (
                team.stat("wins").unwrap(),
                team.stat("draws").unwrap(),
                team.stat("losses").unwrap(),
            );
            assert_eq!(w + d + l, 20.0);
            assert_eq!(team.stat("points"), Some(w * 3.0 + d));
        }
    }
}
