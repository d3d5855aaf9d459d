//! Season CSV exports on disk.

use super::StatFetcher;
use crate::cli::types::Season;
use crate::error::{Result, StatsError};
use crate::processing::RawRecord;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads `TEAM_{yy}_{yy}.csv` and `EPL_{yy}_{yy}.csv` from one directory.
#[derive(Debug, Clone)]
pub struct CsvSource {
    data_dir: PathBuf,
}

impl CsvSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn players_path(&self, season: &Season) -> PathBuf {
        self.data_dir.join(format!("EPL_{}.csv", season.file_suffix()))
    }

    pub fn teams_path(&self, season: &Season) -> PathBuf {
        self.data_dir.join(format!("TEAM_{}.csv", season.file_suffix()))
    }
}

impl StatFetcher for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch_players(&self, season: &Season) -> Result<Vec<RawRecord>> {
        read_csv(&self.players_path(season))
    }

    async fn fetch_teams(&self, season: &Season) -> Result<Vec<RawRecord>> {
        read_csv(&self.teams_path(season))
    }
}

/// Read a headered CSV file into raw rows, one string cell per header.
///
/// A missing file is reported as [`StatsError::SourceNotFound`] so callers can
/// fail just that source.
pub fn read_csv(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.is_file() {
        return Err(StatsError::SourceNotFound {
            path: path.display().to_string(),
        });
    }

    let mut reader = ::csv::ReaderBuilder::new()
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: RawRecord = headers
            .iter()
            .zip(record.iter())
            .filter(|(header, _)| !header.is_empty())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();
        rows.push(row);
    }
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}
