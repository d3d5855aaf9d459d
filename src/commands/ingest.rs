//! CSV season ingest command implementation

use std::path::PathBuf;

use crate::{
    cli::types::Season, ingest::SourceReport, source::CsvSource, storage::StatStore, Result,
};
use tracing::info;

use super::common::{print_reports, sync_season, SyncOptions};

/// Parameters for [`handle_ingest`].
#[derive(Debug, Clone)]
pub struct IngestParams {
    pub data_dir: PathBuf,
    pub seasons: Vec<Season>,
    /// Delete each season's stored records before ingesting it.
    pub clear: bool,
    pub options: SyncOptions,
    pub as_json: bool,
    pub verbose: bool,
}

/// Ingest `TEAM_*.csv` and `EPL_*.csv` for each requested season.
///
/// A missing file only fails its own source; the other file of the season and
/// the remaining seasons are still ingested.
pub async fn handle_ingest(
    store: &mut StatStore,
    params: IngestParams,
) -> Result<Vec<SourceReport>> {
    let source = CsvSource::new(&params.data_dir);
    let mut reports = Vec::new();

    for season in &params.seasons {
        if params.clear {
            let removed = store.clear_season(season)?;
            println!("Cleared {} records for {}", removed, season);
        }
        if params.verbose {
            println!("Reading {} files from {}", season, source.data_dir().display());
        }
        reports.extend(sync_season(store, &source, season, &params.options).await?);
    }

    info!("CSV ingest finished for {} seasons", params.seasons.len());
    print_reports(&reports, params.as_json, params.verbose)?;
    Ok(reports)
}
