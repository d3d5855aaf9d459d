//! Fetcher-backed ingest command implementation

use std::time::Duration;

use crate::{
    cli::types::{Season, SourceKind},
    ingest::SourceReport,
    source::{MockFetcher, PulseFetcher, StatFetcher},
    storage::StatStore,
    Result,
};

use super::common::{print_reports, sync_season, SyncOptions};

/// Parameters for [`handle_fetch`].
#[derive(Debug, Clone)]
pub struct FetchParams {
    pub source: SourceKind,
    pub seasons: Vec<Season>,
    /// Seed for the mock fetcher.
    pub seed: u64,
    pub http_timeout: Duration,
    pub options: SyncOptions,
    pub as_json: bool,
    pub verbose: bool,
}

/// Pull seasons from the mock or the live fetcher and upsert them.
pub async fn handle_fetch(
    store: &mut StatStore,
    params: FetchParams,
) -> Result<Vec<SourceReport>> {
    let reports = match params.source {
        SourceKind::Mock => run(store, &MockFetcher::new(params.seed), &params).await?,
        SourceKind::Live => {
            let fetcher = PulseFetcher::new(params.http_timeout, params.options.retry)?;
            run(store, &fetcher, &params).await?
        }
    };
    print_reports(&reports, params.as_json, params.verbose)?;
    Ok(reports)
}

async fn run<F: StatFetcher>(
    store: &mut StatStore,
    fetcher: &F,
    params: &FetchParams,
) -> Result<Vec<SourceReport>> {
    let mut reports = Vec::new();
    for season in &params.seasons {
        println!("Fetching {} from {}...", season, fetcher.name());
        reports.extend(sync_season(store, fetcher, season, &params.options).await?);
    }
    Ok(reports)
}
