//! Helpers shared by the commands that write to the store.

use crate::{
    analysis::aggregate_team_xg,
    cli::types::{MergePolicy, RecordKind, Season},
    core::{retry_async, RetryPolicy},
    ingest::{IngestPipeline, SourceReport, UniqueKey},
    source::StatFetcher,
    storage::{ListQuery, Lookup, StatRecord, StatStore},
    Result,
};
use tracing::{error, warn};

/// Source label used in reports for the team xG patch.
pub const XG_PATCH_SOURCE: &str = "xg-patch";

/// How a season's rows are keyed and merged.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub player_key: UniqueKey,
    pub team_key: UniqueKey,
    pub policy: MergePolicy,
    pub retry: RetryPolicy,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            player_key: UniqueKey::default_for(RecordKind::Player),
            team_key: UniqueKey::default_for(RecordKind::Team),
            policy: MergePolicy::Merge,
            retry: RetryPolicy::default(),
        }
    }
}

/// Fetch, validate and upsert one season's teams and players from `fetcher`,
/// then patch team `xg_for` from the stored players.
///
/// A failing source is reported and its siblings still run; only
/// configuration errors abort.
pub async fn sync_season<F: StatFetcher>(
    store: &mut StatStore,
    fetcher: &F,
    season: &Season,
    options: &SyncOptions,
) -> Result<Vec<SourceReport>> {
    let mut reports = Vec::new();
    let mut players_written = false;
    // Store steps retry on the tokio timer below, so each attempt is single-shot.
    let single = SyncOptions {
        retry: RetryPolicy::immediate(1),
        ..options.clone()
    };

    for kind in [RecordKind::Team, RecordKind::Player] {
        let key = match kind {
            RecordKind::Player => &options.player_key,
            RecordKind::Team => &options.team_key,
        };
        let attempt = match fetcher.fetch(kind, season).await {
            Ok(raws) => {
                store_step(&options.retry, "store ingest", || {
                    IngestPipeline::new(&mut *store, single.retry).ingest_raw(
                        fetcher.name(),
                        kind,
                        season,
                        &raws,
                        key,
                        options.policy,
                    )
                })
                .await
            }
            Err(e) => Err(e),
        };

        match attempt {
            Ok(report) => {
                if kind == RecordKind::Player {
                    players_written = report.created + report.updated > 0;
                }
                reports.push(report);
            }
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                warn!("{} {} source failed for {}: {}", fetcher.name(), kind, season, e);
                reports.push(SourceReport::failed_source(fetcher.name(), kind, season, &e));
            }
        }
    }

    if players_written {
        let patched = store_step(&options.retry, "team xG patch", || {
            patch_team_xg(&mut *store, season, &single)
        })
        .await;
        match patched {
            Ok(Some(report)) => reports.push(report),
            Ok(None) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                error!("Team xG patch failed for {}: {}", season, e);
                reports.push(SourceReport::failed_source(
                    XG_PATCH_SOURCE,
                    RecordKind::Team,
                    season,
                    &e,
                ));
            }
        }
    }

    Ok(reports)
}

/// Run a synchronous store step, retrying transient failures without
/// blocking the runtime thread between attempts.
async fn store_step<T>(
    retry: &RetryPolicy,
    what: &str,
    mut step: impl FnMut() -> Result<T>,
) -> Result<T> {
    retry_async(retry, what, || std::future::ready(step())).await
}

/// Merge `xg_for` summed from stored players onto the season's stored teams.
///
/// Teams that are not in the store are left alone; returns `None` when there
/// is nothing to patch.
pub fn patch_team_xg(
    store: &mut StatStore,
    season: &Season,
    options: &SyncOptions,
) -> Result<Option<SourceReport>> {
    let players = store.list(&ListQuery::new(RecordKind::Player, season.clone()))?;
    let mut patches: Vec<StatRecord> = Vec::new();
    for team in aggregate_team_xg(&players) {
        let key = options.team_key.resolve(&team)?;
        match store.find_one(&key)? {
            Lookup::Found(_) => patches.push(team),
            Lookup::NotFound => {
                warn!("No stored team '{}' for {}; skipping xG patch", team.id, season);
            }
        }
    }
    if patches.is_empty() {
        return Ok(None);
    }

    let outcome = IngestPipeline::new(store, options.retry).ingest(
        RecordKind::Team,
        &patches,
        &options.team_key,
        MergePolicy::Merge,
    )?;
    let mut report = SourceReport::new(XG_PATCH_SOURCE, RecordKind::Team, season);
    report.validated = patches.len();
    report.record(outcome);
    Ok(Some(report))
}

/// Print run reports as text lines or pretty JSON.
pub fn print_reports(reports: &[SourceReport], as_json: bool, verbose: bool) -> Result<()> {
    if as_json {
        println!("{}", serde_json::to_string_pretty(reports)?);
        return Ok(());
    }
    for report in reports {
        println!("{}", report);
        if verbose {
            for skipped in &report.skipped {
                println!("    skipped {}: {}", skipped.identity, skipped.reason);
            }
        }
    }
    let failed = reports.iter().filter(|r| !r.is_ok()).count();
    if failed > 0 {
        println!("✗ {} of {} sources failed", failed, reports.len());
    } else {
        println!("✓ All {} sources completed", reports.len());
    }
    Ok(())
}
