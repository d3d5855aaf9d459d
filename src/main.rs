//! Entry point: parse CLI, resolve configuration and dispatch to command handlers.

use anyhow::Context;
use clap::Parser;
use epl_analytics::{
    analysis::DEFAULT_RADAR_STATS,
    cli::{Commands, EplCli},
    commands::{
        handle_backup, handle_clear, handle_compare, handle_fetch, handle_ingest, handle_list,
        handle_restore, CompareParams, FetchParams, IngestParams, ListParams, SyncOptions,
    },
    AppConfig, StatStore,
};
use tracing_subscriber::EnvFilter;

/// Run the CLI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let app = EplCli::parse();
    let config = AppConfig::from_env().context("Failed to resolve configuration")?;

    let default_level = if app.global.verbose {
        "debug"
    } else {
        config.log_level.as_str()
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let db_path = app.global.db.clone().unwrap_or_else(|| config.db_path.clone());
    let mut store = StatStore::open(&db_path, config.store_timeout)
        .with_context(|| format!("Failed to open store at {}", db_path.display()))?;
    let retry = config.retry_policy();
    let verbose = app.global.verbose;

    match app.command {
        Commands::Ingest {
            write,
            data_dir,
            clear,
        } => {
            handle_ingest(
                &mut store,
                IngestParams {
                    data_dir: data_dir.unwrap_or_else(|| config.data_dir.clone()),
                    seasons: write.seasons,
                    clear,
                    options: SyncOptions {
                        player_key: write.key,
                        retry,
                        ..SyncOptions::default()
                    },
                    as_json: write.json,
                    verbose,
                },
            )
            .await?;
        }

        Commands::Fetch {
            write,
            source,
            seed,
        } => {
            handle_fetch(
                &mut store,
                FetchParams {
                    source,
                    seasons: write.seasons,
                    seed,
                    http_timeout: config.http_timeout,
                    options: SyncOptions {
                        player_key: write.key,
                        retry,
                        ..SyncOptions::default()
                    },
                    as_json: write.json,
                    verbose,
                },
            )
            .await?;
        }

        Commands::List {
            kind,
            season,
            search,
            sort,
            limit,
            json,
        } => {
            handle_list(
                &store,
                ListParams {
                    kind,
                    season,
                    search,
                    sort,
                    limit,
                    as_json: json,
                },
            )?;
        }

        Commands::Compare {
            players,
            season,
            min_minutes,
            stats,
            json,
        } => {
            let stats = stats.unwrap_or_else(|| {
                DEFAULT_RADAR_STATS.iter().map(|s| s.to_string()).collect()
            });
            handle_compare(
                &store,
                CompareParams {
                    season,
                    players,
                    min_minutes,
                    stats,
                    as_json: json,
                },
            )?;
        }

        Commands::Backup { output } => {
            handle_backup(&store, &output)?;
        }

        Commands::Restore { input } => {
            handle_restore(&mut store, &input, retry)?;
        }

        Commands::Clear { season } => {
            handle_clear(&mut store, &season)?;
        }
    }

    store.close()?;
    Ok(())
}
