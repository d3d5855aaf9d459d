//! CLI argument definitions and parsing.

pub mod types;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use types::{RecordKind, Season, SourceKind};

use crate::ingest::UniqueKey;

/// Options shared by every command.
#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// SQLite database path (or set `EPL_DB_PATH`).
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print skipped records and progress details.
    #[clap(long, short, global = true)]
    pub verbose: bool,
}

/// Arguments shared by the commands that write to the store.
#[derive(Debug, Args)]
pub struct WriteOpts {
    /// Season label (repeatable): `-s 2022-23 -s 2023-24`.
    #[clap(long = "season", short = 's', required = true)]
    pub seasons: Vec<Season>,

    /// Player uniqueness key, comma separated; must include `season`.
    #[clap(long, default_value = "season,id", value_parser = UniqueKey::parse)]
    pub key: UniqueKey,

    /// Output the run reports as JSON.
    #[clap(long)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Ingest `TEAM_{yy}_{yy}.csv` and `EPL_{yy}_{yy}.csv` season exports.
    Ingest {
        #[clap(flatten)]
        write: WriteOpts,

        /// Directory holding the CSV files (or set `EPL_DATA_DIR`).
        #[clap(long)]
        data_dir: Option<PathBuf>,

        /// Delete each season's stored records before ingesting it.
        #[clap(long)]
        clear: bool,
    },

    /// Fetch seasons from the mock generator or the live pulse API.
    Fetch {
        #[clap(flatten)]
        write: WriteOpts,

        /// Which fetcher to use.
        #[clap(long, value_enum, default_value_t = SourceKind::default())]
        source: SourceKind,

        /// Seed for the mock fetcher.
        #[clap(long, default_value_t = 42)]
        seed: u64,
    },

    /// List stored players or teams for a season.
    List {
        /// `player` or `team`.
        #[clap(value_enum)]
        kind: RecordKind,

        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        /// Case-insensitive name (or team, for players) substring.
        #[clap(long, short = 'q')]
        search: Option<String>,

        /// Ranking stat, descending (default: goals / points).
        #[clap(long)]
        sort: Option<String>,

        #[clap(long, short)]
        limit: Option<u32>,

        /// Output results as JSON instead of a table.
        #[clap(long)]
        json: bool,
    },

    /// Percentile radar profile of one or two players.
    Compare {
        /// Player name (give twice to compare two players).
        #[clap(long = "player", short = 'p', required = true, num_args = 1)]
        players: Vec<String>,

        #[clap(long, short, default_value_t = Season::default())]
        season: Season,

        /// Only rank against players with at least this many minutes.
        #[clap(long, default_value_t = 450.0)]
        min_minutes: f64,

        /// Radar stats, comma separated (default: the per-90 attacking set).
        #[clap(long, value_delimiter = ',')]
        stats: Option<Vec<String>>,

        /// Output results as JSON instead of a table.
        #[clap(long)]
        json: bool,
    },

    /// Dump every stored record to a JSON file.
    Backup {
        #[clap(long, short)]
        output: PathBuf,
    },

    /// Re-upsert a JSON backup, replacing records stored under the same keys.
    Restore {
        #[clap(long, short)]
        input: PathBuf,
    },

    /// Delete every stored record of one season.
    Clear {
        #[clap(long, short)]
        season: Season,
    },
}

#[derive(Debug, Parser)]
#[clap(
    name = "epl-analytics",
    about = "Premier League stats ingestion and comparison CLI"
)]
pub struct EplCli {
    #[clap(flatten)]
    pub global: GlobalOpts,

    #[clap(subcommand)]
    pub command: Commands,
}
