//! Source selection types for fetch commands.

use std::fmt;

/// Which fetcher backs a `fetch` run.
///
/// Chosen explicitly on the command line or through configuration; there is
/// no process-wide live/mock switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SourceKind {
    /// Deterministic generated data, no network
    #[default]
    Mock,
    /// Premier League pulse football API
    Live,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::Mock => "mock",
            SourceKind::Live => "live",
        };
        write!(f, "{}", s)
    }
}

/// How an upsert treats stats that are absent from the incoming record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MergePolicy {
    /// Overwrite supplied stats, leave the others untouched
    #[default]
    Merge,
    /// Overwrite supplied stats and drop the ones not supplied
    Replace,
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MergePolicy::Merge => "merge",
            MergePolicy::Replace => "replace",
        };
        write!(f, "{}", s)
    }
}
