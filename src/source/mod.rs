//! Where raw statistic rows come from.
//!
//! Every source yields untrusted [`RawRecord`]s for one season; validation
//! happens downstream. Sources are picked explicitly by the caller.

pub mod files;
pub mod mock;
pub mod pulse;

pub use files::CsvSource;
pub use mock::MockFetcher;
pub use pulse::PulseFetcher;

use crate::cli::types::{RecordKind, Season};
use crate::error::Result;
use crate::processing::RawRecord;

/// A provider of raw player and team rows for a season.
#[allow(async_fn_in_trait)]
pub trait StatFetcher {
    /// Short label used in logs and run reports.
    fn name(&self) -> &str;

    async fn fetch_players(&self, season: &Season) -> Result<Vec<RawRecord>>;

    async fn fetch_teams(&self, season: &Season) -> Result<Vec<RawRecord>>;

    async fn fetch(&self, kind: RecordKind, season: &Season) -> Result<Vec<RawRecord>> {
        match kind {
            RecordKind::Player => self.fetch_players(season).await,
            RecordKind::Team => self.fetch_teams(season).await,
        }
    }
}
