//! Derived metrics and percentile ranking over a [`StatTable`](crate::processing::StatTable).

pub mod metrics;
pub mod percentile;

pub use metrics::{aggregate_team_xg, clinicality, goal_contribution, with_derived_metrics};
pub use percentile::{percentile_rank, PercentileFrame, RadarPoint, DEFAULT_RADAR_STATS};
