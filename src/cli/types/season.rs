//! Season labels for Premier League campaigns.

use crate::error::{Result, StatsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe wrapper for a season label such as `2023-24`.
///
/// The second half must be the year after the first (mod 100), so
/// `2023-25` and `2099-01` are rejected while `1999-00` is accepted.
///
/// # Examples
///
/// ```rust
/// use epl_analytics::Season;
///
/// let season: Season = "2023-24".parse().unwrap();
/// assert_eq!(season.start_year(), 2023);
/// assert_eq!(season.file_suffix(), "23_24");
/// assert_eq!(season.api_label(), "2023/24");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Season(String);

impl Season {
    pub fn new(label: &str) -> Result<Self> {
        label.parse()
    }

    /// Build a season from its starting year, e.g. 2023 → `2023-24`.
    pub fn from_start_year(year: u16) -> Self {
        Self(format!("{}-{:02}", year, (year + 1) % 100))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn start_year(&self) -> u16 {
        self.0[..4].parse().unwrap_or_default()
    }

    /// Suffix used by the processed CSV exports (`EPL_23_24.csv`).
    pub fn file_suffix(&self) -> String {
        format!("{}_{}", &self.0[2..4], &self.0[5..7])
    }

    /// Label used by the pulse API (`2023/24`).
    pub fn api_label(&self) -> String {
        self.0.replace('-', "/")
    }
}

impl Default for Season {
    fn default() -> Self {
        Self::from_start_year(2023)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Season {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().replace('/', "-");
        let invalid = || StatsError::InvalidSeason { season: s.clone() };

        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let digits = |half: &str| half.bytes().all(|b| b.is_ascii_digit());
        if start.len() != 4 || end.len() != 2 || !digits(start) || !digits(end) {
            return Err(invalid());
        }
        let start: u16 = start.parse().map_err(|_| invalid())?;
        let end: u16 = end.parse().map_err(|_| invalid())?;
        if (start + 1) % 100 != end {
            return Err(invalid());
        }
        Ok(Self(s))
    }
}

impl TryFrom<String> for Season {
    type Error = StatsError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Season> for String {
    fn from(season: Season) -> Self {
        season.0
    }
}
