//! Recognized statistic fields per record kind.
//!
//! Sources disagree on column names (FBref exports, Sofascore exports, the
//! pulse API, league tables), so each canonical field lists the header
//! aliases it is read from. Headers are compared after [`normalize_header`].

use crate::cli::types::RecordKind;

/// How a field's raw value is coerced and bounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Whole-number counting stat, >= 0.
    Count,
    /// Real-valued stat such as expected goals, >= 0.
    Decimal,
    /// Percentage, clamped into [0, 100].
    Percentage,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub aliases: &'static [&'static str],
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            kind,
            aliases,
        }
    }

    /// Coerce an already-parsed number into this field's type and bounds.
    pub fn bound(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return 0.0;
        }
        match self.kind {
            FieldKind::Count => value.trunc().max(0.0),
            FieldKind::Decimal => value.max(0.0),
            FieldKind::Percentage => value.clamp(0.0, 100.0),
        }
    }
}

use FieldKind::{Count, Decimal, Percentage};

pub const PLAYER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("age", Count, &[]),
    FieldSpec::new("matches_played", Count, &["mp", "appearances", "apps", "matches"]),
    FieldSpec::new(
        "minutes_played",
        Count,
        &["min", "mins", "minutes", "minutesplayed", "mins_played"],
    ),
    FieldSpec::new("goals", Count, &["gls"]),
    FieldSpec::new("assists", Count, &["ast", "goal_assist"]),
    FieldSpec::new("xg", Decimal, &["expectedgoals", "expected_goals"]),
    FieldSpec::new("xag", Decimal, &["xa", "expectedassists", "expected_assists"]),
    FieldSpec::new("shots", Count, &["sh", "totalshots", "total_shots", "total_scoring_att"]),
    FieldSpec::new(
        "shots_on_target",
        Count,
        &["sot", "shotsontarget", "ontarget_scoring_att"],
    ),
    FieldSpec::new("key_passes", Count, &["kp", "keypasses"]),
    FieldSpec::new("accurate_passes", Count, &["cmp", "accuratepasses", "accurate_pass"]),
    FieldSpec::new("total_passes", Count, &["att", "totalpasses", "total_pass"]),
    FieldSpec::new(
        "pass_completion_rate",
        Percentage,
        &["cmp%", "cmp_pct", "accuratepassespercentage"],
    ),
    FieldSpec::new("progressive_carries", Count, &["prgc"]),
    FieldSpec::new("progressive_passes", Count, &["prgp"]),
    FieldSpec::new("tackles", Count, &["tkl", "total_tackle"]),
    FieldSpec::new("tackles_won", Count, &["tklw", "won_tackle"]),
    FieldSpec::new("interceptions", Count, &["int", "interception"]),
    FieldSpec::new("clearances", Count, &["clr", "total_clearance"]),
    FieldSpec::new("yellow_cards", Count, &["crdy", "yellowcards", "yellow_card"]),
    FieldSpec::new("red_cards", Count, &["crdr", "redcards", "red_card"]),
    FieldSpec::new("saves", Count, &[]),
    FieldSpec::new("clean_sheets", Count, &["clean_sheet", "cleansheet"]),
];

pub const TEAM_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("rank", Count, &["rk"]),
    FieldSpec::new("matches_played", Count, &["played", "mp", "games"]),
    FieldSpec::new("wins", Count, &["won", "w"]),
    FieldSpec::new("draws", Count, &["drawn", "d"]),
    FieldSpec::new("losses", Count, &["lost", "l"]),
    FieldSpec::new("goals_for", Count, &["gf", "goals"]),
    FieldSpec::new("goals_against", Count, &["ga", "goals_conceded"]),
    FieldSpec::new("xg_for", Decimal, &["xg", "expectedgoals"]),
    FieldSpec::new("xg_against", Decimal, &["xga"]),
    FieldSpec::new("points", Count, &["pts"]),
    FieldSpec::new("clean_sheets", Count, &["clean_sheet"]),
    FieldSpec::new("possession", Percentage, &["poss"]),
];

pub const PLAYER_ID_ALIASES: &[&str] = &["player_id", "id", "playerid"];
pub const PLAYER_NAME_ALIASES: &[&str] = &["name", "player", "player_name"];
pub const TEAM_NAME_ALIASES: &[&str] = &["team_name", "team", "squad", "club"];
pub const POSITION_ALIASES: &[&str] = &["position", "pos"];

pub fn fields_for(kind: RecordKind) -> &'static [FieldSpec] {
    match kind {
        RecordKind::Player => PLAYER_FIELDS,
        RecordKind::Team => TEAM_FIELDS,
    }
}

pub fn field_spec(kind: RecordKind, name: &str) -> Option<&'static FieldSpec> {
    fields_for(kind).iter().find(|f| f.name == name)
}

/// Canonical form of a header: trimmed, lowercase, spaces and dashes as `_`.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}
