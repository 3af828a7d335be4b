use serde::{Deserialize, Serialize};

/// Result string recorded for fixtures that were cancelled or postponed.
pub const DID_NOT_HAPPEN: &str = "CAN/POSTP";

/// Date-number sentinel for matches that cannot be used.
pub const INVALID_DATE: i64 = -1;

/// One row as scraped from a season results page, before normalization.
///
/// `id` is the tournament identifier `"{current_name}@{season_path}"`; it is
/// assigned at scrape time and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMatch {
    pub id: String,
    pub teams: String,
    pub result: String,
    pub date: String,
    pub odds_home: Option<f64>,
    pub odds_tie: Option<f64>,
    pub odds_away: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    #[serde(rename = "h")]
    Home,
    #[serde(rename = "d")]
    Draw,
    #[serde(rename = "a")]
    Away,
}

/// One row of the canonical match table.
///
/// `date_number` is a dense zero-based index over the distinct match dates of
/// one tournament, or [`INVALID_DATE`] when the match is unusable. `result`
/// keeps the raw score string (suffixes included), an empty string when the
/// score failed to parse, or [`DID_NOT_HAPPEN`]. The raw `date` string is
/// retained for traceability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub date_number: i64,
    pub home: Option<String>,
    pub away: Option<String>,
    pub result: String,
    pub winner: Option<Winner>,
    pub date: String,
    pub odds_home: Option<f64>,
    pub odds_tie: Option<f64>,
    pub odds_away: Option<f64>,
}

impl Match {
    /// A match is usable only when winner and both team names are known and
    /// its date number is not the sentinel.
    pub fn is_valid(&self) -> bool {
        self.winner.is_some()
            && self.home.is_some()
            && self.away.is_some()
            && self.date_number != INVALID_DATE
    }
}
