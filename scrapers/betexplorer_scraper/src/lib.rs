//! Scrapes tournament matches and odds from betexplorer.com and turns them
//! into per-sport CSV tables ready for analysis.
//!
//! The pipeline has three stages, each reading the previous stage's files:
//!
//! 1. `scrape`: discover tournament paths, resolve the desired season
//!    range per tournament, and lift raw match rows (teams, result, date,
//!    odds) from each season's results page.
//! 2. `format`: normalize raw rows into the canonical match table: parsed
//!    team names and winners, and a dense per-tournament `date_number`
//!    (first match date is 0, second is 1, ...; unusable matches get -1).
//! 3. `filter`: drop tournaments that fail data-quality predicates
//!    (match count, team count, repeated fixtures per day).
//!
//! Rows are keyed by the tournament id `"{current_name}@{season_path}"`;
//! the name is kept alongside the path because some tournaments changed
//! names between seasons.

pub mod config;
pub mod dates;
pub mod filter;
pub mod format;
pub mod parsing;
pub mod scrape;
pub mod seasons;
pub mod store;
pub mod types;
pub mod utils;
