use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::dates;
use crate::parsing;
use crate::store;
use crate::types::{Match, RawMatch, Winner};

/// Normalizes a batch of scraped rows into the canonical match table.
///
/// Rows are grouped by tournament id (stable sort, so scrape order survives
/// within a tournament), every raw field is parsed into its validated form,
/// and dense per-tournament date numbers are assigned with invalid matches
/// pinned to the sentinel. Malformed fields are logged by the parsers and
/// degrade to missing values; they never fail the batch.
pub fn format_scraped_matches(rows: &[RawMatch]) -> Vec<Match> {
    let mut rows: Vec<RawMatch> = rows.to_vec();
    rows.sort_by(|a, b| a.id.cmp(&b.id));

    let results: Vec<String> = rows
        .iter()
        .map(|row| parsing::normalize_result(&row.result))
        .collect();
    let winners: Vec<Option<Winner>> = results
        .iter()
        .map(|result| parsing::winner_from_result(result))
        .collect();
    let teams: Vec<Option<(String, String)>> = rows
        .iter()
        .map(|row| parsing::split_teams(&row.teams))
        .collect();
    let homes: Vec<Option<String>> = teams
        .iter()
        .map(|pair| pair.as_ref().map(|(home, _)| home.clone()))
        .collect();
    let aways: Vec<Option<String>> = teams
        .iter()
        .map(|pair| pair.as_ref().map(|(_, away)| away.clone()))
        .collect();

    let calendar_ints: Vec<i64> = rows
        .iter()
        .map(|row| dates::to_calendar_int(&row.date))
        .collect();
    let marked = dates::mark_invalid_dates(&calendar_ints, &winners, &homes, &aways);

    let ids: Vec<&str> = rows.iter().map(|row| row.id.as_str()).collect();
    let date_numbers = dates::assign_date_numbers_per_tournament(&ids, &marked);

    let mut matches: Vec<Match> = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| Match {
            id: row.id,
            date_number: date_numbers[i],
            home: homes[i].clone(),
            away: aways[i].clone(),
            result: results[i].clone(),
            winner: winners[i],
            date: row.date,
            odds_home: row.odds_home,
            odds_tie: row.odds_tie,
            odds_away: row.odds_away,
        })
        .collect();

    matches.sort_by(|a, b| (a.id.as_str(), a.date_number).cmp(&(b.id.as_str(), b.date_number)));
    matches
}

/// Formats each sport's scraped table and writes the canonical one. A
/// missing input file is skipped with a warning.
pub fn format_all_sports(sports: &[String], scrape_dir: &Path, format_dir: &Path) -> Result<()> {
    fs::create_dir_all(format_dir)?;

    for sport in sports {
        let input = store::sport_file(scrape_dir, sport);
        if !input.exists() {
            warn!("no file: {}", input.display());
            continue;
        }

        let rows = store::read_raw_table(&input)?;
        let matches = format_scraped_matches(&rows);
        info!("{sport}: formatted {} matches", matches.len());

        store::write_match_table(&store::sport_file(format_dir, sport), &matches)?;
    }

    Ok(())
}
