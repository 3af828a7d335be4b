use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::thread;

use anyhow::{Context, Result};
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::ScraperSettings;
use crate::seasons::{self, SeasonBoundary};
use crate::store;
use crate::types::RawMatch;
use crate::utils;

/// Raised when configured tournament paths 404, which usually means the
/// tournaments were renamed on the site.
#[derive(Debug, Error)]
#[error("invalid tournament paths: {0:?}; tournaments may have been renamed")]
pub struct InvalidPaths(pub Vec<String>);

/// One match row as lifted from the results table, before a tournament id is
/// attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrapedRow {
    pub teams: String,
    pub result: String,
    pub date: String,
    pub odds: Vec<f64>,
}

impl ScrapedRow {
    /// Odds come positionally: two values are home/away, three are
    /// home/tie/away (sport-dependent). Any other count is unusable.
    fn into_raw_match(self, id: &str) -> RawMatch {
        let (odds_home, odds_tie, odds_away) = match self.odds.as_slice() {
            &[home, away] => (Some(home), None, Some(away)),
            &[home, tie, away] => (Some(home), Some(tie), Some(away)),
            other => {
                if !other.is_empty() {
                    warn!("unexpected odds count {} for {id}", other.len());
                }
                (None, None, None)
            }
        };

        RawMatch {
            id: id.to_string(),
            teams: self.teams,
            result: self.result,
            date: self.date,
            odds_home,
            odds_tie,
            odds_away,
        }
    }
}

pub struct Scraper {
    client: Client,
    settings: ScraperSettings,
}

impl Scraper {
    pub fn new(settings: ScraperSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&settings.user_agent)
            .timeout(settings.request_timeout)
            .build()
            .context("failed to create HTTP client")?;

        Ok(Self { client, settings })
    }

    fn retry_with_backoff<T>(&self, mut operation: impl FnMut() -> Result<T>) -> Result<T> {
        let mut attempt = 1;
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(e) => {
                    if attempt >= self.settings.max_attempts {
                        return Err(e.context("max retries exceeded"));
                    }
                    info!("retry attempt {attempt} after error: {e}");
                    let delay = rand::thread_rng()
                        .gen_range(self.settings.backoff_min..=self.settings.backoff_max);
                    thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }

    fn fetch_document(&self, url: &str) -> Result<Html> {
        let body = self.retry_with_backoff(|| {
            let response = self.client.get(url).send()?;
            if !response.status().is_success() {
                anyhow::bail!("failed to fetch {url}: HTTP {}", response.status());
            }
            Ok(response.text()?)
        })?;

        Ok(Html::parse_document(&body))
    }

    /// Tournament paths from the homepage's upcoming-events section,
    /// restricted to the configured sports.
    pub fn homepage_paths(&self, sports: &[String]) -> Result<Vec<String>> {
        let sports: BTreeSet<&str> = sports.iter().map(String::as_str).collect();
        let document = self.fetch_document(utils::HOMEPAGE)?;
        Ok(homepage_paths_from_document(&document, &sports))
    }

    /// Fails when any configured path is gone from the site.
    pub fn validate_paths(&self, paths: &[String]) -> Result<(), InvalidPaths> {
        let invalid: Vec<String> = paths
            .iter()
            .filter(|path| self.path_is_gone(path))
            .cloned()
            .collect();

        if invalid.is_empty() {
            Ok(())
        } else {
            warn!("found invalid paths: {invalid:?}");
            Err(InvalidPaths(invalid))
        }
    }

    fn path_is_gone(&self, path: &str) -> bool {
        let url = utils::homepage_url(path);
        match self.client.get(&url).send() {
            Ok(response) => response.status() == StatusCode::NOT_FOUND,
            // transient failures are not evidence the path is wrong
            Err(_) => false,
        }
    }

    /// Season paths of one tournament restricted to the desired range, via
    /// the season dropdown on its default page.
    pub fn season_paths(
        &self,
        default_path: &str,
        first: &SeasonBoundary,
        last: &SeasonBoundary,
    ) -> Result<Vec<String>> {
        let document = self.fetch_document(&utils::homepage_url(default_path))?;
        let all_seasons = seasons::season_paths_from_document(&document);
        Ok(seasons::resolve_season_range(&all_seasons, first, last))
    }

    /// All match rows of one season's results page. A season without a
    /// usable results table degrades to an empty list with a warning.
    pub fn scrape_season_matches(&self, season_path: &str) -> Result<Vec<ScrapedRow>> {
        let results_url = format!("{}results/", utils::homepage_url(season_path));
        let mut document = self.fetch_document(&results_url)?;

        // some tournaments keep the full list behind a "Main" sub-tab
        if let Some(query) = main_section_query(&document) {
            document = self.fetch_document(&format!("{results_url}{query}"))?;
        }

        match match_rows_from_document(&document) {
            Some(rows) => Ok(rows),
            None => {
                warn!("season ignored: {season_path}");
                Ok(Vec::new())
            }
        }
    }

    /// Scrapes every tournament across the desired season range, one page at
    /// a time, grouped by sport. Failures are local: a tournament or season
    /// that cannot be fetched is logged and skipped.
    pub fn scrape_tournaments(
        &self,
        paths: &[String],
        first: &SeasonBoundary,
        last: &SeasonBoundary,
    ) -> BTreeMap<String, Vec<RawMatch>> {
        let mut sport_to_matches: BTreeMap<String, Vec<RawMatch>> = BTreeMap::new();

        for path in paths {
            let (Some(sport), Some(name)) = (
                utils::sport_from_path(path),
                utils::tournament_name_from_path(path),
            ) else {
                warn!("malformed tournament path: {path:?}");
                continue;
            };

            let season_paths = match self.season_paths(path, first, last) {
                Ok(season_paths) => season_paths,
                Err(e) => {
                    warn!("skipping {path}: {e:#}");
                    continue;
                }
            };

            for season_path in &season_paths {
                // the current tournament name is kept in the id because some
                // tournaments changed names between seasons
                let id = format!("{name}@{season_path}");

                let rows = match self.scrape_season_matches(season_path) {
                    Ok(rows) => rows,
                    Err(e) => {
                        warn!("no data for {season_path}: {e:#}");
                        continue;
                    }
                };
                if rows.is_empty() {
                    continue;
                }

                info!("{id}: {} matches", rows.len());
                sport_to_matches
                    .entry(sport.to_string())
                    .or_default()
                    .extend(rows.into_iter().map(|row| row.into_raw_match(&id)));
            }
        }

        sport_to_matches
    }
}

/// Writes each sport's scraped matches to `{dir}/{sport}.csv`.
pub fn save_scraped_matches(
    sport_to_matches: &BTreeMap<String, Vec<RawMatch>>,
    dir: &Path,
) -> Result<()> {
    fs::create_dir_all(dir)?;

    for (sport, rows) in sport_to_matches {
        store::write_raw_table(&store::sport_file(dir, sport), rows)?;
    }

    Ok(())
}

/// Hyperlink paths in the homepage's upcoming-events section, filtered to
/// the desired sports.
pub fn homepage_paths_from_document(document: &Html, sports: &BTreeSet<&str>) -> Vec<String> {
    let event_selector =
        Selector::parse("section#upcoming-events a.list-events__item__title").unwrap();

    document
        .select(&event_selector)
        .filter_map(|event| event.value().attr("href"))
        .filter(|path| {
            utils::sport_from_path(path).is_some_and(|sport| sports.contains(sport))
        })
        .map(str::to_string)
        .collect()
}

// Some tournaments split results into sub-sections and only the "Main" tab
// holds the table wanted here. "&month=all" flattens tournaments that are
// further divided into month sections and is ignored by the site otherwise.
fn main_section_query(document: &Html) -> Option<String> {
    let option_selector = Selector::parse("ul.list-tabs.list-tabs--secondary a").unwrap();

    document
        .select(&option_selector)
        .find(|option| {
            option
                .text()
                .collect::<String>()
                .trim()
                .eq_ignore_ascii_case("main")
        })
        .and_then(|option| option.value().attr("href"))
        .map(|href| format!("{href}&month=all"))
}

fn has_group_stage(table: &ElementRef) -> bool {
    let header_selector = Selector::parse("th.h-text-left").unwrap();

    table.select(&header_selector).any(|header| {
        header
            .text()
            .collect::<String>()
            .to_lowercase()
            .contains("group")
    })
}

/// Match rows from a season results page, or `None` when the season has no
/// results table or is split into groups (group tables interleave rounds and
/// cannot be dated reliably).
pub fn match_rows_from_document(document: &Html) -> Option<Vec<ScrapedRow>> {
    let table_selector = Selector::parse("div#js-leagueresults-all").unwrap();
    let table = document.select(&table_selector).next()?;

    if has_group_stage(&table) {
        return None;
    }

    let row_selector = Selector::parse("tr").unwrap();
    let header_selector = Selector::parse("th").unwrap();

    let rows = table
        .select(&row_selector)
        // rows containing "th" cells are round/group headers, not matches
        .filter(|row| row.select(&header_selector).next().is_none())
        .filter_map(extract_row)
        .collect();

    Some(rows)
}

fn extract_row(row: ElementRef) -> Option<ScrapedRow> {
    let cell_selector = Selector::parse("td").unwrap();
    let cells: Vec<String> = row
        .select(&cell_selector)
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect();

    // teams and result lead the row, the date closes it
    if cells.len() < 3 {
        warn!("skipping short match row: {cells:?}");
        return None;
    }
    let teams = &cells[0];
    let result = &cells[1];
    let date = &cells[cells.len() - 1];

    let odd_selector = Selector::parse("[data-odd]").unwrap();
    let mut odds = Vec::new();
    for tag in row.select(&odd_selector) {
        let Some(raw) = tag.value().attr("data-odd") else {
            continue;
        };
        match raw.trim().parse::<f64>() {
            Ok(odd) => odds.push(odd),
            Err(_) => warn!("odd is not a number: {raw:?}"),
        }
    }

    Some(ScrapedRow {
        teams: teams.clone(),
        result: result.clone(),
        date: normalize_date(date),
        odds,
    })
}

/// Dates come as `"{day}.{month}.{year}"` with three quirks: today and
/// yesterday show up as literal words, and matches of the current year omit
/// the year entirely, leaving a trailing separator.
pub fn normalize_date(raw: &str) -> String {
    let date = raw
        .to_lowercase()
        .trim()
        .replace("today", &utils::today_string())
        .replace("yesterday", &utils::yesterday_string());

    if date.ends_with('.') {
        format!("{date}{}", utils::current_year_string())
    } else {
        date
    }
}
