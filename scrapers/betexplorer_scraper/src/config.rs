use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::filter::{
    ByNumMatches, ByNumRepeatedMatchesEachDay, ByNumTeams, InvalidMatchPolicy,
    TournamentPredicate,
};
use crate::seasons::SeasonBoundary;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read configuration {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("configuration is not valid: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the tournament paths to scrape come from. Any other mode string in
/// the configuration is rejected up front; it is a configuration error, not
/// a data-quality problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrapeMode {
    /// Discover tournaments from the homepage's upcoming-events section.
    Homepage,
    /// Use the `list` entry of the configuration.
    List,
    /// Read a `{"paths": [...]}` JSON file named by the `file` entry.
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UrlPathsConfig {
    pub mode: ScrapeMode,
    #[serde(default)]
    pub list: Vec<String>,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonRange {
    pub first: SeasonBoundary,
    pub last: SeasonBoundary,
}

fn default_invalid_matches() -> String {
    "before".to_string()
}

fn default_min_matches() -> u64 {
    50
}

fn default_min_teams() -> u64 {
    8
}

fn default_max_repeats_per_day() -> u64 {
    1
}

/// Data-quality thresholds for the filter stage. Absent maxima are
/// unbounded.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    #[serde(default = "default_invalid_matches")]
    pub invalid_matches: String,
    #[serde(default = "default_min_matches")]
    pub min_matches: u64,
    #[serde(default)]
    pub max_matches: Option<u64>,
    #[serde(default = "default_min_teams")]
    pub min_teams: u64,
    #[serde(default)]
    pub max_teams: Option<u64>,
    #[serde(default)]
    pub min_repeats_per_day: u64,
    #[serde(default = "default_max_repeats_per_day")]
    pub max_repeats_per_day: u64,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            invalid_matches: default_invalid_matches(),
            min_matches: default_min_matches(),
            max_matches: None,
            min_teams: default_min_teams(),
            max_teams: None,
            min_repeats_per_day: 0,
            max_repeats_per_day: default_max_repeats_per_day(),
        }
    }
}

impl FilterConfig {
    pub fn policy(&self) -> InvalidMatchPolicy {
        InvalidMatchPolicy::from_config(&self.invalid_matches)
    }

    pub fn predicates(&self) -> Vec<Box<dyn TournamentPredicate>> {
        vec![
            Box::new(ByNumMatches {
                min: self.min_matches,
                max: self.max_matches.unwrap_or(u64::MAX),
            }),
            Box::new(ByNumTeams {
                min: self.min_teams,
                max: self.max_teams.unwrap_or(u64::MAX),
            }),
            Box::new(ByNumRepeatedMatchesEachDay {
                min: self.min_repeats_per_day,
                max: self.max_repeats_per_day,
            }),
        ]
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

/// The JSON run configuration driving all three pipeline stages.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    pub sports: Vec<String>,
    pub url_paths: UrlPathsConfig,
    pub seasons: SeasonRange,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn scrape_dir(&self) -> PathBuf {
        self.data_dir.join("scrape")
    }

    pub fn format_dir(&self) -> PathBuf {
        self.data_dir.join("format")
    }

    pub fn filter_dir(&self) -> PathBuf {
        self.data_dir.join("filter")
    }
}

#[derive(Debug, Deserialize)]
struct PathsFile {
    paths: Vec<String>,
}

/// Reads a `{"paths": [...]}` file for the `file` scraping mode.
pub fn read_paths_file(path: &Path) -> Result<Vec<String>, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: PathsFile = serde_json::from_str(&contents)?;
    Ok(parsed.paths)
}

/// HTTP client settings, overridable from the environment like the rest of
/// the scraper deployment knobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperSettings {
    pub user_agent: String,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub backoff_min: Duration,
    pub backoff_max: Duration,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (compatible; BetexplorerScraper/0.1)".to_string(),
            request_timeout: Duration::from_secs(30),
            max_attempts: 3,
            backoff_min: Duration::from_millis(500),
            backoff_max: Duration::from_millis(3000),
        }
    }
}

impl ScraperSettings {
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(user_agent) = env::var("SCRAPER_USER_AGENT") {
            settings.user_agent = user_agent;
        }
        if let Some(timeout) = env_parse::<u64>("SCRAPER_TIMEOUT_SECS") {
            settings.request_timeout = Duration::from_secs(timeout);
        }
        if let Some(attempts) = env_parse::<u32>("SCRAPER_MAX_ATTEMPTS") {
            settings.max_attempts = attempts.max(1);
        }
        if let Some(min) = env_parse::<u64>("SCRAPER_BACKOFF_MIN_MS") {
            settings.backoff_min = Duration::from_millis(min);
        }
        if let Some(max) = env_parse::<u64>("SCRAPER_BACKOFF_MAX_MS") {
            settings.backoff_max = Duration::from_millis(max);
        }
        if settings.backoff_max < settings.backoff_min {
            settings.backoff_max = settings.backoff_min;
        }

        settings
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}
