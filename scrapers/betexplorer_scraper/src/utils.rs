use chrono::{Duration, Local};

pub const HOMEPAGE: &str = "https://www.betexplorer.com/";

/// Joins a site path like `/soccer/england/premier-league/` onto the homepage
/// domain.
pub fn homepage_url(path: &str) -> String {
    format!("{}{}", HOMEPAGE.trim_end_matches('/'), path)
}

/// The sport a path is for. Paths are of the form `/sport/country/name/`.
pub fn sport_from_path(path: &str) -> Option<&str> {
    path.split('/').nth(1).filter(|sport| !sport.is_empty())
}

/// The tournament-name segment of a path, i.e. the last non-empty segment of
/// `/sport/country/name/`.
pub fn tournament_name_from_path(path: &str) -> Option<&str> {
    path.split('/')
        .rev()
        .find(|segment| !segment.is_empty())
}

pub fn today_string() -> String {
    Local::now().format("%d.%m.%Y").to_string()
}

pub fn yesterday_string() -> String {
    (Local::now() - Duration::days(1)).format("%d.%m.%Y").to_string()
}

pub fn current_year_string() -> String {
    Local::now().format("%Y").to_string()
}
