use scraper::{Html, Selector};
use serde::Deserialize;

/// One boundary of the desired season range, in both naming conventions.
///
/// Some tournaments label seasons with a single year ("2015"), others with a
/// year range ("2015-2016"), and which convention a tournament uses is not
/// known up front, so callers supply both forms and whichever matches the
/// site wins.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(String, String)")]
pub struct SeasonBoundary {
    pub one_year: String,
    pub two_year: String,
}

impl From<(String, String)> for SeasonBoundary {
    fn from((one_year, two_year): (String, String)) -> Self {
        Self { one_year, two_year }
    }
}

fn desired_one_year_seasons(first: &str, last: &str) -> Vec<String> {
    let (Ok(first), Ok(last)) = (first.parse::<i32>(), last.parse::<i32>()) else {
        return Vec::new();
    };

    (first..=last).map(|year| year.to_string()).collect()
}

fn desired_two_year_seasons(first: &str, last: &str) -> Vec<String> {
    let start_year = |season: &str| {
        season
            .split('-')
            .next()
            .and_then(|year| year.parse::<i32>().ok())
    };

    let (Some(first), Some(last)) = (start_year(first), start_year(last)) else {
        return Vec::new();
    };

    (first..=last)
        .map(|year| format!("{}-{}", year, year + 1))
        .collect()
}

// Scans desired seasons in the given order; for each one, takes the first
// path containing it. The order of `desired` therefore decides ties, not the
// path order.
fn find_index<'a>(
    season_paths: &[String],
    desired: impl Iterator<Item = &'a String>,
) -> Option<usize> {
    for season in desired {
        for (index, path) in season_paths.iter().enumerate() {
            if path.contains(season.as_str()) {
                return Some(index);
            }
        }
    }

    None
}

fn find_first_index(
    season_paths: &[String],
    desired_one_year: &[String],
    desired_two_year: &[String],
) -> Option<usize> {
    find_index(season_paths, desired_two_year.iter())
        .or_else(|| find_index(season_paths, desired_one_year.iter()))
}

fn find_last_index(
    season_paths: &[String],
    desired_one_year: &[String],
    desired_two_year: &[String],
) -> Option<usize> {
    find_index(season_paths, desired_two_year.iter().rev())
        .or_else(|| find_index(season_paths, desired_one_year.iter().rev()))
}

/// Computes the inclusive sub-range of a reverse-chronological season-path
/// list bounded by the desired first and last seasons.
///
/// Candidate season strings are generated in both naming conventions;
/// cross-year matches are preferred. When neither convention matches at
/// either end, the result is empty; returning nothing beats silently
/// returning a wrong range.
pub fn resolve_season_range(
    season_paths: &[String],
    first: &SeasonBoundary,
    last: &SeasonBoundary,
) -> Vec<String> {
    let one_year = desired_one_year_seasons(&first.one_year, &last.one_year);
    let two_year = desired_two_year_seasons(&first.two_year, &last.two_year);

    let first_index = find_first_index(season_paths, &one_year, &two_year);
    let last_index = find_last_index(season_paths, &one_year, &two_year);

    let (Some(first_index), Some(last_index)) = (first_index, last_index) else {
        return Vec::new();
    };

    if last_index > first_index {
        return Vec::new();
    }

    // paths are in descending chronological order, so the chronologically
    // last season sits at the lower list index
    season_paths[last_index..=first_index].to_vec()
}

// The tournament's default path carries no year suffix; its displayed season
// text (with "/" flattened to "-") is appended to form a real season path.
fn default_path_with_year(path: &str, season_text: &str) -> String {
    let trimmed = path.strip_suffix('/').unwrap_or(path);
    format!("{}-{}/", trimmed, season_text.trim().replace('/', "-"))
}

/// Extracts one season path per option from a tournament page's season
/// dropdown, newest first. Only the currently selected option is the default
/// path and needs its year appended; every other option's `value` already is
/// a full season path.
pub fn season_paths_from_document(document: &Html) -> Vec<String> {
    let menu_selector = Selector::parse("div.wrap-section__header__select").unwrap();
    let option_selector = Selector::parse("option[value]").unwrap();

    let Some(menu) = document.select(&menu_selector).next() else {
        return Vec::new();
    };

    menu.select(&option_selector)
        .map(|option| {
            let value = option.value().attr("value").unwrap_or_default();
            if option.value().attr("selected").is_some() {
                default_path_with_year(value, &option.text().collect::<String>())
            } else {
                value.to_string()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|path| path.to_string()).collect()
    }

    #[test]
    fn test_desired_one_year_seasons() {
        assert_eq!(
            desired_one_year_seasons("2015", "2018"),
            vec!["2015", "2016", "2017", "2018"]
        );
        assert_eq!(desired_one_year_seasons("1999", "2001"), vec!["1999", "2000", "2001"]);
        assert!(desired_one_year_seasons("not-a-year", "2001").is_empty());
    }

    #[test]
    fn test_desired_two_year_seasons() {
        assert_eq!(
            desired_two_year_seasons("2015-2016", "2018-2019"),
            vec!["2015-2016", "2016-2017", "2017-2018", "2018-2019"]
        );
        assert_eq!(
            desired_two_year_seasons("1999-2000", "2001-2002"),
            vec!["1999-2000", "2000-2001", "2001-2002"]
        );
    }

    #[test]
    fn test_find_index_prefers_desired_order() {
        let season_paths = paths(&[
            "/sport/country/name2-2014/",
            "/sport/country/name2-2013/",
            "/sport/country/name1-2012/",
        ]);

        let desired = vec!["2012".to_string(), "2011".to_string()];
        assert_eq!(find_index(&season_paths, desired.iter()), Some(2));

        let desired = vec!["2013".to_string(), "2014".to_string()];
        assert_eq!(find_index(&season_paths, desired.iter()), Some(1));

        let desired = vec!["2010".to_string(), "2011".to_string()];
        assert_eq!(find_index(&season_paths, desired.iter()), None);
    }

    #[test]
    fn test_resolve_season_range() {
        let season_paths = paths(&[
            "/sport/country/name-2016/",
            "/sport/country/name-2015/",
            "/sport/country/name-2014/",
            "/sport/country/name-2013/",
            "/sport/country/name-2012/",
        ]);

        let first = SeasonBoundary::from(("2013".to_string(), "2013-2014".to_string()));
        let last = SeasonBoundary::from(("2015".to_string(), "2015-2016".to_string()));

        assert_eq!(
            resolve_season_range(&season_paths, &first, &last),
            paths(&[
                "/sport/country/name-2015/",
                "/sport/country/name-2014/",
                "/sport/country/name-2013/",
            ])
        );
    }

    #[test]
    fn test_resolve_season_range_cross_year_preferred() {
        let season_paths = paths(&[
            "/sport/country/name-2015-2016/",
            "/sport/country/name-2014-2015/",
            "/sport/country/name-2013-2014/",
        ]);

        let first = SeasonBoundary::from(("2013".to_string(), "2013-2014".to_string()));
        let last = SeasonBoundary::from(("2014".to_string(), "2014-2015".to_string()));

        assert_eq!(
            resolve_season_range(&season_paths, &first, &last),
            paths(&["/sport/country/name-2014-2015/", "/sport/country/name-2013-2014/"])
        );
    }

    #[test]
    fn test_resolve_season_range_no_match_is_empty() {
        let season_paths = paths(&["/sport/country/name-2016/", "/sport/country/name-2015/"]);

        let first = SeasonBoundary::from(("2001".to_string(), "2001-2002".to_string()));
        let last = SeasonBoundary::from(("2003".to_string(), "2003-2004".to_string()));

        assert!(resolve_season_range(&season_paths, &first, &last).is_empty());
    }

    #[test]
    fn test_default_path_with_year() {
        assert_eq!(
            default_path_with_year("/sport/country/name/", "2024"),
            "/sport/country/name-2024/"
        );
        assert_eq!(
            default_path_with_year("/sport/country/name/", "2015/2016"),
            "/sport/country/name-2015-2016/"
        );
    }
}
