use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::types::{Winner, DID_NOT_HAPPEN};

static RESULT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+:\d+$").unwrap());

// Some results carry suffixes like "ET"; only the first token is the score.
fn first_token(raw: &str) -> &str {
    raw.split_whitespace().next().unwrap_or("")
}

fn match_happened(result: &str) -> bool {
    let lower = result.to_lowercase();
    !lower.contains("can") && !lower.contains("postp")
}

/// Returns the result unchanged when its first token parses as
/// `"{home}:{away}"`, the [`DID_NOT_HAPPEN`] marker when the fixture was
/// cancelled or postponed, and an empty string otherwise (the match
/// presumably happened but no usable score was provided).
pub fn normalize_result(raw: &str) -> String {
    let token = first_token(raw);

    if RESULT_RE.is_match(token) {
        return raw.to_string();
    }

    if !match_happened(token) {
        warn!("match cancelled or postponed: {raw:?}");
        return DID_NOT_HAPPEN.to_string();
    }

    warn!("result is not valid: {raw:?}");
    String::new()
}

fn scores(result: &str) -> Option<(i64, i64)> {
    let (home, away) = result.split_once(':')?;
    Some((home.parse().ok()?, away.parse().ok()?))
}

/// Winner of a normalized result.
///
/// An empty result imputes a home win; this is the pipeline's long-standing
/// policy for matches that happened but whose score failed to parse. The
/// did-not-happen marker yields no winner.
pub fn winner_from_result(result: &str) -> Option<Winner> {
    if result.is_empty() {
        return Some(Winner::Home);
    }

    if result == DID_NOT_HAPPEN {
        return None;
    }

    let Some((home, away)) = scores(first_token(result)) else {
        warn!("cannot read scores from result: {result:?}");
        return None;
    };

    if home > away {
        Some(Winner::Home)
    } else if home < away {
        Some(Winner::Away)
    } else {
        Some(Winner::Draw)
    }
}

/// Splits a raw `"{home} - {away}"` field into trimmed team names. Anything
/// without exactly one `" - "` separator and two non-empty names is treated
/// as unparseable and both names are reported missing.
pub fn split_teams(raw: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = raw.trim().split(" - ").collect();

    let &[home, away] = parts.as_slice() else {
        warn!("team names are not valid: {raw:?}");
        return None;
    };

    let (home, away) = (home.trim(), away.trim());
    if home.is_empty() || away.is_empty() {
        warn!("team names are not valid: {raw:?}");
        return None;
    }

    Some((home.to_string(), away.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_result_valid() {
        assert_eq!(normalize_result("1:2"), "1:2");
        assert_eq!(normalize_result("12:23"), "12:23");
        // suffixes are kept in the stored column
        assert_eq!(normalize_result("1:2 ET"), "1:2 ET");
    }

    #[test]
    fn test_normalize_result_invalid() {
        assert_eq!(normalize_result(""), "");
        assert_eq!(normalize_result(":"), "");
        assert_eq!(normalize_result("as:ds"), "");
    }

    #[test]
    fn test_normalize_result_did_not_happen() {
        assert_eq!(normalize_result("CAN."), DID_NOT_HAPPEN);
        assert_eq!(normalize_result("POSTP."), DID_NOT_HAPPEN);
        assert_eq!(normalize_result("canc."), DID_NOT_HAPPEN);
    }

    #[test]
    fn test_winner_from_result() {
        assert_eq!(winner_from_result("12:2"), Some(Winner::Home));
        assert_eq!(winner_from_result("1:2 suffix"), Some(Winner::Away));
        assert_eq!(winner_from_result("30:30"), Some(Winner::Draw));
    }

    #[test]
    fn test_winner_imputes_home_on_empty() {
        assert_eq!(winner_from_result(""), Some(Winner::Home));
    }

    #[test]
    fn test_winner_missing_when_match_did_not_happen() {
        assert_eq!(winner_from_result(DID_NOT_HAPPEN), None);
    }

    #[test]
    fn test_split_teams() {
        assert_eq!(
            split_teams(" team1 - team2 "),
            Some(("team1".to_string(), "team2".to_string()))
        );
        assert_eq!(
            split_teams("   1   -    2   "),
            Some(("1".to_string(), "2".to_string()))
        );
        assert_eq!(
            split_teams("   Ok-2    - Away"),
            Some(("Ok-2".to_string(), "Away".to_string()))
        );
        assert_eq!(
            split_teams("   O k -    Aw ay   "),
            Some(("O k".to_string(), "Aw ay".to_string()))
        );
    }

    #[test]
    fn test_split_teams_invalid() {
        assert_eq!(split_teams(""), None);
        assert_eq!(split_teams("flaskjdf"), None);
        assert_eq!(split_teams(" - away"), None);
        assert_eq!(split_teams("a - b - c"), None);
    }
}
