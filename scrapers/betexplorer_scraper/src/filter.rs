use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use anyhow::{bail, Result};
use tracing::warn;

use crate::store;
use crate::types::Match;

/// Maps the full match table to the set of tournament ids worth keeping.
/// This is the extension surface for new data-quality criteria.
pub trait TournamentPredicate {
    fn evaluate(&self, matches: &[Match]) -> BTreeSet<String>;
}

/// Whether invalid matches are dropped before predicate evaluation, after
/// it, or not at all.
///
/// The ordering is observable: with a minimum-match-count predicate, invalid
/// rows only count toward the threshold under `After`. A tournament with 70
/// rows of which 20 are invalid passes a ≥60 threshold under `After` but not
/// under `Before`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidMatchPolicy {
    #[default]
    No,
    Before,
    After,
}

impl InvalidMatchPolicy {
    /// Parses a policy string from configuration; anything unknown behaves
    /// like `"no"`.
    pub fn from_config(value: &str) -> Self {
        match value {
            "no" => Self::No,
            "before" => Self::Before,
            "after" => Self::After,
            other => {
                warn!("unknown invalid-match policy {other:?}, not filtering");
                Self::No
            }
        }
    }
}

fn sort_table(matches: &mut [Match]) {
    // stable, so scrape order survives within one (id, date_number) group
    matches.sort_by(|a, b| {
        (a.id.as_str(), a.date_number).cmp(&(b.id.as_str(), b.date_number))
    });
}

/// Drops every row whose winner, home or away is missing, or whose date
/// number is the invalid sentinel.
pub fn filter_invalid_matches(matches: &[Match]) -> Vec<Match> {
    let mut kept: Vec<Match> = matches.iter().filter(|m| m.is_valid()).cloned().collect();
    sort_table(&mut kept);
    kept
}

/// Restricts the table to tournaments kept by every predicate (set
/// intersection). At least one predicate is required.
pub fn filter_tournaments(
    matches: &[Match],
    predicates: &[Box<dyn TournamentPredicate>],
) -> Result<Vec<Match>> {
    let Some((head, rest)) = predicates.split_first() else {
        bail!("tournament filtering requires at least one predicate");
    };

    let mut keep = head.evaluate(matches);
    for predicate in rest {
        let ids = predicate.evaluate(matches);
        keep.retain(|id| ids.contains(id));
    }

    let mut kept: Vec<Match> = matches
        .iter()
        .filter(|m| keep.contains(&m.id))
        .cloned()
        .collect();
    sort_table(&mut kept);
    Ok(kept)
}

/// Applies the predicates with invalid-match filtering ordered by `policy`.
pub fn filter_matches_and_tournaments(
    matches: &[Match],
    policy: InvalidMatchPolicy,
    predicates: &[Box<dyn TournamentPredicate>],
) -> Result<Vec<Match>> {
    match policy {
        InvalidMatchPolicy::No => filter_tournaments(matches, predicates),
        InvalidMatchPolicy::Before => {
            filter_tournaments(&filter_invalid_matches(matches), predicates)
        }
        InvalidMatchPolicy::After => {
            Ok(filter_invalid_matches(&filter_tournaments(matches, predicates)?))
        }
    }
}

/// Keeps tournaments whose total row count lies in `[min, max]`.
#[derive(Debug, Clone, Copy)]
pub struct ByNumMatches {
    pub min: u64,
    pub max: u64,
}

impl TournamentPredicate for ByNumMatches {
    fn evaluate(&self, matches: &[Match]) -> BTreeSet<String> {
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for m in matches {
            *counts.entry(m.id.as_str()).or_default() += 1;
        }

        counts
            .into_iter()
            .filter(|(_, count)| (self.min..=self.max).contains(count))
            .map(|(id, _)| id.to_string())
            .collect()
    }
}

/// Keeps tournaments whose distinct team count (home ∪ away) lies in
/// `[min, max]`. Rows with an unparsed team name contribute no team.
#[derive(Debug, Clone, Copy)]
pub struct ByNumTeams {
    pub min: u64,
    pub max: u64,
}

impl TournamentPredicate for ByNumTeams {
    fn evaluate(&self, matches: &[Match]) -> BTreeSet<String> {
        let mut teams: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for m in matches {
            let entry = teams.entry(m.id.as_str()).or_default();
            if let Some(home) = &m.home {
                entry.insert(home);
            }
            if let Some(away) = &m.away {
                entry.insert(away);
            }
        }

        teams
            .into_iter()
            .filter(|(_, names)| (self.min..=self.max).contains(&(names.len() as u64)))
            .map(|(id, _)| id.to_string())
            .collect()
    }
}

/// Keeps a tournament only when, for every `(date_number, home, away)`
/// group, the number of repeats lies in `[min, max]`; one day with too many
/// or too few repeats of the same fixture disqualifies the whole tournament.
///
/// The pair is directional: `(A, B)` and `(B, A)` are distinct fixtures.
#[derive(Debug, Clone, Copy)]
pub struct ByNumRepeatedMatchesEachDay {
    pub min: u64,
    pub max: u64,
}

impl TournamentPredicate for ByNumRepeatedMatchesEachDay {
    fn evaluate(&self, matches: &[Match]) -> BTreeSet<String> {
        let mut counts: BTreeMap<(&str, i64, &str, &str), u64> = BTreeMap::new();
        for m in matches {
            let (Some(home), Some(away)) = (&m.home, &m.away) else {
                continue;
            };
            *counts
                .entry((m.id.as_str(), m.date_number, home.as_str(), away.as_str()))
                .or_default() += 1;
        }

        let mut bounds: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
        for ((id, _, _, _), count) in counts {
            bounds
                .entry(id)
                .and_modify(|(min, max)| {
                    *min = (*min).min(count);
                    *max = (*max).max(count);
                })
                .or_insert((count, count));
        }

        bounds
            .into_iter()
            .filter(|(_, (min, max))| self.min <= *min && *max <= self.max)
            .map(|(id, _)| id.to_string())
            .collect()
    }
}

/// Filters each sport's formatted table and writes the survivors. A missing
/// input file is skipped with a warning.
pub fn filter_all_sports(
    sports: &[String],
    format_dir: &Path,
    filter_dir: &Path,
    policy: InvalidMatchPolicy,
    predicates: &[Box<dyn TournamentPredicate>],
) -> Result<()> {
    fs::create_dir_all(filter_dir)?;

    for sport in sports {
        let input = store::sport_file(format_dir, sport);
        if !input.exists() {
            warn!("no file: {}", input.display());
            continue;
        }

        let matches = store::read_match_table(&input)?;
        let filtered = filter_matches_and_tournaments(&matches, policy, predicates)?;
        store::write_match_table(&store::sport_file(filter_dir, sport), &filtered)?;
    }

    Ok(())
}
