use std::collections::{BTreeSet, HashMap};

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::types::{Winner, INVALID_DATE};

static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+\.\d+$").unwrap());

/// Turns a `"{day}.{month}.{year}"` string into a sortable `YYYYMMDD`
/// integer, zero-padding day and month. Both `"15.09.2015"` and `"15.9.2015"`
/// become `20150915`. Returns [`INVALID_DATE`] when the string does not match
/// the pattern.
pub fn to_calendar_int(date: &str) -> i64 {
    if !DATE_RE.is_match(date) {
        warn!("date is not valid: {date:?}");
        return INVALID_DATE;
    }

    let Some((day, rest)) = date.split_once('.') else {
        return INVALID_DATE;
    };
    let Some((month, year)) = rest.split_once('.') else {
        return INVALID_DATE;
    };

    format!("{year}{month:0>2}{day:0>2}")
        .parse()
        .unwrap_or(INVALID_DATE)
}

/// Replaces the calendar integer of every row whose winner, home or away is
/// missing with [`INVALID_DATE`], even when the date itself parsed fine.
///
/// Such a match cannot be used, and letting its date claim a slot would leave
/// a hole in the numbering sequence.
pub fn mark_invalid_dates(
    calendar_ints: &[i64],
    winners: &[Option<Winner>],
    homes: &[Option<String>],
    aways: &[Option<String>],
) -> Vec<i64> {
    calendar_ints
        .iter()
        .zip(winners)
        .zip(homes)
        .zip(aways)
        .map(|(((&date, winner), home), away)| {
            if winner.is_some() && home.is_some() && away.is_some() {
                date
            } else {
                INVALID_DATE
            }
        })
        .collect()
}

/// Maps each distinct valid calendar integer to its zero-based chronological
/// rank and applies the mapping element-wise; [`INVALID_DATE`] maps to
/// itself. Order and duplicates are preserved:
/// `[20150910, 20140910, 20150912, 20140910]` becomes `[1, 0, 2, 0]`.
pub fn assign_date_numbers(calendar_ints: &[i64]) -> Vec<i64> {
    let distinct: BTreeSet<i64> = calendar_ints
        .iter()
        .copied()
        .filter(|&date| date != INVALID_DATE)
        .collect();

    let ranks: HashMap<i64, i64> = distinct
        .into_iter()
        .enumerate()
        .map(|(rank, date)| (date, rank as i64))
        .collect();

    calendar_ints
        .iter()
        .map(|date| {
            if *date == INVALID_DATE {
                INVALID_DATE
            } else {
                ranks[date]
            }
        })
        .collect()
}

/// Applies [`assign_date_numbers`] independently to each contiguous run of
/// equal ids, never mixing dates across tournaments. The inputs must already
/// be grouped (sorted) by id.
pub fn assign_date_numbers_per_tournament(ids: &[&str], calendar_ints: &[i64]) -> Vec<i64> {
    debug_assert_eq!(ids.len(), calendar_ints.len());

    let mut numbers = Vec::with_capacity(calendar_ints.len());
    let mut start = 0;
    while start < ids.len() {
        let mut end = start + 1;
        while end < ids.len() && ids[end] == ids[start] {
            end += 1;
        }
        numbers.extend(assign_date_numbers(&calendar_ints[start..end]));
        start = end;
    }
    numbers
}
