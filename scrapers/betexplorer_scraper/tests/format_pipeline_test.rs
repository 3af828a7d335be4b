use std::collections::BTreeSet;

use pretty_assertions::assert_eq;

use betexplorer_scraper::format::{format_all_sports, format_scraped_matches};
use betexplorer_scraper::store;
use betexplorer_scraper::types::{Match, RawMatch, Winner, INVALID_DATE};

fn raw(id: &str, teams: &str, result: &str, date: &str) -> RawMatch {
    RawMatch {
        id: id.to_string(),
        teams: teams.to_string(),
        result: result.to_string(),
        date: date.to_string(),
        odds_home: Some(1.5),
        odds_tie: None,
        odds_away: Some(2.5),
    }
}

#[test]
fn date_numbers_are_dense_and_chronological_per_tournament() {
    // intentionally interleaved and unsorted input
    let rows = vec![
        raw("b@/s/c/b-2015/", "C - D", "0:1", "10.09.2015"),
        raw("a@/s/c/a-2015/", "A - B", "1:0", "10.09.2015"),
        raw("a@/s/c/a-2015/", "B - A", "2:2", "10.09.2014"),
        raw("b@/s/c/b-2015/", "D - C", "1:1", "12.9.2015"),
        raw("a@/s/c/a-2015/", "A - B", "0:3", "10.9.2014"),
    ];

    let matches = format_scraped_matches(&rows);

    let summary: Vec<(&str, i64, &str, &str, Option<Winner>)> = matches
        .iter()
        .map(|m| {
            (
                m.id.as_str(),
                m.date_number,
                m.home.as_deref().unwrap(),
                m.away.as_deref().unwrap(),
                m.winner,
            )
        })
        .collect();

    assert_eq!(
        summary,
        vec![
            ("a@/s/c/a-2015/", 0, "B", "A", Some(Winner::Draw)),
            ("a@/s/c/a-2015/", 0, "A", "B", Some(Winner::Away)),
            ("a@/s/c/a-2015/", 1, "A", "B", Some(Winner::Home)),
            ("b@/s/c/b-2015/", 0, "C", "D", Some(Winner::Away)),
            ("b@/s/c/b-2015/", 1, "D", "C", Some(Winner::Draw)),
        ]
    );
}

#[test]
fn invalid_rows_get_the_sentinel_and_claim_no_slot() {
    let rows = vec![
        raw("t@/s/c/t-2015/", "A - B", "1:0", "day.month.year"),
        raw("t@/s/c/t-2015/", "garbled team field", "2:0", "10.09.2015"),
        raw("t@/s/c/t-2015/", "A - B", "CAN.", "11.09.2015"),
        raw("t@/s/c/t-2015/", "A - B", "", "12.09.2015"),
    ];

    let matches = format_scraped_matches(&rows);
    assert_eq!(matches.len(), 4);

    // malformed date
    assert_eq!(matches[0].date_number, INVALID_DATE);
    // malformed teams force the sentinel even though the date parsed
    assert_eq!(matches[1].date_number, INVALID_DATE);
    assert_eq!(matches[1].home, None);
    assert_eq!(matches[1].away, None);
    // cancelled match has no winner, so no slot either
    assert_eq!(matches[2].date_number, INVALID_DATE);
    assert_eq!(matches[2].winner, None);
    assert_eq!(matches[2].result, "CAN/POSTP");

    // the only usable row owns the only date number
    let valid: Vec<&Match> = matches.iter().filter(|m| m.date_number != INVALID_DATE).collect();
    assert_eq!(valid.len(), 1);
    assert_eq!(valid[0].date_number, 0);
    assert_eq!(valid[0].result, "");
    assert_eq!(valid[0].winner, Some(Winner::Home));
}

#[test]
fn valid_date_numbers_cover_zero_to_k() {
    let rows = vec![
        raw("t@/s/c/t/", "A - B", "1:0", "03.01.2014"),
        raw("t@/s/c/t/", "B - C", "0:1", "05.01.2014"),
        raw("t@/s/c/t/", "C - A", "2:2", "03.01.2014"),
        raw("t@/s/c/t/", "A - C", "1:3", "09.01.2014"),
        raw("t@/s/c/t/", "broken", "1:0", "04.01.2014"),
        raw("t@/s/c/t/", "B - A", "2:1", "28.12.2013"),
    ];

    let matches = format_scraped_matches(&rows);

    let numbers: BTreeSet<i64> = matches
        .iter()
        .map(|m| m.date_number)
        .filter(|&n| n != INVALID_DATE)
        .collect();
    let distinct_valid_dates = 4; // 28.12.2013, 03.01, 05.01, 09.01

    assert_eq!(numbers, (0..distinct_valid_dates).collect::<BTreeSet<i64>>());
}

#[test]
fn empty_batch_is_a_noop() {
    assert_eq!(format_scraped_matches(&[]), Vec::<Match>::new());
}

#[test]
fn format_all_sports_round_trips_through_csv() {
    let dir = tempfile::tempdir().unwrap();
    let scrape_dir = dir.path().join("scrape");
    let format_dir = dir.path().join("format");
    std::fs::create_dir_all(&scrape_dir).unwrap();

    let rows = vec![
        raw("t@/soccer/c/t-2015/", "A - B", "1:0", "10.09.2015"),
        raw("t@/soccer/c/t-2015/", "B - A", "0:2 ET", "12.09.2015"),
        raw("t@/soccer/c/t-2015/", "A - B", "POSTP.", "13.09.2015"),
    ];
    store::write_raw_table(&store::sport_file(&scrape_dir, "soccer"), &rows).unwrap();

    let sports = vec!["soccer".to_string(), "tennis".to_string()];
    format_all_sports(&sports, &scrape_dir, &format_dir).unwrap();

    let written = store::read_match_table(&store::sport_file(&format_dir, "soccer")).unwrap();
    assert_eq!(written, format_scraped_matches(&rows));

    // sports without a scraped file are skipped, not failed
    assert!(!store::sport_file(&format_dir, "tennis").exists());
}
