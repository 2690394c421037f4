//! Parsing the schedule CSV into match weeks.
//!
//! One row per fixture. Rows sharing a `Match #` form a week; weeks come out
//! in the order their match number first appears in the file.

use std::{fs::File, io, path::Path};

use chrono::NaiveDateTime;
use indexmap::{IndexMap, map::Entry};
use serde::{Deserialize, Deserializer, de};

use crate::{Error, Result};

/// Format of the `Start` and `End` columns.
pub const TIMESTAMP_FORMAT: &str = "%m/%d/%Y %H:%M:%S";

// ─── Parsed types ────────────────────────────────────────────────────────────

/// A single home/away pairing from one CSV row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureRow {
  pub home:        String,
  pub away:        String,
  /// Whether the PREMIER tier plays this fixture.
  pub has_premier: bool,
}

/// All fixtures sharing a match number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchWeek {
  pub match_number: i32,
  /// Taken from the first row with this match number.
  pub start_date:   NaiveDateTime,
  /// Taken from the first row with this match number.
  pub end_date:     NaiveDateTime,
  /// In file order.
  pub fixtures:     Vec<FixtureRow>,
}

/// One CSV record, matched to the header row by column name.
#[derive(Debug, Deserialize)]
struct ScheduleRecord {
  #[serde(rename = "Match #", deserialize_with = "trimmed_int")]
  match_number: i32,
  #[serde(rename = "Start")]
  start:        String,
  #[serde(rename = "End")]
  end:          String,
  #[serde(rename = "Home")]
  home:         String,
  #[serde(rename = "Away")]
  away:         String,
  #[serde(rename = "Has_PL")]
  has_pl:       String,
}

/// Integer cell that tolerates surrounding whitespace (` 1`, `2 `).
fn trimmed_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
  let raw = String::deserialize(deserializer)?;
  raw
    .trim()
    .parse()
    .map_err(|e| de::Error::custom(format!("invalid match number {raw:?}: {e}")))
}

// ─── Parsing ─────────────────────────────────────────────────────────────────

/// Read and group the schedule at `path`.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<MatchWeek>> {
  let file = File::open(path)?;
  parse_reader(file)
}

/// Read and group a schedule from any reader. The first line must be the
/// header row.
pub fn parse_reader<R: io::Read>(reader: R) -> Result<Vec<MatchWeek>> {
  let mut rdr = csv::ReaderBuilder::new()
    .has_headers(true)
    .from_reader(reader);

  let mut weeks: IndexMap<i32, MatchWeek> = IndexMap::new();

  for record in rdr.deserialize::<ScheduleRecord>() {
    let record = record?;

    // Only the first row of a week sets (and parses) the date range.
    let week = match weeks.entry(record.match_number) {
      Entry::Occupied(e) => e.into_mut(),
      Entry::Vacant(e) => e.insert(MatchWeek {
        match_number: record.match_number,
        start_date:   parse_timestamp(&record.start)?,
        end_date:     parse_timestamp(&record.end)?,
        fixtures:     Vec::new(),
      }),
    };

    week.fixtures.push(FixtureRow {
      has_premier: parse_premier_flag(&record.has_pl),
      home:        record.home,
      away:        record.away,
    });
  }

  Ok(weeks.into_values().collect())
}

/// Parse a `Start`/`End` cell. Single-digit months and days are accepted.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| {
    Error::InvalidTimestamp { value: value.to_owned(), source }
  })
}

/// `"TRUE"` in any case is true; every other value is false.
pub fn parse_premier_flag(value: &str) -> bool {
  value.eq_ignore_ascii_case("TRUE")
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  const HEADER: &str = "Match #,Start,End,Home,Away,Has_PL\n";

  fn parse(body: &str) -> Result<Vec<MatchWeek>> {
    parse_reader(format!("{HEADER}{body}").as_bytes())
  }

  fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
      .unwrap()
      .and_hms_opt(h, min, s)
      .unwrap()
  }

  #[test]
  fn groups_rows_by_match_number() {
    let weeks = parse(
      "1,9/1/2024 00:00:00,9/7/2024 23:59:59,Alpha,Beta,TRUE\n\
       1,9/1/2024 00:00:00,9/7/2024 23:59:59,Gamma,Delta,FALSE\n",
    )
    .unwrap();

    assert_eq!(weeks.len(), 1);
    let week = &weeks[0];
    assert_eq!(week.match_number, 1);
    assert_eq!(week.start_date, at(2024, 9, 1, 0, 0, 0));
    assert_eq!(week.end_date, at(2024, 9, 7, 23, 59, 59));
    assert_eq!(week.fixtures, vec![
      FixtureRow {
        home:        "Alpha".into(),
        away:        "Beta".into(),
        has_premier: true,
      },
      FixtureRow {
        home:        "Gamma".into(),
        away:        "Delta".into(),
        has_premier: false,
      },
    ]);
  }

  #[test]
  fn first_row_sets_the_date_range() {
    let weeks = parse(
      "1,09/01/2024 00:00:00,09/07/2024 23:59:59,Alpha,Beta,TRUE\n\
       1,09/03/2024 12:00:00,09/09/2024 23:59:59,Gamma,Delta,TRUE\n",
    )
    .unwrap();

    assert_eq!(weeks[0].start_date, at(2024, 9, 1, 0, 0, 0));
    assert_eq!(weeks[0].end_date, at(2024, 9, 7, 23, 59, 59));
    assert_eq!(weeks[0].fixtures.len(), 2);
  }

  #[test]
  fn later_rows_of_a_week_keep_their_timestamps_unread() {
    let weeks = parse(
      "1,9/1/2024 00:00:00,9/7/2024 23:59:59,Alpha,Beta,TRUE\n\
       1,garbage,garbage,Gamma,Delta,TRUE\n\
       2,9/8/2024 00:00:00,9/14/2024 23:59:59,Beta,Gamma,FALSE\n",
    )
    .unwrap();

    assert_eq!(weeks.len(), 2);
    assert_eq!(weeks[0].start_date, at(2024, 9, 1, 0, 0, 0));
    assert_eq!(weeks[0].end_date, at(2024, 9, 7, 23, 59, 59));
    assert_eq!(weeks[0].fixtures[1].home, "Gamma");
  }

  #[test]
  fn weeks_keep_first_occurrence_order() {
    let weeks = parse(
      "3,09/15/2024 00:00:00,09/21/2024 23:59:59,A,B,TRUE\n\
       1,09/01/2024 00:00:00,09/07/2024 23:59:59,C,D,TRUE\n\
       3,09/15/2024 00:00:00,09/21/2024 23:59:59,E,F,TRUE\n\
       2,09/08/2024 00:00:00,09/14/2024 23:59:59,G,H,TRUE\n",
    )
    .unwrap();

    let numbers: Vec<i32> = weeks.iter().map(|w| w.match_number).collect();
    assert_eq!(numbers, [3, 1, 2]);
    assert_eq!(weeks[0].fixtures.len(), 2);
    assert_eq!(weeks[0].fixtures[1].home, "E");
  }

  #[test]
  fn premier_flag_is_case_insensitive_true_only() {
    assert!(parse_premier_flag("TRUE"));
    assert!(parse_premier_flag("true"));
    assert!(parse_premier_flag("True"));
    assert!(!parse_premier_flag("FALSE"));
    assert!(!parse_premier_flag("yes"));
    assert!(!parse_premier_flag("1"));
    assert!(!parse_premier_flag(""));
    assert!(!parse_premier_flag(" TRUE"));
  }

  #[test]
  fn columns_are_matched_by_name() {
    let csv = "Home,Away,Has_PL,Match #,Start,End,Notes\n\
               Alpha,Beta,true,4,10/1/2024 00:00:00,10/7/2024 23:59:59,x\n";
    let weeks = parse_reader(csv.as_bytes()).unwrap();
    assert_eq!(weeks[0].match_number, 4);
    assert!(weeks[0].fixtures[0].has_premier);
  }

  #[test]
  fn malformed_timestamp_fails() {
    let err = parse("1,2024-09-01,9/7/2024 23:59:59,Alpha,Beta,TRUE\n")
      .unwrap_err();
    assert!(
      matches!(err, Error::InvalidTimestamp { ref value, .. } if value == "2024-09-01")
    );
  }

  #[test]
  fn missing_column_fails() {
    let csv = "Match #,Start,End,Home,Away\n\
               1,9/1/2024 00:00:00,9/7/2024 23:59:59,Alpha,Beta\n";
    let err = parse_reader(csv.as_bytes()).unwrap_err();
    assert!(matches!(err, Error::Csv(_)));
  }

  #[test]
  fn non_integer_match_number_fails() {
    let err = parse("one,9/1/2024 00:00:00,9/7/2024 23:59:59,Alpha,Beta,TRUE\n")
      .unwrap_err();
    assert!(matches!(err, Error::Csv(_)));
  }

  #[test]
  fn match_number_may_be_padded_but_names_are_not_trimmed() {
    let weeks = parse(
      " 1,9/1/2024 00:00:00,9/7/2024 23:59:59, Alpha,Beta ,TRUE\n\
       1 ,9/1/2024 00:00:00,9/7/2024 23:59:59,Gamma,Delta,FALSE\n",
    )
    .unwrap();

    assert_eq!(weeks.len(), 1);
    assert_eq!(weeks[0].match_number, 1);
    assert_eq!(weeks[0].fixtures.len(), 2);
    assert_eq!(weeks[0].fixtures[0].home, " Alpha");
    assert_eq!(weeks[0].fixtures[0].away, "Beta ");
  }

  #[test]
  fn empty_file_has_no_weeks() {
    assert!(parse("").unwrap().is_empty());
  }

  #[test]
  fn missing_file_is_an_io_error() {
    let err = parse_file("/nonexistent/slate/schedule.csv").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
  }
}
