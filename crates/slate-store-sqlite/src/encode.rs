//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as `YYYY-MM-DD HH:MM:SS` text, which SQLite's own
//! date functions understand. Booleans are stored as 0/1.

use chrono::NaiveDateTime;
use slate_core::entity::Season;

use crate::{Error, Result};

const DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─── NaiveDateTime ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: NaiveDateTime) -> String { dt.format(DT_FORMAT).to_string() }

pub fn decode_dt(s: &str) -> Result<NaiveDateTime> {
  NaiveDateTime::parse_from_str(s, DT_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `mledb.season` row.
pub struct RawSeason {
  pub season_number: i32,
  pub start_date:    String,
  pub end_date:      String,
}

impl RawSeason {
  pub fn into_season(self) -> Result<Season> {
    Ok(Season {
      season_number: self.season_number,
      start_date:    decode_dt(&self.start_date)?,
      end_date:      decode_dt(&self.end_date)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;

  #[test]
  fn timestamps_round_trip_through_text() {
    let dt = NaiveDate::from_ymd_opt(2024, 9, 7)
      .unwrap()
      .and_hms_opt(23, 59, 59)
      .unwrap();
    assert_eq!(encode_dt(dt), "2024-09-07 23:59:59");
    assert_eq!(decode_dt("2024-09-07 23:59:59").unwrap(), dt);
  }

  #[test]
  fn garbage_timestamp_is_rejected() {
    assert!(matches!(decode_dt("yesterday"), Err(Error::DateParse(_))));
  }
}
