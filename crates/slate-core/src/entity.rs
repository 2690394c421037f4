//! Rows written by an import, one type per table.
//!
//! `New*` types are inputs to [`crate::store::ScheduleTx`]; the store assigns
//! the surrogate key and hands it back. The sprocket schema holds the generic
//! scheduling tree, the mledb schema holds the league's own view of the same
//! weeks and fixtures, and mledb_bridge links the two.

use chrono::NaiveDateTime;

use crate::league::{GameMode, SkillGroup};

/// A database-assigned surrogate key.
pub type RowId = i32;

/// The sprocket `game` every schedule group belongs to.
pub const GAME_ID: i32 = 7;

// ─── mledb ───────────────────────────────────────────────────────────────────

/// A league season, keyed by its human-assigned number rather than a
/// surrogate key. Never updated once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Season {
  pub season_number: i32,
  pub start_date:    NaiveDateTime,
  pub end_date:      NaiveDateTime,
}

/// One match week (`mledb.match`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWeek {
  pub from_date:        NaiveDateTime,
  pub to_date:          NaiveDateTime,
  pub season:           i32,
  pub match_number:     i32,
  pub is_double_header: bool,
}

/// A fixture as the league sees it: team names, not franchise ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLeagueFixture {
  pub match_id:  RowId,
  pub home_name: String,
  pub away_name: String,
}

/// One league/mode series within a league fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSeries {
  pub fixture_id: RowId,
  /// Stored as [`SkillGroup::league_name`].
  pub league:     SkillGroup,
  /// Stored as [`GameMode::name`].
  pub mode:       GameMode,
}

// ─── sprocket ────────────────────────────────────────────────────────────────

/// The `typeId` of a schedule group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleGroupType {
  Season = 1,
  Week   = 3,
}

impl ScheduleGroupType {
  pub const fn id(self) -> i32 { self as i32 }
}

/// A node in the season → week schedule tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScheduleGroup {
  pub start:           NaiveDateTime,
  pub end:             NaiveDateTime,
  pub description:     String,
  pub group_type:      ScheduleGroupType,
  pub game_id:         i32,
  /// `None` only for the season-level group.
  pub parent_group_id: Option<RowId>,
}

/// A home/away pairing inside a week's schedule group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewScheduleFixture {
  pub schedule_group_id: RowId,
  pub home_franchise_id: RowId,
  pub away_franchise_id: RowId,
}

/// A single scheduled match under a match parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
  pub match_parent_id: RowId,
  pub skill_group:     SkillGroup,
  pub game_mode:       GameMode,
}
