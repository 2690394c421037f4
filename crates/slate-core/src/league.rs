//! Skill groups and game modes, with the fixed names the league schema uses.

use crate::{Error, Result};

// ─── Skill groups ────────────────────────────────────────────────────────────

/// A competitive tier. The discriminant is the sprocket `skillGroupId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkillGroup {
  Premier    = 1,
  Master     = 2,
  Champion   = 3,
  Academy    = 4,
  Foundation = 5,
}

impl SkillGroup {
  pub const fn id(self) -> i32 { self as i32 }

  /// The league name written to `mledb.series.league`.
  pub const fn league_name(self) -> &'static str {
    match self {
      Self::Premier => "PREMIER",
      Self::Master => "MASTER",
      Self::Champion => "CHAMPION",
      Self::Academy => "ACADEMY",
      Self::Foundation => "FOUNDATION",
    }
  }

  /// The four tiers that play a fixture. Fixtures without a premier tier
  /// shift the window down by one and pick up FOUNDATION instead.
  pub const fn for_fixture(has_premier: bool) -> [Self; 4] {
    if has_premier {
      [Self::Premier, Self::Master, Self::Champion, Self::Academy]
    } else {
      [Self::Master, Self::Champion, Self::Academy, Self::Foundation]
    }
  }
}

// ─── Game modes ──────────────────────────────────────────────────────────────

/// A match format. The discriminant is the sprocket `gameModeId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
  Doubles  = 13,
  Standard = 14,
}

impl GameMode {
  /// Every mode a regular-season fixture is played in, in creation order.
  pub const ALL: [Self; 2] = [Self::Doubles, Self::Standard];

  pub const fn id(self) -> i32 { self as i32 }

  pub fn from_id(id: i32) -> Result<Self> {
    match id {
      13 => Ok(Self::Doubles),
      14 => Ok(Self::Standard),
      other => Err(Error::UnknownGameMode(other)),
    }
  }

  /// The mode name written to `mledb.series.mode`.
  pub const fn name(self) -> &'static str {
    match self {
      Self::Doubles => "DOUBLES",
      Self::Standard => "STANDARD",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn premier_fixture_plays_top_four_tiers() {
    let ids: Vec<i32> = SkillGroup::for_fixture(true)
      .iter()
      .map(|sg| sg.id())
      .collect();
    assert_eq!(ids, [1, 2, 3, 4]);
  }

  #[test]
  fn non_premier_fixture_plays_bottom_four_tiers() {
    let ids: Vec<i32> = SkillGroup::for_fixture(false)
      .iter()
      .map(|sg| sg.id())
      .collect();
    assert_eq!(ids, [2, 3, 4, 5]);
  }

  #[test]
  fn league_names_match_skill_group_ids() {
    let names: Vec<(i32, &str)> = [
      SkillGroup::Premier,
      SkillGroup::Master,
      SkillGroup::Champion,
      SkillGroup::Academy,
      SkillGroup::Foundation,
    ]
    .iter()
    .map(|sg| (sg.id(), sg.league_name()))
    .collect();

    assert_eq!(
      names,
      [
        (1, "PREMIER"),
        (2, "MASTER"),
        (3, "CHAMPION"),
        (4, "ACADEMY"),
        (5, "FOUNDATION"),
      ]
    );
  }

  #[test]
  fn game_mode_ids_and_names() {
    assert_eq!(GameMode::from_id(13).unwrap(), GameMode::Doubles);
    assert_eq!(GameMode::from_id(14).unwrap(), GameMode::Standard);
    assert_eq!(GameMode::Doubles.name(), "DOUBLES");
    assert_eq!(GameMode::Standard.name(), "STANDARD");
  }

  #[test]
  fn unknown_game_mode_is_rejected() {
    assert!(matches!(GameMode::from_id(3), Err(Error::UnknownGameMode(3))));
  }
}
