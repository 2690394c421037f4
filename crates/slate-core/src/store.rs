//! The `ScheduleStore` and `ScheduleTx` traits.
//!
//! Implemented by storage backends (`slate-store-sqlite`,
//! `slate-store-postgres`). The graph builder and the transaction controller
//! depend on these abstractions, not on any concrete backend.

use crate::{
  entity::{
    NewLeagueFixture, NewMatch, NewScheduleFixture, NewScheduleGroup, NewSeries,
    NewWeek, RowId, Season,
  },
  franchise::FranchiseMap,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A database holding both the sprocket and mledb schemas.
pub trait ScheduleStore {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The write session returned by [`ScheduleStore::begin`].
  type Tx<'a>: ScheduleTx<Error = Self::Error>
  where
    Self: 'a;

  /// Load every franchise's profile title and id. Runs outside any write
  /// transaction.
  async fn load_franchises(&self) -> Result<FranchiseMap, Self::Error>;

  /// Open the single write transaction for an import.
  async fn begin(&mut self) -> Result<Self::Tx<'_>, Self::Error>;
}

// ─── Transaction ─────────────────────────────────────────────────────────────

/// An open write transaction.
///
/// Every `insert_*` returns the surrogate key the database assigned. Nothing
/// is visible outside the transaction until [`ScheduleTx::commit`].
/// Implementations must roll back when dropped without being finished.
pub trait ScheduleTx {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Look up a season by its number.
  async fn find_season(
    &mut self,
    season_number: i32,
  ) -> Result<Option<Season>, Self::Error>;

  async fn insert_season(&mut self, season: &Season) -> Result<(), Self::Error>;

  async fn insert_schedule_group(
    &mut self,
    group: &NewScheduleGroup,
  ) -> Result<RowId, Self::Error>;

  async fn insert_week(&mut self, week: &NewWeek) -> Result<RowId, Self::Error>;

  /// Bridge a week (`mledb.match`) to its schedule group.
  async fn link_week(
    &mut self,
    week_id: RowId,
    schedule_group_id: RowId,
  ) -> Result<(), Self::Error>;

  async fn insert_schedule_fixture(
    &mut self,
    fixture: &NewScheduleFixture,
  ) -> Result<RowId, Self::Error>;

  async fn insert_league_fixture(
    &mut self,
    fixture: &NewLeagueFixture,
  ) -> Result<RowId, Self::Error>;

  /// Bridge the two representations of one fixture.
  async fn link_fixtures(
    &mut self,
    league_fixture_id: RowId,
    schedule_fixture_id: RowId,
  ) -> Result<(), Self::Error>;

  async fn insert_match_parent(
    &mut self,
    schedule_fixture_id: RowId,
  ) -> Result<RowId, Self::Error>;

  async fn insert_match(&mut self, m: &NewMatch) -> Result<RowId, Self::Error>;

  async fn insert_series(
    &mut self,
    series: &NewSeries,
  ) -> Result<RowId, Self::Error>;

  /// Make every staged row durable.
  async fn commit(self) -> Result<(), Self::Error>;

  /// Discard every staged row.
  async fn rollback(self) -> Result<(), Self::Error>;
}
