//! [`PostgresStore`] — the PostgreSQL implementation of [`ScheduleStore`].

use slate_core::{
  entity::{
    NewLeagueFixture, NewMatch, NewScheduleFixture, NewScheduleGroup, NewSeries,
    NewWeek, RowId, Season,
  },
  franchise::FranchiseMap,
  store::{ScheduleStore, ScheduleTx},
};
use tokio_postgres::{Client, NoTls, Transaction};
use tracing::{debug, error};

use crate::Result;

// Timestamp parameters are cast to `timestamp` so they bind as
// `NaiveDateTime` whether the column is `timestamp` or `timestamptz`.

const SELECT_FRANCHISES: &str = "
SELECT fp.title, f.id
FROM sprocket.franchise f
JOIN sprocket.franchise_profile fp ON fp.\"franchiseId\" = f.id";

const SELECT_SEASON: &str = "
SELECT season_number, start_date::timestamp, end_date::timestamp
FROM mledb.season
WHERE season_number = $1";

const INSERT_SEASON: &str = "
INSERT INTO mledb.season (season_number, start_date, end_date)
VALUES ($1, $2::timestamp, $3::timestamp)";

const INSERT_SCHEDULE_GROUP: &str = "
INSERT INTO sprocket.schedule_group
  (start, \"end\", description, \"typeId\", \"gameId\", \"parentGroupId\")
VALUES ($1::timestamp, $2::timestamp, $3, $4, $5, $6)
RETURNING id";

const INSERT_WEEK: &str = "
INSERT INTO mledb.\"match\"
  (from_date, to_date, season, match_number, is_double_header)
VALUES ($1::timestamp, $2::timestamp, $3, $4, $5)
RETURNING id";

const INSERT_WEEK_LINK: &str = "
INSERT INTO mledb_bridge.match_to_schedule_group (\"matchId\", \"weekScheduleGroupId\")
VALUES ($1, $2)";

const INSERT_SCHEDULE_FIXTURE: &str = "
INSERT INTO sprocket.schedule_fixture
  (\"scheduleGroupId\", \"homeFranchiseId\", \"awayFranchiseId\")
VALUES ($1, $2, $3)
RETURNING id";

const INSERT_LEAGUE_FIXTURE: &str = "
INSERT INTO mledb.fixture (match_id, home_name, away_name)
VALUES ($1, $2, $3)
RETURNING id";

const INSERT_FIXTURE_LINK: &str = "
INSERT INTO mledb_bridge.fixture_to_fixture (\"mleFixtureId\", \"sprocketFixtureId\")
VALUES ($1, $2)";

const INSERT_MATCH_PARENT: &str = "
INSERT INTO sprocket.match_parent (\"fixtureId\")
VALUES ($1)
RETURNING id";

const INSERT_MATCH: &str = "
INSERT INTO sprocket.\"match\" (\"skillGroupId\", \"matchParentId\", \"gameModeId\")
VALUES ($1, $2, $3)
RETURNING id";

const INSERT_SERIES: &str = "
INSERT INTO mledb.series (league, mode, fixture_id)
VALUES ($1, $2, $3)
RETURNING id";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A schedule store on a live PostgreSQL server.
pub struct PostgresStore {
  client: Client,
}

impl PostgresStore {
  /// Connect without TLS and drive the connection on a background task.
  pub async fn connect(config: &tokio_postgres::Config) -> Result<Self> {
    let (client, connection) = config.connect(NoTls).await?;
    tokio::spawn(async move {
      if let Err(e) = connection.await {
        error!(error = %e, "postgres connection error");
      }
    });
    Ok(Self { client })
  }
}

impl ScheduleStore for PostgresStore {
  type Error = crate::Error;
  type Tx<'a> = PostgresTx<'a>;

  async fn load_franchises(&self) -> Result<FranchiseMap> {
    let rows = self.client.query(SELECT_FRANCHISES, &[]).await?;
    rows
      .iter()
      .map(|row| -> Result<(String, RowId)> { Ok((row.try_get(0)?, row.try_get(1)?)) })
      .collect()
  }

  async fn begin(&mut self) -> Result<PostgresTx<'_>> {
    let tx = self.client.transaction().await?;
    debug!("transaction opened");
    Ok(PostgresTx { tx })
  }
}

// ─── Transaction ─────────────────────────────────────────────────────────────

/// An open transaction. `tokio_postgres` rolls it back if dropped unfinished.
pub struct PostgresTx<'a> {
  tx: Transaction<'a>,
}

impl PostgresTx<'_> {
  async fn insert_returning(
    &self,
    sql: &str,
    params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
  ) -> Result<RowId> {
    let row = self.tx.query_one(sql, params).await?;
    Ok(row.try_get(0)?)
  }
}

impl ScheduleTx for PostgresTx<'_> {
  type Error = crate::Error;

  async fn find_season(&mut self, season_number: i32) -> Result<Option<Season>> {
    let row = self.tx.query_opt(SELECT_SEASON, &[&season_number]).await?;
    row
      .map(|row| -> Result<Season> {
        Ok(Season {
          season_number: row.try_get(0)?,
          start_date:    row.try_get(1)?,
          end_date:      row.try_get(2)?,
        })
      })
      .transpose()
  }

  async fn insert_season(&mut self, season: &Season) -> Result<()> {
    self
      .tx
      .execute(INSERT_SEASON, &[
        &season.season_number,
        &season.start_date,
        &season.end_date,
      ])
      .await?;
    Ok(())
  }

  async fn insert_schedule_group(&mut self, group: &NewScheduleGroup) -> Result<RowId> {
    self
      .insert_returning(INSERT_SCHEDULE_GROUP, &[
        &group.start,
        &group.end,
        &group.description,
        &group.group_type.id(),
        &group.game_id,
        &group.parent_group_id,
      ])
      .await
  }

  async fn insert_week(&mut self, week: &NewWeek) -> Result<RowId> {
    self
      .insert_returning(INSERT_WEEK, &[
        &week.from_date,
        &week.to_date,
        &week.season,
        &week.match_number,
        &week.is_double_header,
      ])
      .await
  }

  async fn link_week(&mut self, week_id: RowId, schedule_group_id: RowId) -> Result<()> {
    self
      .tx
      .execute(INSERT_WEEK_LINK, &[&week_id, &schedule_group_id])
      .await?;
    Ok(())
  }

  async fn insert_schedule_fixture(&mut self, fixture: &NewScheduleFixture) -> Result<RowId> {
    self
      .insert_returning(INSERT_SCHEDULE_FIXTURE, &[
        &fixture.schedule_group_id,
        &fixture.home_franchise_id,
        &fixture.away_franchise_id,
      ])
      .await
  }

  async fn insert_league_fixture(&mut self, fixture: &NewLeagueFixture) -> Result<RowId> {
    self
      .insert_returning(INSERT_LEAGUE_FIXTURE, &[
        &fixture.match_id,
        &fixture.home_name,
        &fixture.away_name,
      ])
      .await
  }

  async fn link_fixtures(
    &mut self,
    league_fixture_id: RowId,
    schedule_fixture_id: RowId,
  ) -> Result<()> {
    self
      .tx
      .execute(INSERT_FIXTURE_LINK, &[&league_fixture_id, &schedule_fixture_id])
      .await?;
    Ok(())
  }

  async fn insert_match_parent(&mut self, schedule_fixture_id: RowId) -> Result<RowId> {
    self
      .insert_returning(INSERT_MATCH_PARENT, &[&schedule_fixture_id])
      .await
  }

  async fn insert_match(&mut self, m: &NewMatch) -> Result<RowId> {
    self
      .insert_returning(INSERT_MATCH, &[
        &m.skill_group.id(),
        &m.match_parent_id,
        &m.game_mode.id(),
      ])
      .await
  }

  async fn insert_series(&mut self, series: &NewSeries) -> Result<RowId> {
    self
      .insert_returning(INSERT_SERIES, &[
        &series.league.league_name(),
        &series.mode.name(),
        &series.fixture_id,
      ])
      .await
  }

  async fn commit(self) -> Result<()> {
    self.tx.commit().await?;
    Ok(())
  }

  async fn rollback(self) -> Result<()> {
    self.tx.rollback().await?;
    Ok(())
  }
}
