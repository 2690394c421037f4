//! [`SqliteStore`] — the SQLite implementation of [`ScheduleStore`].

use std::{
  path::{Path, PathBuf},
  sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
  },
};

use rusqlite::OptionalExtension as _;
use tracing::warn;

use slate_core::{
  entity::{
    NewLeagueFixture, NewMatch, NewScheduleFixture, NewScheduleGroup, NewSeries,
    NewWeek, RowId, Season,
  },
  franchise::FranchiseMap,
  store::{ScheduleStore, ScheduleTx},
};

use crate::{
  Result,
  encode::{RawSeason, encode_dt},
  schema::{IMPORT_TABLES, PRAGMAS, SCHEMA, SCHEMAS},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A schedule store backed by SQLite: one main file plus one attached file
/// per schema.
///
/// Cloning shares the same connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  /// Set when a [`SqliteTx`] is dropped unfinished; cleared by whichever
  /// connection call rolls it back first.
  abandoned:       Arc<AtomicBool>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  ///
  /// Each schema is attached from a sibling file: `league.db` attaches
  /// `league.sprocket.db`, `league.mledb.db` and `league.mledb_bridge.db`.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let attach: Vec<(&'static str, String)> = SCHEMAS
      .iter()
      .map(|s| (*s, schema_path(path, s).to_string_lossy().into_owned()))
      .collect();

    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, abandoned: Arc::default() };
    store.init_schema(attach).await?;
    Ok(store)
  }

  /// Open an in-memory store with in-memory schemas.
  pub async fn open_in_memory() -> Result<Self> {
    let attach = SCHEMAS.iter().map(|s| (*s, ":memory:".to_owned())).collect();

    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, abandoned: Arc::default() };
    store.init_schema(attach).await?;
    Ok(store)
  }

  async fn init_schema(&self, attach: Vec<(&'static str, String)>) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute_batch(PRAGMAS)?;
        for (schema, file) in attach {
          conn.execute(
            &format!("ATTACH DATABASE ?1 AS {schema}"),
            rusqlite::params![file],
          )?;
        }
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Register a franchise and its profile title, returning the franchise id.
  ///
  /// The import itself never writes franchises; this seeds a local store.
  pub async fn add_franchise(&self, title: impl Into<String>) -> Result<RowId> {
    let title = title.into();
    let abandoned = self.abandoned.clone();

    let id = self
      .conn
      .call(move |conn| {
        settle_abandoned(conn, &abandoned)?;
        let tx = conn.transaction()?;
        let id: RowId = tx.query_row(
          "INSERT INTO sprocket.franchise DEFAULT VALUES RETURNING id",
          [],
          |row| row.get(0),
        )?;
        tx.execute(
          "INSERT INTO sprocket.franchise_profile (\"franchiseId\", title)
           VALUES (?1, ?2)",
          rusqlite::params![id, title],
        )?;
        tx.commit()?;
        Ok(id)
      })
      .await?;

    Ok(id)
  }

  /// Row count of every table an import writes, in write order.
  pub async fn row_counts(&self) -> Result<Vec<(&'static str, i64)>> {
    let abandoned = self.abandoned.clone();
    let counts = self
      .conn
      .call(move |conn| {
        settle_abandoned(conn, &abandoned)?;
        IMPORT_TABLES
          .iter()
          .map(|table| -> Result<(&'static str, i64), tokio_rusqlite::Error> {
            let n: i64 =
              conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| {
                r.get(0)
              })?;
            Ok((*table, n))
          })
          .collect::<Result<Vec<_>, tokio_rusqlite::Error>>()
      })
      .await?;
    Ok(counts)
  }
}

/// Roll back a transaction whose [`SqliteTx`] was dropped, if that has not
/// happened yet. Runs on the connection thread, so it is ordered with every
/// other statement.
fn settle_abandoned(conn: &rusqlite::Connection, abandoned: &AtomicBool) -> rusqlite::Result<()> {
  if abandoned.swap(false, Ordering::SeqCst) && !conn.is_autocommit() {
    conn.execute_batch("ROLLBACK")?;
  }
  Ok(())
}

/// `dir/league.db` + `mledb` → `dir/league.mledb.db`.
fn schema_path(main: &Path, schema: &str) -> PathBuf {
  let stem = main
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_default();
  main.with_file_name(format!("{stem}.{schema}.db"))
}

// ─── ScheduleStore impl ──────────────────────────────────────────────────────

impl ScheduleStore for SqliteStore {
  type Error = crate::Error;
  type Tx<'a> = SqliteTx<'a>;

  async fn load_franchises(&self) -> Result<FranchiseMap> {
    let abandoned = self.abandoned.clone();
    let rows: Vec<(String, RowId)> = self
      .conn
      .call(move |conn| {
        settle_abandoned(conn, &abandoned)?;
        let mut stmt = conn.prepare(
          "SELECT fp.title, f.id
           FROM sprocket.franchise f
           JOIN sprocket.franchise_profile fp ON fp.\"franchiseId\" = f.id",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows.into_iter().collect())
  }

  async fn begin(&mut self) -> Result<SqliteTx<'_>> {
    let abandoned = self.abandoned.clone();
    self
      .conn
      .call(move |conn| {
        settle_abandoned(conn, &abandoned)?;
        conn.execute_batch("BEGIN")?;
        Ok(())
      })
      .await?;

    Ok(SqliteTx {
      conn:      &self.conn,
      abandoned: &self.abandoned,
      finished:  false,
    })
  }
}

// ─── Transaction ─────────────────────────────────────────────────────────────

/// An open `BEGIN … COMMIT` block on the store's connection.
///
/// Dropping it unfinished marks it abandoned: the next call on the store, or
/// a rollback task queued from `drop`, ends it with `ROLLBACK`.
pub struct SqliteTx<'a> {
  conn:      &'a tokio_rusqlite::Connection,
  abandoned: &'a Arc<AtomicBool>,
  finished:  bool,
}

impl SqliteTx<'_> {
  /// Run `COMMIT` or `ROLLBACK`. A failed `COMMIT` leaves the transaction
  /// open, so it is rolled back before the error is returned.
  async fn finish(mut self, sql: &'static str) -> Result<()> {
    self.finished = true;
    self
      .conn
      .call(move |conn| {
        if let Err(e) = conn.execute_batch(sql) {
          if !conn.is_autocommit() {
            if let Err(rollback_err) = conn.execute_batch("ROLLBACK") {
              warn!(error = %rollback_err, "rollback after failed {sql} also failed");
            }
          }
          return Err(e.into());
        }
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a single-row `INSERT … RETURNING id`.
  async fn insert_returning<P>(&self, sql: &'static str, params: P) -> Result<RowId>
  where
    P: rusqlite::Params + Send + 'static,
  {
    let id = self
      .conn
      .call(move |conn| Ok(conn.query_row(sql, params, |row| row.get(0))?))
      .await?;
    Ok(id)
  }

  async fn execute<P>(&self, sql: &'static str, params: P) -> Result<()>
  where
    P: rusqlite::Params + Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        conn.execute(sql, params)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

impl Drop for SqliteTx<'_> {
  fn drop(&mut self) {
    if self.finished {
      return;
    }
    warn!("transaction dropped before commit or rollback; rolling back");

    self.abandoned.store(true, Ordering::SeqCst);
    let conn = self.conn.clone();
    let abandoned = self.abandoned.clone();
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
      handle.spawn(async move {
        let rolled_back = conn
          .call(move |conn| {
            settle_abandoned(conn, &abandoned)?;
            Ok(())
          })
          .await;
        if let Err(e) = rolled_back {
          warn!(error = %e, "rollback of dropped transaction failed");
        }
      });
    }
  }
}

impl ScheduleTx for SqliteTx<'_> {
  type Error = crate::Error;

  async fn find_season(&mut self, season_number: i32) -> Result<Option<Season>> {
    let raw: Option<RawSeason> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT season_number, start_date, end_date
               FROM mledb.season WHERE season_number = ?1",
              rusqlite::params![season_number],
              |row| {
                Ok(RawSeason {
                  season_number: row.get(0)?,
                  start_date:    row.get(1)?,
                  end_date:      row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSeason::into_season).transpose()
  }

  async fn insert_season(&mut self, season: &Season) -> Result<()> {
    self
      .execute(
        "INSERT INTO mledb.season (season_number, start_date, end_date)
         VALUES (?1, ?2, ?3)",
        (
          season.season_number,
          encode_dt(season.start_date),
          encode_dt(season.end_date),
        ),
      )
      .await
  }

  async fn insert_schedule_group(&mut self, group: &NewScheduleGroup) -> Result<RowId> {
    self
      .insert_returning(
        "INSERT INTO sprocket.schedule_group
           (start, \"end\", description, \"typeId\", \"gameId\", \"parentGroupId\")
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         RETURNING id",
        (
          encode_dt(group.start),
          encode_dt(group.end),
          group.description.clone(),
          group.group_type.id(),
          group.game_id,
          group.parent_group_id,
        ),
      )
      .await
  }

  async fn insert_week(&mut self, week: &NewWeek) -> Result<RowId> {
    self
      .insert_returning(
        "INSERT INTO mledb.\"match\"
           (from_date, to_date, season, match_number, is_double_header)
         VALUES (?1, ?2, ?3, ?4, ?5)
         RETURNING id",
        (
          encode_dt(week.from_date),
          encode_dt(week.to_date),
          week.season,
          week.match_number,
          week.is_double_header,
        ),
      )
      .await
  }

  async fn link_week(&mut self, week_id: RowId, schedule_group_id: RowId) -> Result<()> {
    self
      .execute(
        "INSERT INTO mledb_bridge.match_to_schedule_group
           (\"matchId\", \"weekScheduleGroupId\")
         VALUES (?1, ?2)",
        (week_id, schedule_group_id),
      )
      .await
  }

  async fn insert_schedule_fixture(&mut self, fixture: &NewScheduleFixture) -> Result<RowId> {
    self
      .insert_returning(
        "INSERT INTO sprocket.schedule_fixture
           (\"scheduleGroupId\", \"homeFranchiseId\", \"awayFranchiseId\")
         VALUES (?1, ?2, ?3)
         RETURNING id",
        (
          fixture.schedule_group_id,
          fixture.home_franchise_id,
          fixture.away_franchise_id,
        ),
      )
      .await
  }

  async fn insert_league_fixture(&mut self, fixture: &NewLeagueFixture) -> Result<RowId> {
    self
      .insert_returning(
        "INSERT INTO mledb.fixture (match_id, home_name, away_name)
         VALUES (?1, ?2, ?3)
         RETURNING id",
        (
          fixture.match_id,
          fixture.home_name.clone(),
          fixture.away_name.clone(),
        ),
      )
      .await
  }

  async fn link_fixtures(
    &mut self,
    league_fixture_id: RowId,
    schedule_fixture_id: RowId,
  ) -> Result<()> {
    self
      .execute(
        "INSERT INTO mledb_bridge.fixture_to_fixture
           (\"mleFixtureId\", \"sprocketFixtureId\")
         VALUES (?1, ?2)",
        (league_fixture_id, schedule_fixture_id),
      )
      .await
  }

  async fn insert_match_parent(&mut self, schedule_fixture_id: RowId) -> Result<RowId> {
    self
      .insert_returning(
        "INSERT INTO sprocket.match_parent (\"fixtureId\") VALUES (?1) RETURNING id",
        (schedule_fixture_id,),
      )
      .await
  }

  async fn insert_match(&mut self, m: &NewMatch) -> Result<RowId> {
    self
      .insert_returning(
        "INSERT INTO sprocket.\"match\"
           (\"skillGroupId\", \"matchParentId\", \"gameModeId\")
         VALUES (?1, ?2, ?3)
         RETURNING id",
        (m.skill_group.id(), m.match_parent_id, m.game_mode.id()),
      )
      .await
  }

  async fn insert_series(&mut self, series: &NewSeries) -> Result<RowId> {
    self
      .insert_returning(
        "INSERT INTO mledb.series (league, mode, fixture_id)
         VALUES (?1, ?2, ?3)
         RETURNING id",
        (
          series.league.league_name(),
          series.mode.name(),
          series.fixture_id,
        ),
      )
      .await
  }

  async fn commit(self) -> Result<()> { self.finish("COMMIT").await }

  async fn rollback(self) -> Result<()> { self.finish("ROLLBACK").await }
}
