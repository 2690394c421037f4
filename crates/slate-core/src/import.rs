//! The transaction controller: load, parse, build, then commit or roll back.

use std::path::Path;

use tracing::{info, warn};

use crate::{
  Error, Result,
  franchise::FranchiseMap,
  graph::{ImportReport, build_schedule},
  league::GameMode,
  schedule::{self, MatchWeek},
  store::{ScheduleStore, ScheduleTx},
};

/// The season the reference invocation imports.
pub const DEFAULT_SEASON: i32 = 19;

/// What to import and whether to keep it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
  pub season_number: i32,
  /// Each fixture gets one match per skill group per mode, in this order.
  pub game_modes:    Vec<GameMode>,
  /// Build everything, then roll back instead of committing.
  pub dry_run:       bool,
}

impl Default for ImportOptions {
  fn default() -> Self {
    Self {
      season_number: DEFAULT_SEASON,
      game_modes:    GameMode::ALL.to_vec(),
      dry_run:       true,
    }
  }
}

/// How a successful import ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
  Committed(ImportReport),
  /// Dry run: every row was staged and then discarded.
  RolledBack(ImportReport),
}

impl ImportOutcome {
  pub fn report(&self) -> &ImportReport {
    match self {
      Self::Committed(r) | Self::RolledBack(r) => r,
    }
  }

  pub fn is_committed(&self) -> bool { matches!(self, Self::Committed(_)) }
}

/// Import the schedule CSV at `csv_path` into `store`.
///
/// Franchises are loaded and the file is parsed before the write transaction
/// opens, so a malformed file never touches the database.
pub async fn run_import<S: ScheduleStore>(
  store: &mut S,
  csv_path: &Path,
  options: &ImportOptions,
) -> Result<ImportOutcome> {
  let franchises = store.load_franchises().await.map_err(Error::store)?;
  info!(count = franchises.len(), "loaded franchise mappings");

  let weeks = schedule::parse_file(csv_path)?;
  info!(weeks = weeks.len(), path = %csv_path.display(), "parsed schedule");

  import_weeks(store, &weeks, &franchises, options).await
}

/// Stage `weeks` in one transaction and finish it.
///
/// Exactly one of commit or rollback runs on every path. On failure the
/// build error is returned even if the rollback itself also fails.
pub async fn import_weeks<S: ScheduleStore>(
  store: &mut S,
  weeks: &[MatchWeek],
  franchises: &FranchiseMap,
  options: &ImportOptions,
) -> Result<ImportOutcome> {
  let mut tx = store.begin().await.map_err(Error::store)?;

  let built = build_schedule(
    &mut tx,
    options.season_number,
    &options.game_modes,
    weeks,
    franchises,
  )
  .await;

  match built {
    Ok(report) if options.dry_run => {
      info!("dry run: rolling back changes");
      tx.rollback().await.map_err(Error::store)?;
      Ok(ImportOutcome::RolledBack(report))
    }
    Ok(report) => {
      tx.commit().await.map_err(Error::store)?;
      info!(
        weeks = report.weeks,
        fixtures = report.fixtures,
        matches = report.matches,
        series = report.series,
        "schedule created"
      );
      Ok(ImportOutcome::Committed(report))
    }
    Err(err) => {
      if let Err(rollback_err) = tx.rollback().await {
        warn!(error = %rollback_err, "rollback after failed import also failed");
      }
      Err(err)
    }
  }
}

#[cfg(test)]
mod tests {
  use std::{cell::Cell, io::Write as _, rc::Rc};

  use super::*;
  use crate::graph::tests::{Failure, RecordingTx, franchises, two_weeks};

  /// A store whose transactions are [`RecordingTx`]s sharing one outcome cell.
  #[derive(Default)]
  struct RecordingStore {
    fail_on_series: bool,
    outcome:        Rc<Cell<Option<bool>>>,
    begun:          usize,
  }

  impl ScheduleStore for RecordingStore {
    type Error = Failure;
    type Tx<'a> = RecordingTx;

    async fn load_franchises(&self) -> Result<FranchiseMap, Failure> {
      Ok(franchises())
    }

    async fn begin(&mut self) -> Result<RecordingTx, Failure> {
      self.begun += 1;
      Ok(RecordingTx {
        fail_on_series: self.fail_on_series,
        outcome: self.outcome.clone(),
        ..Default::default()
      })
    }
  }

  fn options(dry_run: bool) -> ImportOptions {
    ImportOptions { dry_run, ..Default::default() }
  }

  #[test]
  fn default_options_are_the_reference_run() {
    let opts = ImportOptions::default();
    assert_eq!(opts.season_number, 19);
    assert_eq!(opts.game_modes, [GameMode::Doubles, GameMode::Standard]);
    assert!(opts.dry_run);
  }

  #[tokio::test]
  async fn commit_when_not_dry_run() {
    let mut store = RecordingStore::default();
    let outcome =
      import_weeks(&mut store, &two_weeks(), &franchises(), &options(false))
        .await
        .unwrap();

    assert!(outcome.is_committed());
    assert_eq!(outcome.report().fixtures, 3);
    assert_eq!(store.outcome.get(), Some(true));
  }

  #[tokio::test]
  async fn dry_run_rolls_back_after_building() {
    let mut store = RecordingStore::default();
    let outcome =
      import_weeks(&mut store, &two_weeks(), &franchises(), &options(true))
        .await
        .unwrap();

    assert!(matches!(outcome, ImportOutcome::RolledBack(_)));
    assert_eq!(outcome.report().series, 24);
    assert_eq!(store.outcome.get(), Some(false));
  }

  #[tokio::test]
  async fn failure_rolls_back_and_propagates() {
    let mut store = RecordingStore { fail_on_series: true, ..Default::default() };
    let err =
      import_weeks(&mut store, &two_weeks(), &franchises(), &options(false))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Store(_)));
    assert_eq!(store.outcome.get(), Some(false));
  }

  #[tokio::test]
  async fn parse_failure_never_opens_a_transaction() {
    let mut file = std::env::temp_dir();
    file.push(format!("slate-bad-{}.csv", std::process::id()));
    {
      let mut f = std::fs::File::create(&file).unwrap();
      writeln!(f, "Match #,Start,End,Home,Away,Has_PL").unwrap();
      writeln!(f, "1,not a date,9/7/2024 23:59:59,Alpha,Beta,TRUE").unwrap();
    }

    let mut store = RecordingStore::default();
    let err = run_import(&mut store, &file, &options(false)).await.unwrap_err();
    std::fs::remove_file(&file).ok();

    assert!(matches!(err, Error::InvalidTimestamp { .. }));
    assert_eq!(store.begun, 0);
    assert_eq!(store.outcome.get(), None);
  }
}
