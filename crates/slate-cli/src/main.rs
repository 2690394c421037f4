//! `slate` — import a season schedule CSV into the league database.
//!
//! # Usage
//!
//! ```
//! # dry run against PostgreSQL (DB_USER, DB_PASSWORD, DB_HOST, DB_PORT, DB_NAME)
//! slate --input inputs/s19_schedule.csv --season 19
//!
//! # keep the rows
//! slate --commit
//!
//! # local SQLite store, doubles only
//! slate --sqlite league.db --game-mode 13 --commit
//! ```
//!
//! Exit status: 0 on success (committed or rolled back), 1 when the import
//! fails, 2 when the database settings are missing or invalid.

mod settings;

use std::{
  path::{Path, PathBuf},
  process::ExitCode,
};

use anyhow::Context as _;
use clap::Parser;
use settings::DatabaseConfig;
use slate_core::{
  import::{DEFAULT_SEASON, ImportOptions, ImportOutcome, run_import},
  league::GameMode,
};
use slate_store_postgres::PostgresStore;
use slate_store_sqlite::SqliteStore;
use tracing::{error, info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
  name = "slate",
  version,
  about = "Import a season schedule into the league database"
)]
struct Args {
  /// Schedule CSV to import.
  #[arg(short, long, value_name = "FILE", default_value = "inputs/s19_schedule.csv")]
  input: PathBuf,

  /// Season number the weeks belong to.
  #[arg(short, long, default_value_t = DEFAULT_SEASON)]
  season: i32,

  /// Game mode id to schedule (13 = doubles, 14 = standard). Repeat for
  /// several; defaults to both.
  #[arg(long = "game-mode", value_name = "ID", value_parser = parse_game_mode)]
  game_modes: Vec<GameMode>,

  /// Commit the import. Without this flag every write is rolled back.
  #[arg(long)]
  commit: bool,

  /// Import into a local SQLite store at FILE instead of PostgreSQL.
  #[arg(long, value_name = "FILE")]
  sqlite: Option<PathBuf>,
}

impl Args {
  fn import_options(&self) -> ImportOptions {
    let defaults = ImportOptions::default();
    ImportOptions {
      season_number: self.season,
      game_modes:    if self.game_modes.is_empty() {
        defaults.game_modes
      } else {
        self.game_modes.clone()
      },
      dry_run:       !self.commit,
    }
  }
}

fn parse_game_mode(s: &str) -> Result<GameMode, String> {
  let id: i32 = s.parse().map_err(|_| format!("`{s}` is not a game mode id"))?;
  GameMode::from_id(id).map_err(|e| e.to_string())
}

// ─── Backend ──────────────────────────────────────────────────────────────────

enum Backend {
  Postgres(DatabaseConfig),
  Sqlite(PathBuf),
}

async fn run(
  backend: Backend,
  input: &Path,
  options: &ImportOptions,
) -> anyhow::Result<ImportOutcome> {
  match backend {
    Backend::Postgres(cfg) => {
      let mut store = PostgresStore::connect(&cfg.pg_config())
        .await
        .with_context(|| {
          format!("failed to connect to {}:{}/{}", cfg.host, cfg.port, cfg.name)
        })?;
      info!(host = %cfg.host, database = %cfg.name, "connected to postgres");
      Ok(run_import(&mut store, input, options).await?)
    }
    Backend::Sqlite(path) => {
      let mut store = SqliteStore::open(&path)
        .await
        .with_context(|| format!("failed to open store at {}", path.display()))?;
      info!(path = %path.display(), "opened sqlite store");
      Ok(run_import(&mut store, input, options).await?)
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();
  let options = args.import_options();

  let backend = match &args.sqlite {
    Some(path) => Backend::Sqlite(path.clone()),
    None => match DatabaseConfig::from_env() {
      Ok(cfg) => Backend::Postgres(cfg),
      Err(e) => {
        error!(
          error = %e,
          "database settings incomplete; set DB_USER, DB_PASSWORD, DB_HOST, DB_PORT and DB_NAME"
        );
        return ExitCode::from(2);
      }
    },
  };

  match run(backend, &args.input, &options).await {
    Ok(outcome) => {
      let report = outcome.report();
      info!(
        committed = outcome.is_committed(),
        season_created = report.season_created,
        weeks = report.weeks,
        fixtures = report.fixtures,
        series = report.series,
        "import finished"
      );
      ExitCode::SUCCESS
    }
    Err(e) => {
      error!(error = %format!("{e:#}"), "import failed");
      ExitCode::FAILURE
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(args: &[&str]) -> Args {
    Args::try_parse_from(std::iter::once("slate").chain(args.iter().copied())).unwrap()
  }

  #[test]
  fn defaults_are_a_dry_run_of_season_19() {
    let args = parse(&[]);
    assert_eq!(args.input, PathBuf::from("inputs/s19_schedule.csv"));
    assert!(args.sqlite.is_none());
    assert_eq!(args.import_options(), ImportOptions::default());
  }

  #[test]
  fn commit_flag_disables_dry_run() {
    let options = parse(&["--commit", "--season", "20"]).import_options();
    assert!(!options.dry_run);
    assert_eq!(options.season_number, 20);
  }

  #[test]
  fn game_modes_keep_the_given_order() {
    let options = parse(&["--game-mode", "14", "--game-mode", "13"]).import_options();
    assert_eq!(options.game_modes, vec![GameMode::Standard, GameMode::Doubles]);

    let options = parse(&["--game-mode", "13"]).import_options();
    assert_eq!(options.game_modes, vec![GameMode::Doubles]);
  }

  #[test]
  fn unknown_game_mode_is_rejected() {
    let argv = ["slate", "--game-mode", "12"];
    assert!(Args::try_parse_from(argv).is_err());
    let argv = ["slate", "--game-mode", "doubles"];
    assert!(Args::try_parse_from(argv).is_err());
  }

  #[test]
  fn sqlite_path_is_taken_verbatim() {
    let args = parse(&["--sqlite", "league.db", "-i", "s20.csv"]);
    assert_eq!(args.sqlite, Some(PathBuf::from("league.db")));
    assert_eq!(args.input, PathBuf::from("s20.csv"));
  }
}
