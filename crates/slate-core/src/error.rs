//! Error types for `slate-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("failed to read schedule file: {0}")]
  Io(#[from] std::io::Error),

  #[error("malformed schedule file: {0}")]
  Csv(#[from] csv::Error),

  #[error("invalid timestamp {value:?}: {source}")]
  InvalidTimestamp {
    value:  String,
    #[source]
    source: chrono::ParseError,
  },

  #[error("franchise not found: {0:?}")]
  UnknownFranchise(String),

  #[error("unknown game mode id: {0}")]
  UnknownGameMode(i32),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Box a backend error into [`Error::Store`].
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
