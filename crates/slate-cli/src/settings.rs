//! Database connection settings, read from `DB_*` environment variables.

use ::config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// PostgreSQL connection settings. Every field is required.
///
/// | variable      | field      |
/// |---------------|------------|
/// | `DB_USER`     | `user`     |
/// | `DB_PASSWORD` | `password` |
/// | `DB_HOST`     | `host`     |
/// | `DB_PORT`     | `port`     |
/// | `DB_NAME`     | `name`     |
#[derive(Deserialize, Clone)]
pub struct DatabaseConfig {
  pub user:     String,
  pub password: String,
  pub host:     String,
  pub port:     u16,
  pub name:     String,
}

impl DatabaseConfig {
  /// Read the settings from the process environment. Empty values count as
  /// missing.
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_source(Environment::with_prefix("DB"))
  }

  fn from_source(env: Environment) -> Result<Self, ConfigError> {
    Config::builder()
      .add_source(env.ignore_empty(true))
      .build()?
      .try_deserialize()
  }

  /// Connection parameters for `tokio_postgres`.
  pub fn pg_config(&self) -> tokio_postgres::Config {
    let mut cfg = tokio_postgres::Config::new();
    cfg
      .user(&self.user)
      .password(&self.password)
      .host(&self.host)
      .port(self.port)
      .dbname(&self.name);
    cfg
  }
}
