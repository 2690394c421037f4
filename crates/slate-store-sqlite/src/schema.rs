//! SQL schema for the SQLite store.
//!
//! Mirrors the subset of the production sprocket / mledb / mledb_bridge
//! tables that an import touches. Each schema is an attached database, so
//! foreign keys only run within a schema, never across.

/// Attached database names, in attach order.
pub const SCHEMAS: [&str; 3] = ["sprocket", "mledb", "mledb_bridge"];

/// Connection-level settings. The default rollback journal is kept: WAL
/// would make a commit spanning attached databases non-atomic.
pub const PRAGMAS: &str = "
PRAGMA foreign_keys = ON;
";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
/// Run after every name in [`SCHEMAS`] is attached.
pub const SCHEMA: &str = "
-- ── sprocket ─────────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS sprocket.franchise (
    id INTEGER PRIMARY KEY
);

CREATE TABLE IF NOT EXISTS sprocket.franchise_profile (
    id            INTEGER PRIMARY KEY,
    \"franchiseId\" INTEGER NOT NULL UNIQUE REFERENCES franchise(id),
    title         TEXT    NOT NULL
);

-- typeId: 1 = season, 3 = week. Weeks point at their season via parentGroupId.
CREATE TABLE IF NOT EXISTS sprocket.schedule_group (
    id              INTEGER PRIMARY KEY,
    start           TEXT    NOT NULL,
    \"end\"           TEXT    NOT NULL,
    description     TEXT,
    \"typeId\"        INTEGER NOT NULL,
    \"gameId\"        INTEGER NOT NULL,
    \"parentGroupId\" INTEGER REFERENCES schedule_group(id)
);

CREATE TABLE IF NOT EXISTS sprocket.schedule_fixture (
    id                INTEGER PRIMARY KEY,
    \"scheduleGroupId\" INTEGER NOT NULL REFERENCES schedule_group(id),
    \"homeFranchiseId\" INTEGER NOT NULL REFERENCES franchise(id),
    \"awayFranchiseId\" INTEGER NOT NULL REFERENCES franchise(id)
);

CREATE TABLE IF NOT EXISTS sprocket.match_parent (
    id          INTEGER PRIMARY KEY,
    \"fixtureId\" INTEGER REFERENCES schedule_fixture(id)
);

CREATE TABLE IF NOT EXISTS sprocket.\"match\" (
    id              INTEGER PRIMARY KEY,
    \"skillGroupId\"  INTEGER NOT NULL,
    \"matchParentId\" INTEGER NOT NULL UNIQUE REFERENCES match_parent(id),
    \"gameModeId\"    INTEGER NOT NULL
);

-- ── mledb ────────────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS mledb.season (
    season_number INTEGER PRIMARY KEY,
    start_date    TEXT NOT NULL,
    end_date      TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS mledb.\"match\" (
    id               INTEGER PRIMARY KEY,
    from_date        TEXT    NOT NULL,
    to_date          TEXT    NOT NULL,
    season           INTEGER NOT NULL REFERENCES season(season_number),
    match_number     INTEGER NOT NULL,
    is_double_header INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS mledb.fixture (
    id        INTEGER PRIMARY KEY,
    match_id  INTEGER NOT NULL REFERENCES \"match\"(id),
    home_name TEXT    NOT NULL,
    away_name TEXT    NOT NULL
);

CREATE TABLE IF NOT EXISTS mledb.series (
    id         INTEGER PRIMARY KEY,
    league     TEXT    NOT NULL,   -- PREMIER | MASTER | CHAMPION | ACADEMY | FOUNDATION
    mode       TEXT    NOT NULL,   -- DOUBLES | STANDARD
    fixture_id INTEGER NOT NULL REFERENCES fixture(id)
);

-- ── mledb_bridge ─────────────────────────────────────────────────────────

CREATE TABLE IF NOT EXISTS mledb_bridge.match_to_schedule_group (
    \"matchId\"             INTEGER NOT NULL UNIQUE,
    \"weekScheduleGroupId\" INTEGER NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS mledb_bridge.fixture_to_fixture (
    \"mleFixtureId\"      INTEGER NOT NULL UNIQUE,
    \"sprocketFixtureId\" INTEGER NOT NULL UNIQUE
);
";

/// Every table an import writes, schema-qualified and quoted.
pub const IMPORT_TABLES: [&str; 10] = [
  "mledb.season",
  "sprocket.schedule_group",
  "mledb.\"match\"",
  "mledb_bridge.match_to_schedule_group",
  "sprocket.schedule_fixture",
  "mledb.fixture",
  "mledb_bridge.fixture_to_fixture",
  "sprocket.match_parent",
  "sprocket.\"match\"",
  "mledb.series",
];
