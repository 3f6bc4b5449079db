use std::path::PathBuf;

use rstest::*;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

use crate::config::FixtureConfig;
use crate::engine::TestDatabase;
use crate::error::Result;
use crate::provider::provide_tempdir;

/// The OS scratch directory that fixture databases are created under
#[fixture]
pub fn get_tempdir() -> PathBuf {
    provide_tempdir()
}

/// File-backed database with `tbl_a` and `tbl_b` each holding the seed row
///
/// Each invocation gets its own scratch directory; it is removed when the
/// returned handle is dropped.
#[fixture]
pub async fn database_engine_for_testing(get_tempdir: PathBuf) -> TestDatabase {
    let config = FixtureConfig::from_env()
        .expect("Invalid testbed configuration")
        .with_root(get_tempdir);

    TestDatabase::valid(&config)
        .await
        .expect("Failed to provision test database")
}

/// File-backed database whose `tbl_a` declares an unknown column type
///
/// Setup failure is returned rather than panicking so that negative tests can
/// assert on either outcome.
#[fixture]
pub async fn err_database_engine_for_testing(get_tempdir: PathBuf) -> Result<TestDatabase> {
    let config = FixtureConfig::from_env()?.with_root(get_tempdir);
    TestDatabase::error(&config).await
}

/// Empty in-memory SQLite database
#[fixture]
pub async fn in_memory_engine() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create in-memory database")
}
