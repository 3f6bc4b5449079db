use std::path::{Path, PathBuf};

use sqlx::SqlitePool;
use tempfile::TempDir;
use tracing::debug;

use crate::config::FixtureConfig;
use crate::error::Result;
use crate::provider::{ERROR_DB_FILE, VALID_DB_FILE, open_engine, provision_error, provision_valid};

const SCRATCH_PREFIX: &str = "sqlite_testbed_";

/// A provisioned database file and the scratch directory that holds it
///
/// Every handle gets its own directory under [`FixtureConfig::root`], so
/// concurrent tests never share a file. The directory and database are
/// removed when the handle is dropped; call [`TestDatabase::close`] to also
/// wait for the pool's connections to shut down first.
#[derive(Debug)]
pub struct TestDatabase {
    // Field order matters: the pool drops before the directory.
    pool: SqlitePool,
    path: PathBuf,
    dir: TempDir,
}

impl TestDatabase {
    /// Provision `tbl_a` and `tbl_b` with the seed row
    pub async fn valid(config: &FixtureConfig) -> Result<Self> {
        let db = Self::create(config, VALID_DB_FILE).await?;
        provision_valid(&db.pool).await?;
        Ok(db)
    }

    /// Provision the malformed `tbl_a`
    pub async fn error(config: &FixtureConfig) -> Result<Self> {
        let db = Self::create(config, ERROR_DB_FILE).await?;
        provision_error(&db.pool).await?;
        Ok(db)
    }

    async fn create(config: &FixtureConfig, file_name: &str) -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(&config.root)?;
        let path = dir.path().join(file_name);
        let pool = open_engine(&path, config).await?;

        Ok(Self { pool, path, dir })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn scratch_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Close every pooled connection, then delete the scratch directory
    pub async fn close(self) -> Result<()> {
        let Self { pool, path, dir } = self;

        pool.close().await;
        dir.close()?;

        debug!(path = %path.display(), "Closed test database");

        Ok(())
    }
}
