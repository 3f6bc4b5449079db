use std::path::{Path, PathBuf};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::config::FixtureConfig;
use crate::error::Result;
use crate::schema::{FixtureTable, NonexistentTypeTable, SEED_INTEGER, SampleRow, TableA, TableB};

pub const VALID_DB_FILE: &str = "test_sqlite.sqlite";
pub const ERROR_DB_FILE: &str = "test_sqlite_err.sqlite";

/// OS scratch directory; the same path on every call within one environment
pub fn provide_tempdir() -> PathBuf {
    std::env::temp_dir()
}

/// Open (creating if missing) a file-backed SQLite database
pub async fn open_engine(path: &Path, config: &FixtureConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await?;

    debug!(path = %path.display(), "Opened SQLite engine");

    Ok(pool)
}

/// Drop and recreate `tbl_a` and `tbl_b`, then seed one row into each
///
/// Runs in a single transaction: either both tables hold exactly the seed row
/// or nothing is committed. Safe to run repeatedly against the same database.
pub async fn provision_valid(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    recreate::<TableA>(&mut tx).await?;
    recreate::<TableB>(&mut tx).await?;

    let seed = SampleRow::seed();
    insert_row::<TableA>(&mut tx, &seed).await?;
    insert_row::<TableB>(&mut tx, &seed).await?;

    tx.commit().await?;

    info!("Provisioned tbl_a and tbl_b with seed row");

    Ok(())
}

/// Recreate `tbl_a` with a column of an unknown declared type and seed one value
///
/// SQLite tolerates unknown type names, so this usually commits; callers must
/// also handle an error here.
pub async fn provision_error(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    recreate::<NonexistentTypeTable>(&mut tx).await?;

    sqlx::query(NonexistentTypeTable::insert_sql())
        .bind(SEED_INTEGER)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("Provisioned malformed tbl_a");

    Ok(())
}

async fn recreate<T: FixtureTable>(tx: &mut Transaction<'_, Sqlite>) -> Result<()> {
    for stmt in T::setup_sql() {
        sqlx::query(stmt).execute(&mut **tx).await?;
    }
    Ok(())
}

// Values are bound, never interpolated; the blob must reach SQLite byte for byte.
async fn insert_row<T: FixtureTable>(tx: &mut Transaction<'_, Sqlite>, row: &SampleRow) -> Result<()> {
    sqlx::query(T::insert_sql())
        .bind(row.col_integer)
        .bind(row.col_text.as_deref())
        .bind(row.col_blob.as_deref())
        .bind(row.col_real)
        .execute(&mut **tx)
        .await?;

    debug!(table = T::NAME, "Inserted row");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::in_memory_engine;
    use rstest::*;

    async fn fetch_rows(pool: &SqlitePool, table: &str) -> Vec<SampleRow> {
        sqlx::query_as::<_, SampleRow>(&format!(
            "SELECT col_integer, col_text, col_blob, col_real FROM {table}"
        ))
        .fetch_all(pool)
        .await
        .expect("Failed to fetch rows")
    }

    #[test]
    fn test_provide_tempdir_is_stable() {
        assert_eq!(provide_tempdir(), provide_tempdir());
        assert!(provide_tempdir().is_absolute());
    }

    #[rstest]
    #[tokio::test]
    async fn test_provision_valid_seeds_both_tables(#[future] in_memory_engine: SqlitePool) {
        let pool = in_memory_engine.await;

        provision_valid(&pool)
            .await
            .expect("Failed to provision valid database");

        for table in ["tbl_a", "tbl_b"] {
            let rows = fetch_rows(&pool, table).await;
            assert_eq!(rows, vec![SampleRow::seed()], "unexpected rows in {table}");
        }
    }

    #[rstest]
    #[tokio::test]
    async fn test_provision_valid_is_idempotent(#[future] in_memory_engine: SqlitePool) {
        let pool = in_memory_engine.await;

        provision_valid(&pool).await.expect("First provision failed");

        sqlx::query("INSERT INTO tbl_b (col_integer) VALUES (?)")
            .bind(42_i64)
            .execute(&pool)
            .await
            .expect("Failed to insert extra row");

        provision_valid(&pool).await.expect("Second provision failed");

        assert_eq!(fetch_rows(&pool, "tbl_a").await.len(), 1);
        assert_eq!(fetch_rows(&pool, "tbl_b").await, vec![SampleRow::seed()]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_not_null_enforced_only_on_tbl_a(#[future] in_memory_engine: SqlitePool) {
        let pool = in_memory_engine.await;
        provision_valid(&pool).await.expect("Failed to provision");

        let result = sqlx::query("INSERT INTO tbl_a (col_integer, col_text) VALUES (?, ?)")
            .bind(None::<i64>)
            .bind("no integer")
            .execute(&pool)
            .await;
        assert!(result.is_err(), "tbl_a.col_integer should reject NULL");

        sqlx::query("INSERT INTO tbl_b (col_integer, col_text) VALUES (?, ?)")
            .bind(None::<i64>)
            .bind("no integer")
            .execute(&pool)
            .await
            .expect("tbl_b.col_integer should accept NULL");

        assert_eq!(fetch_rows(&pool, "tbl_b").await.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn test_provision_error_declares_unknown_type(#[future] in_memory_engine: SqlitePool) {
        let pool = in_memory_engine.await;

        provision_error(&pool)
            .await
            .expect("SQLite accepts unknown declared types");

        let declared: String =
            sqlx::query_scalar("SELECT type FROM pragma_table_info('tbl_a')")
                .fetch_one(&pool)
                .await
                .expect("Failed to read tbl_a schema");
        assert_eq!(declared, "NONEXISTENT");

        let result = sqlx::query("SELECT col_integer, col_text, col_blob, col_real FROM tbl_a")
            .fetch_all(&pool)
            .await;
        assert!(result.is_err(), "tbl_a no longer has the sample columns");
    }

    #[rstest]
    #[tokio::test]
    async fn test_provision_error_replaces_valid_tbl_a(#[future] in_memory_engine: SqlitePool) {
        let pool = in_memory_engine.await;

        provision_valid(&pool).await.expect("Failed to provision");
        provision_error(&pool).await.expect("Failed to provision malformed table");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tbl_a")
            .fetch_one(&pool)
            .await
            .expect("Failed to count rows");
        assert_eq!(count, 1);

        // tbl_b is left untouched
        assert_eq!(fetch_rows(&pool, "tbl_b").await, vec![SampleRow::seed()]);
    }

    #[tokio::test]
    async fn test_open_engine_missing_parent_fails() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("missing").join(VALID_DB_FILE);

        let result = open_engine(&path, &FixtureConfig::default()).await;

        assert!(result.is_err(), "parent directory does not exist");
    }
}
