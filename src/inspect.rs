//! Read-only queries for checking what a fixture left on disk.

use sqlx::SqlitePool;
use sqlx::prelude::FromRow;

use crate::error::{Result, TestbedError};
use crate::schema::{ColumnType, SampleRow};

/// One entry of `pragma_table_info`
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct ColumnInfo {
    pub cid: i64,
    pub name: String,
    #[sqlx(rename = "type")]
    pub declared_type: String,
    #[sqlx(rename = "notnull")]
    pub not_null: bool,
    pub dflt_value: Option<String>,
    pub pk: i64,
}

impl ColumnInfo {
    pub fn column_type(&self) -> Option<ColumnType> {
        ColumnType::from_declared(&self.declared_type)
    }
}

pub async fn table_exists(pool: &SqlitePool, table: &str) -> Result<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_one(pool)
            .await?;

    Ok(count > 0)
}

/// Columns of `table` in declaration order
pub async fn table_columns(pool: &SqlitePool, table: &str) -> Result<Vec<ColumnInfo>> {
    let columns = sqlx::query_as::<_, ColumnInfo>(
        r#"SELECT cid, name, type, "notnull", dflt_value, pk FROM pragma_table_info(?) ORDER BY cid"#,
    )
    .bind(table)
    .fetch_all(pool)
    .await?;

    if columns.is_empty() {
        return Err(TestbedError::TableNotFound(table.to_string()));
    }

    Ok(columns)
}

/// True when every column of `table` declares INTEGER, TEXT, BLOB or REAL
pub async fn has_valid_column_types(pool: &SqlitePool, table: &str) -> Result<bool> {
    let columns = table_columns(pool, table).await?;
    Ok(columns.iter().all(|c| c.column_type().is_some()))
}

pub async fn row_count(pool: &SqlitePool, table: &str) -> Result<i64> {
    if !table_exists(pool, table).await? {
        return Err(TestbedError::TableNotFound(table.to_string()));
    }

    // Identifiers cannot be bound; the name was checked against sqlite_master above.
    let count: i64 = sqlx::query_scalar(&format!(r#"SELECT COUNT(*) FROM "{table}""#))
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// All rows of a `tbl_a`/`tbl_b`-shaped table
pub async fn fetch_sample_rows(pool: &SqlitePool, table: &str) -> Result<Vec<SampleRow>> {
    if !table_exists(pool, table).await? {
        return Err(TestbedError::TableNotFound(table.to_string()));
    }

    let rows = sqlx::query_as::<_, SampleRow>(&format!(
        r#"SELECT col_integer, col_text, col_blob, col_real FROM "{table}" ORDER BY rowid"#
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
