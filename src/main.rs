use std::path::PathBuf;

use anyhow::Context;
use sqlite_testbed::FixtureConfig;
use sqlite_testbed::inspect::{has_valid_column_types, row_count};
use sqlite_testbed::provider::{ERROR_DB_FILE, VALID_DB_FILE, open_engine, provision_error, provision_valid};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = FixtureConfig::from_env().context("Failed to load configuration")?;

    // Output directory: first argument, otherwise the configured root
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.root.clone());

    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let valid_path = out_dir.join(VALID_DB_FILE);
    let pool = open_engine(&valid_path, &config)
        .await
        .with_context(|| format!("Failed to open {}", valid_path.display()))?;
    provision_valid(&pool).await.context("Failed to provision sample database")?;
    println!(
        "{}: tbl_a={} row(s), tbl_b={} row(s)",
        valid_path.display(),
        row_count(&pool, "tbl_a").await?,
        row_count(&pool, "tbl_b").await?
    );
    pool.close().await;

    let error_path = out_dir.join(ERROR_DB_FILE);
    let pool = open_engine(&error_path, &config)
        .await
        .with_context(|| format!("Failed to open {}", error_path.display()))?;
    match provision_error(&pool).await {
        Ok(()) => println!(
            "{}: tbl_a valid column types = {}",
            error_path.display(),
            has_valid_column_types(&pool, "tbl_a").await?
        ),
        Err(e) => println!("{}: setup failed: {}", error_path.display(), e),
    }
    pool.close().await;

    Ok(())
}
