//! Database migration command.

use elib_core::config::AppConfig;
use elib_core::error::AppError;

use crate::output;

/// Apply all pending migrations
pub async fn execute(config: &AppConfig) -> Result<(), AppError> {
    let pool = super::connect(config).await?;

    elib_database::migration::run_migrations(pool.pool())
        .await
        .map_err(|e| e.context("migrate"))?;
    pool.close().await;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
