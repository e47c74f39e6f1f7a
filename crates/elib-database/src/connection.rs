//! PostgreSQL pool shared by the user and session repositories.

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::{debug, info};

use elib_core::config::DatabaseConfig;
use elib_core::error::{AppError, ErrorKind};

/// Pool handle owned by a CLI command for its lifetime.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Parses the configured URL and opens the pool.
    ///
    /// Only host and database name are logged; credentials in the URL are
    /// never written out.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let options: PgConnectOptions = config.url.parse().map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                "database.url is not a PostgreSQL URL",
                e,
            )
        })?;

        info!(
            host = options.get_host(),
            database = options.get_database().unwrap_or("<default>"),
            pool_size = config.pool_size,
            "Opening session store pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(config.acquire_timeout())
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, format!("database unreachable: {e}"), e)
                    .context("open session store")
            })?;

        Ok(Self { pool })
    }

    /// The underlying sqlx pool, for repositories and migrations.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Waits for in-flight queries and closes every connection.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("Session store pool closed");
    }
}

#[cfg(test)]
mod tests {
    use elib_core::config::DatabaseConfig;
    use elib_core::error::ErrorKind;

    use super::*;

    #[tokio::test]
    async fn test_malformed_url_is_a_configuration_error() {
        let config = DatabaseConfig {
            url: "not a database url".to_string(),
            pool_size: 1,
            acquire_timeout_seconds: 1,
        };

        let err = DatabasePool::connect(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(!err.message.contains("not a database url"));
    }
}
