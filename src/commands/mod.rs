//! CLI command definitions and dispatch.

pub mod hash_password;
pub mod migrate;
pub mod session;

use clap::{Parser, Subcommand};
use tracing::warn;

use elib_core::config::AppConfig;
use elib_core::error::AppError;
use elib_database::{DatabasePool, UserRepository};
use elib_entity::user::UserRole;

/// elib — library backend administration
#[derive(Debug, Parser)]
#[command(name = "elib", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay, read from `config/{env}.toml`
    #[arg(short, long, env = "ELIB_ENV")]
    pub env: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run pending database migrations
    Migrate,
    /// Print the stored digest of a password
    HashPassword(hash_password::HashPasswordArgs),
    /// Log in, refresh, or log out a session
    Session(session::SessionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate => migrate::execute(config).await,
            Commands::HashPassword(args) => hash_password::execute(args, config),
            Commands::Session(args) => session::execute(args, config).await,
        }
    }
}

/// Helper: connect to the configured database
pub async fn connect(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Warn about stored role names that would sign tokens as student.
pub async fn check_role_catalog(users: &UserRepository) -> Result<(), AppError> {
    let names = users.role_names().await?;
    for unknown in UserRole::check_catalog(names.iter().map(String::as_str)) {
        warn!(role = %unknown, "Stored role is not recognised and will be treated as student");
    }
    Ok(())
}
