//! Session smoke-check commands.

use std::sync::Arc;

use clap::{Args, Subcommand};

use elib_auth::SessionService;
use elib_core::config::AppConfig;
use elib_core::error::AppError;
use elib_database::{SessionRepository, UserRepository};
use elib_entity::user::Credentials;

use crate::output;

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Log in and print the token pair
    Login {
        /// Login name
        #[arg(short, long)]
        username: String,
        /// Password; prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Exchange a refresh token for a new token pair
    Refresh {
        /// Refresh token
        token: String,
    },
    /// End the session bound to a refresh token
    Logout {
        /// Refresh token
        token: String,
    },
}

/// Execute session commands
pub async fn execute(args: &SessionArgs, config: &AppConfig) -> Result<(), AppError> {
    let pool = super::connect(config).await?;
    let users = UserRepository::new(pool.pool().clone());
    let sessions = SessionRepository::new(pool.pool().clone());

    super::check_role_catalog(&users).await?;

    let service = SessionService::new(Arc::new(users), Arc::new(sessions), &config.auth);

    let result = match &args.command {
        SessionCommand::Login { username, password } => {
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
            };
            let pair = service
                .create(&Credentials::new(username.as_str(), password))
                .await;
            pair.and_then(|p| output::print_json(&p))
        }
        SessionCommand::Refresh { token } => service
            .update(token)
            .await
            .and_then(|p| output::print_json(&p)),
        SessionCommand::Logout { token } => service.delete(token).await.map(|()| {
            output::print_success("Logged out.");
        }),
    };

    pool.close().await;
    result
}
