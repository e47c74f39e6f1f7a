//! Password digest command.

use clap::Args;

use elib_auth::PasswordHasher;
use elib_core::config::{AppConfig, PasswordScheme};
use elib_core::error::AppError;

/// Arguments for the hash-password command
#[derive(Debug, Args)]
pub struct HashPasswordArgs {
    /// Plaintext password; prompted for when omitted
    pub password: Option<String>,

    /// Hash scheme, overriding `auth.password_scheme`
    #[arg(long, value_enum)]
    pub scheme: Option<SchemeArg>,
}

/// Hash scheme selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SchemeArg {
    /// Unsalted SHA-256, hex encoded
    Sha256,
    /// Argon2id PHC string
    Argon2id,
}

impl From<SchemeArg> for PasswordScheme {
    fn from(arg: SchemeArg) -> Self {
        match arg {
            SchemeArg::Sha256 => Self::Sha256,
            SchemeArg::Argon2id => Self::Argon2id,
        }
    }
}

/// Print the digest for the selected scheme
pub fn execute(args: &HashPasswordArgs, config: &AppConfig) -> Result<(), AppError> {
    let scheme = args
        .scheme
        .map(PasswordScheme::from)
        .unwrap_or(config.auth.password_scheme);

    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
    };

    println!("{}", PasswordHasher::new(scheme).hash_password(&password)?);
    Ok(())
}
