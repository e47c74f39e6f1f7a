//! Console output helpers for CLI commands.

use serde::Serialize;

use elib_core::error::AppError;

/// Print an item as pretty JSON on stdout.
pub fn print_json<T: Serialize>(item: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(item)?);
    Ok(())
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}
