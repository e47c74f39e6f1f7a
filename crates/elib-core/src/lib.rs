//! # elib-core
//!
//! Core crate for the library backend. Contains the unified error system
//! and the configuration schemas shared by every other crate.
//!
//! This crate has **no** internal dependencies on other workspace crates.

pub mod config;
pub mod error;
pub mod result;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
