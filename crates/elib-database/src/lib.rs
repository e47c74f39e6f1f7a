//! # elib-database
//!
//! PostgreSQL connection management and the repositories backing the
//! session service's user directory and session store.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::{SessionRepository, UserRepository};
