//! # elib-entity
//!
//! Domain entity models for the library backend. Every struct in this crate
//! represents a database table row or a domain value object. Database rows
//! additionally derive `sqlx::FromRow`.

pub mod session;
pub mod user;
