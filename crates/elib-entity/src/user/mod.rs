//! User domain entities.

pub mod model;
pub mod role;

pub use model::{Credentials, User, UserCredentials};
pub use role::UserRole;
