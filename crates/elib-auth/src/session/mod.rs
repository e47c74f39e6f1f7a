//! Session lifecycle and the storage contracts it depends on.

pub mod directory;
pub mod memory;
pub mod service;
pub mod store;

pub use directory::UserDirectory;
pub use memory::{MemorySessionStore, MemoryUserDirectory};
pub use service::SessionService;
pub use store::SessionStore;
