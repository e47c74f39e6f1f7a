//! Session entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A login session.
///
/// Created on login and ended on logout or on an unrecoverable refresh
/// failure. An ended session never accepts another refresh.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Unique session identifier.
    #[sqlx(rename = "session_id")]
    pub id: i64,
    /// The user this session belongs to.
    pub user_id: i64,
    /// When the session was created (login time).
    pub created_at: DateTime<Utc>,
    /// When the session was ended, `None` while it is active.
    pub logged_out_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Check whether the session is still active.
    pub fn is_active(&self) -> bool {
        self.logged_out_at.is_none()
    }
}
