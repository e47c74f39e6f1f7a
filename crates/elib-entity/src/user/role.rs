//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Roles available to library users.
///
/// Ordered by privilege level: Admin > Manager > Teacher > Student. The
/// ordinal is what access tokens carry in their `role` claim.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Lowest privilege; also the fallback for unknown role names.
    #[default]
    Student,
    /// Teaching staff.
    Teacher,
    /// Department manager.
    Manager,
    /// Full system administrator.
    Admin,
}

impl UserRole {
    /// Every role, lowest privilege first.
    pub const ALL: [UserRole; 4] = [Self::Student, Self::Teacher, Self::Manager, Self::Admin];

    /// Return the privilege ordinal (higher = more privileged).
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::Student => 0,
            Self::Teacher => 1,
            Self::Manager => 2,
            Self::Admin => 3,
        }
    }

    /// Inverse of [`UserRole::ordinal`].
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.ordinal() == ordinal)
    }

    /// Look up a role by its stored name. Names are matched exactly.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "student" => Some(Self::Student),
            "teacher" => Some(Self::Teacher),
            "manager" => Some(Self::Manager),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Resolve a stored role name, falling back to the lowest privilege.
    ///
    /// Unknown names never grant more than [`UserRole::Student`].
    pub fn resolve(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            warn!(role = %name, "Unknown role name, falling back to student");
            Self::default()
        })
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &UserRole) -> bool {
        self.ordinal() >= other.ordinal()
    }

    /// Returns the stored names that would fall back to the default role.
    pub fn check_catalog<'a, I>(names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter(|name| Self::from_name(name).is_none())
            .map(str::to_string)
            .collect()
    }

    /// Return the role as its stored lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Manager => "manager",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = elib_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| {
            elib_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: student, teacher, manager, admin"
            ))
        })
    }
}
