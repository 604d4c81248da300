//! Acting identities
//!
//! Every engine action is performed by an [`Actor`]. The platform role decides
//! moderator powers; party-specific powers (claimant, respondent, responsible
//! party, counterpart) are derived from the target entity.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::identifiers::UserId;

/// Platform role of an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Marketplace client or provider
    User,
    /// Dispute moderator
    Moderator,
    /// Administrator; holds moderator powers
    Admin,
}

impl Role {
    /// Returns true if this role may perform moderator actions
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Moderator | Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" | "client" | "provider" => Ok(Role::User),
            "moderator" => Ok(Role::Moderator),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// The identity performing an action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: Role,
    pub email: String,
}

impl Actor {
    pub fn new(user_id: UserId, role: Role, email: impl Into<String>) -> Self {
        Self {
            user_id,
            role,
            email: email.into(),
        }
    }

    /// Creates a marketplace user actor
    pub fn user(user_id: UserId, email: impl Into<String>) -> Self {
        Self::new(user_id, Role::User, email)
    }

    /// Creates a moderator actor
    pub fn moderator(user_id: UserId, email: impl Into<String>) -> Self {
        Self::new(user_id, Role::Moderator, email)
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.user_id, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_is_staff() {
        assert!(Role::Admin.is_staff());
        assert!(Role::Moderator.is_staff());
        assert!(!Role::User.is_staff());
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Moderator".parse::<Role>().unwrap(), Role::Moderator);
        assert_eq!("provider".parse::<Role>().unwrap(), Role::User);
        assert!("auditor".parse::<Role>().is_err());
    }
}
