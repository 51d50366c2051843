//! User types.

use crate::{UserId, UserRole};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,

    /// Login email, unique across users.
    pub email: String,

    /// Salted password digest. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Access role.
    pub role: UserRole,

    /// When the user registered.
    pub created_at: DateTime<Utc>,

    /// When the user was last modified.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new User with an already hashed password.
    pub fn new(email: impl Into<String>, password_hash: impl Into<String>, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::generate(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the user has the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
