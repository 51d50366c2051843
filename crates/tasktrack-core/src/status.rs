//! Status enums for Tasks and Users.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Status of a Task.
///
/// Allowed transitions: `Pending -> InProgress -> Completed` and
/// `Pending -> Completed`. `Completed` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task created, no work started.
    #[default]
    Pending,
    /// Owner has started working on the task.
    InProgress,
    /// Task is done, either by its owner or by auto-completion.
    Completed,
}

impl TaskStatus {
    /// Returns true if the task can no longer change status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Returns true if moving from `self` to `next` is allowed.
    ///
    /// Re-asserting the current status is accepted as a no-op.
    pub fn can_transition_to(&self, next: TaskStatus) -> bool {
        if *self == next {
            return true;
        }
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::Pending, Self::Completed)
                | (Self::InProgress, Self::Completed)
        )
    }

    /// Wire name of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// All statuses, in lifecycle order.
    pub fn all() -> [TaskStatus; 3] {
        [Self::Pending, Self::InProgress, Self::Completed]
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(CoreError::InvalidStatus(other.to_string())),
        }
    }
}

/// Role of a User.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Sees and manages only their own tasks.
    #[default]
    User,
    /// Sees and manages every task.
    Admin,
}

impl UserRole {
    /// Parse a requested role; anything other than `admin` is a regular user.
    pub fn from_requested(role: Option<&str>) -> Self {
        match role {
            Some("admin") => Self::Admin,
            _ => Self::User,
        }
    }
}
