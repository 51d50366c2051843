//! tasktrack Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Storage
//! - Runtime specifics
//!
//! All types here represent the core business domain of tasktrack.

pub mod error;
pub mod ids;
pub mod status;
pub mod task;
pub mod user;
pub mod validate;

// Re-export commonly used types
pub use error::CoreError;
pub use ids::{TaskId, UserId};
pub use status::{TaskStatus, UserRole};
pub use task::{NewTask, Task, TaskFilter, TaskPatch};
pub use user::User;
