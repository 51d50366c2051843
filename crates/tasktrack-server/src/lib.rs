//! tasktrack server library
//!
//! Multi-user task tracking over HTTP, with a background worker that
//! auto-completes tasks left open past a grace period.

pub mod config;
pub mod crypto;
pub mod http;
pub mod metrics;
pub mod service;
pub mod state;
pub mod store;
pub mod worker;

pub use config::{Config, ConfigError};
pub use service::{AuthService, ServiceError, Session, TaskService};
pub use state::AppState;
pub use worker::{WorkerConfig, WorkerHandle, WorkerService};
