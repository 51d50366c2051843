//! Shared application state.

use std::sync::Arc;

use crate::config::Config;
use crate::service::{AuthService, TaskService};
use crate::store::{InMemoryTaskStore, InMemoryUserStore, TaskStore};
use crate::worker::WorkerService;

/// Shared application state.
pub struct AppState {
    pub config: Config,

    /// Task persistence, also used for metrics.
    pub tasks: Arc<dyn TaskStore>,

    pub task_service: TaskService,

    pub auth: AuthService,

    /// Auto-completion worker. Started separately, see [`WorkerService::start`].
    pub worker: WorkerService,
}

impl AppState {
    /// Create state over fresh in-memory stores, wrapped in Arc.
    pub fn new(config: Config) -> Arc<Self> {
        let tasks = Arc::new(InMemoryTaskStore::new());
        let users = Arc::new(InMemoryUserStore::new());

        let worker = WorkerService::new(tasks.clone(), config.worker_config());
        let task_service = TaskService::new(tasks.clone(), worker.clone());
        let auth = AuthService::new(users, config.token_expiry_hours, config.password_cost);

        Arc::new(Self {
            config,
            tasks,
            task_service,
            auth,
            worker,
        })
    }
}
