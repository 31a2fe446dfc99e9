//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::task::TaskService;
use crate::infrastructure::user::UserService;

/// Application state carrying the services every handler needs
///
/// Constructed once at startup and cloned per request by axum.
#[derive(Clone)]
pub struct AppState {
    pub task_service: Arc<TaskService>,
    pub user_service: Arc<UserService>,
}

impl AppState {
    /// Create the application state from already-wired services
    pub fn new(task_service: Arc<TaskService>, user_service: Arc<UserService>) -> Self {
        Self {
            task_service,
            user_service,
        }
    }
}
