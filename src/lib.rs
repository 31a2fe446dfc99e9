//! Task Manager API
//!
//! A CRUD service for tasks and users built as a layered
//! (ports-and-adapters) application:
//! - `domain`: entities, validity rules, and repository ports
//! - `infrastructure`: application services and storage adapters
//!   (direct-SQL SQLite, Diesel PostgreSQL, in-memory)
//! - `api`: axum transport
//! - `config`: startup configuration

pub mod api;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::{info, warn};

use api::state::AppState;
use domain::task::InMemoryTaskRepository;
use domain::user::InMemoryUserRepository;
use domain::{TaskRepository, UserRepository};
use infrastructure::db::{self, StorageBackend};
use infrastructure::task::{PostgresTaskRepository, SqliteTaskRepository, TaskService};
use infrastructure::user::{Argon2Hasher, PostgresUserRepository, UserService};

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state, wiring the repositories selected by config
///
/// The repositories are chosen here, once, at startup; services only ever
/// see the port abstraction.
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let backend = StorageBackend::from_str(&config.database.backend).ok_or_else(|| {
        anyhow::anyhow!("Unknown database backend: {}", config.database.backend)
    })?;

    info!("Database backend: {:?}", backend);

    let (task_repository, user_repository): (Arc<dyn TaskRepository>, Arc<dyn UserRepository>) =
        match backend {
            StorageBackend::Memory => {
                let task_repository: Arc<dyn TaskRepository> =
                    Arc::new(InMemoryTaskRepository::new());
                let user_repository: Arc<dyn UserRepository> =
                    Arc::new(InMemoryUserRepository::new());
                (task_repository, user_repository)
            }
            StorageBackend::Sqlite => {
                let sqlite_pool = db::create_sqlite_pool(&config.database.sqlite_path).await?;
                let task_repository: Arc<dyn TaskRepository> =
                    Arc::new(SqliteTaskRepository::new(sqlite_pool));

                let user_repository: Arc<dyn UserRepository> = match &config.database.url {
                    Some(url) => {
                        let pg_pool =
                            db::create_postgres_pool(url, config.database.max_connections)?;
                        db::ensure_postgres_schema(&pg_pool).await?;
                        Arc::new(PostgresUserRepository::new(pg_pool))
                    }
                    None => {
                        warn!(
                            "No database URL configured; user accounts will not survive restarts"
                        );
                        Arc::new(InMemoryUserRepository::new())
                    }
                };

                (task_repository, user_repository)
            }
            StorageBackend::Postgres => {
                let url = config.database.url.as_deref().ok_or_else(|| {
                    anyhow::anyhow!("database.url is required for the postgres backend")
                })?;
                let pg_pool = db::create_postgres_pool(url, config.database.max_connections)?;
                db::ensure_postgres_schema(&pg_pool).await?;

                let task_repository: Arc<dyn TaskRepository> =
                    Arc::new(PostgresTaskRepository::new(pg_pool.clone()));
                let user_repository: Arc<dyn UserRepository> =
                    Arc::new(PostgresUserRepository::new(pg_pool));
                (task_repository, user_repository)
            }
        };

    let task_service = Arc::new(TaskService::new(task_repository));
    let user_service = Arc::new(UserService::new(
        user_repository,
        Arc::new(Argon2Hasher::new()),
    ));

    Ok(AppState::new(task_service, user_service))
}
