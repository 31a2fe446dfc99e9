//! Task infrastructure: application service and storage adapters

mod postgres_repository;
mod service;
mod sqlite_repository;

pub use postgres_repository::PostgresTaskRepository;
pub use service::TaskService;
pub use sqlite_repository::SqliteTaskRepository;
