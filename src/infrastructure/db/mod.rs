//! Database connections and schema bootstrap

pub mod schema;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::RunQueryDsl;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::domain::DomainError;

/// PostgreSQL connection pool shared by the Diesel-backed repositories
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// In-memory storage (for testing/development)
    Memory,
    /// SQLite storage (direct SQL, embedded file database)
    Sqlite,
    /// PostgreSQL storage (Diesel ORM)
    Postgres,
}

impl StorageBackend {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Some(Self::Memory),
            "sqlite" => Some(Self::Sqlite),
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            _ => None,
        }
    }
}

/// Create a PostgreSQL connection pool
pub fn create_postgres_pool(url: &str, max_connections: u32) -> Result<PgPool, DomainError> {
    let manager = ConnectionManager::<PgConnection>::new(url);

    Pool::builder()
        .max_size(max_connections)
        .build(manager)
        .map_err(|e| DomainError::storage(format!("Failed to create PostgreSQL pool: {}", e)))
}

/// Create the PostgreSQL tables if they do not exist yet
pub async fn ensure_postgres_schema(pool: &PgPool) -> Result<(), DomainError> {
    let pool = pool.clone();

    tokio::task::spawn_blocking(move || {
        let mut connection = pool
            .get()
            .map_err(|e| DomainError::storage(format!("Failed to get connection: {}", e)))?;

        diesel::sql_query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id BIGSERIAL PRIMARY KEY,
                title VARCHAR(255) NOT NULL,
                description TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT FALSE,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&mut connection)
        .map_err(|e| DomainError::storage(format!("Failed to create tasks table: {}", e)))?;

        diesel::sql_query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                username VARCHAR(50) NOT NULL UNIQUE,
                email VARCHAR(255) NOT NULL UNIQUE,
                password_hash VARCHAR(255) NOT NULL,
                first_name VARCHAR(100) NOT NULL,
                last_name VARCHAR(100) NOT NULL,
                active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&mut connection)
        .map_err(|e| DomainError::storage(format!("Failed to create users table: {}", e)))?;

        Ok(())
    })
    .await
    .map_err(|e| DomainError::internal(format!("Schema bootstrap task failed: {}", e)))?
}

/// Open (and create if missing) the SQLite database at the given path
pub async fn create_sqlite_pool(path: &str) -> Result<SqlitePool, DomainError> {
    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| DomainError::storage(format!("Failed to create data directory: {}", e)))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to open SQLite database: {}", e)))?;

    ensure_sqlite_schema(&pool).await?;
    info!(path = %path, "SQLite database ready");

    Ok(pool)
}

/// Create the SQLite tasks table if it does not exist yet
pub async fn ensure_sqlite_schema(pool: &SqlitePool) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            completed BOOLEAN NOT NULL DEFAULT FALSE,
            created_at DATETIME NOT NULL,
            updated_at DATETIME NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::storage(format!("Failed to create tasks table: {}", e)))?;

    Ok(())
}
