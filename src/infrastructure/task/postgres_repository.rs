//! PostgreSQL task repository implementation (Diesel ORM)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;

use crate::domain::{DomainError, Task, TaskRepository};
use crate::infrastructure::db::schema::tasks;
use crate::infrastructure::db::PgPool;

/// Query result row for task records
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct TaskRow {
    id: i64,
    title: String,
    description: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TaskRow> for Task {
    fn from(row: TaskRow) -> Self {
        Task::from_storage(
            row.id,
            row.title,
            row.description,
            row.completed,
            row.created_at,
            row.updated_at,
        )
    }
}

/// Insert model for task records
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
struct NewTaskRow {
    title: String,
    description: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// PostgreSQL implementation of TaskRepository
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run a Diesel operation on the blocking thread pool
    ///
    /// Diesel connections are synchronous; dropping the returned future
    /// abandons the result without blocking the async runtime.
    async fn run_blocking<F, T>(&self, f: F) -> Result<T, DomainError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, DomainError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();

        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(|e| DomainError::storage(format!("Failed to get connection: {}", e)))?;
            f(&mut connection)
        })
        .await
        .map_err(|e| DomainError::internal(format!("Blocking task join error: {}", e)))?
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn create(&self, task: Task) -> Result<Task, DomainError> {
        let now = Utc::now();
        let new_row = NewTaskRow {
            title: task.title().to_string(),
            description: task.description().to_string(),
            completed: task.completed(),
            created_at: now,
            updated_at: now,
        };

        self.run_blocking(move |connection| {
            let row: TaskRow = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result(connection)
                .map_err(|e| DomainError::storage(format!("Failed to insert task: {}", e)))?;

            Ok(row.into())
        })
        .await
    }

    async fn get_by_id(&self, id: i64) -> Result<Task, DomainError> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id)
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(|e| DomainError::storage(format!("Failed to get task: {}", e)))?;

            row.map(Task::from)
                .ok_or_else(|| DomainError::not_found(format!("Task with ID {} not found", id)))
        })
        .await
    }

    async fn get_all(&self) -> Result<Vec<Task>, DomainError> {
        self.run_blocking(|connection| {
            let rows = tasks::table
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(|e| DomainError::storage(format!("Failed to list tasks: {}", e)))?;

            Ok(rows.into_iter().map(Task::from).collect())
        })
        .await
    }

    async fn update(&self, task: &Task) -> Result<Task, DomainError> {
        let id = task.id();
        let title = task.title().to_string();
        let description = task.description().to_string();
        let completed = task.completed();
        let updated_at = task.updated_at();
        let result = task.clone();

        self.run_blocking(move |connection| {
            let affected = diesel::update(tasks::table.find(id))
                .set((
                    tasks::title.eq(title),
                    tasks::description.eq(description),
                    tasks::completed.eq(completed),
                    tasks::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(|e| DomainError::storage(format!("Failed to update task: {}", e)))?;

            if affected == 0 {
                return Err(DomainError::not_found(format!(
                    "Task with ID {} not found",
                    id
                )));
            }

            Ok(result)
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(tasks::table.find(id))
                .execute(connection)
                .map_err(|e| DomainError::storage(format!("Failed to delete task: {}", e)))?;

            if affected == 0 {
                return Err(DomainError::not_found(format!(
                    "Task with ID {} not found",
                    id
                )));
            }

            Ok(())
        })
        .await
    }

    async fn get_by_status(&self, completed: bool) -> Result<Vec<Task>, DomainError> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::completed.eq(completed))
                .order(tasks::created_at.desc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(|e| {
                    DomainError::storage(format!("Failed to get tasks by status: {}", e))
                })?;

            Ok(rows.into_iter().map(Task::from).collect())
        })
        .await
    }
}
