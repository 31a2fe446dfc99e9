//! SQLite task repository implementation (direct SQL)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use crate::domain::{DomainError, Task, TaskRepository};

/// SQLite implementation of TaskRepository
#[derive(Debug, Clone)]
pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn create(&self, task: Task) -> Result<Task, DomainError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO tasks (title, description, completed, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(task.title())
        .bind(task.description())
        .bind(task.completed())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to insert task: {}", e)))?;

        let id = result.last_insert_rowid();

        Ok(Task::from_storage(
            id,
            task.title(),
            task.description(),
            task.completed(),
            now,
            now,
        ))
    }

    async fn get_by_id(&self, id: i64) -> Result<Task, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT id, title, description, completed, created_at, updated_at
            FROM tasks
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get task: {}", e)))?;

        match row {
            Some(row) => row_to_task(&row),
            None => Err(DomainError::not_found(format!(
                "Task with ID {} not found",
                id
            ))),
        }
    }

    async fn get_all(&self) -> Result<Vec<Task>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, completed, created_at, updated_at
            FROM tasks
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list tasks: {}", e)))?;

        rows.iter().map(row_to_task).collect()
    }

    async fn update(&self, task: &Task) -> Result<Task, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, description = ?, completed = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(task.title())
        .bind(task.description())
        .bind(task.completed())
        .bind(task.updated_at())
        .bind(task.id())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to update task: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Task with ID {} not found",
                task.id()
            )));
        }

        Ok(task.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete task: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Task with ID {} not found",
                id
            )));
        }

        Ok(())
    }

    async fn get_by_status(&self, completed: bool) -> Result<Vec<Task>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, completed, created_at, updated_at
            FROM tasks
            WHERE completed = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(completed)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to get tasks by status: {}", e)))?;

        rows.iter().map(row_to_task).collect()
    }
}

fn row_to_task(row: &SqliteRow) -> Result<Task, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Invalid id column: {}", e)))?;
    let title: String = row
        .try_get("title")
        .map_err(|e| DomainError::storage(format!("Invalid title column: {}", e)))?;
    let description: String = row
        .try_get("description")
        .map_err(|e| DomainError::storage(format!("Invalid description column: {}", e)))?;
    let completed: bool = row
        .try_get("completed")
        .map_err(|e| DomainError::storage(format!("Invalid completed column: {}", e)))?;
    let created_at: DateTime<Utc> = row
        .try_get("created_at")
        .map_err(|e| DomainError::storage(format!("Invalid created_at column: {}", e)))?;
    let updated_at: DateTime<Utc> = row
        .try_get("updated_at")
        .map_err(|e| DomainError::storage(format!("Invalid updated_at column: {}", e)))?;

    Ok(Task::from_storage(
        id,
        title,
        description,
        completed,
        created_at,
        updated_at,
    ))
}
