//! Task repository trait

use async_trait::async_trait;

use super::Task;
use crate::domain::DomainError;

/// Repository trait for Task persistence
///
/// Every conforming adapter must honor the same contract: missing records
/// surface as `DomainError::NotFound`, create assigns a fresh identifier
/// with `created_at == updated_at`, and list operations return an empty
/// collection rather than an error when the store is empty.
#[async_trait]
pub trait TaskRepository: Send + Sync + std::fmt::Debug {
    /// Persist a new task, assigning its identifier and timestamps
    async fn create(&self, task: Task) -> Result<Task, DomainError>;

    /// Get a task by ID
    async fn get_by_id(&self, id: i64) -> Result<Task, DomainError>;

    /// Get all tasks
    async fn get_all(&self) -> Result<Vec<Task>, DomainError>;

    /// Update an existing task
    async fn update(&self, task: &Task) -> Result<Task, DomainError>;

    /// Delete a task by ID
    async fn delete(&self, id: i64) -> Result<(), DomainError>;

    /// Get tasks filtered by completion status, newest first
    async fn get_by_status(&self, completed: bool) -> Result<Vec<Task>, DomainError>;
}

/// In-memory implementation of TaskRepository
pub mod in_memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;

    /// In-memory implementation of TaskRepository for testing and development
    #[derive(Debug, Default)]
    pub struct InMemoryTaskRepository {
        tasks: Mutex<HashMap<i64, Task>>,
        next_id: AtomicI64,
    }

    impl InMemoryTaskRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl TaskRepository for InMemoryTaskRepository {
        async fn create(&self, task: Task) -> Result<Task, DomainError> {
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let now = chrono::Utc::now();
            let stored = Task::from_storage(
                id,
                task.title(),
                task.description(),
                task.completed(),
                now,
                now,
            );

            self.tasks.lock().unwrap().insert(id, stored.clone());
            Ok(stored)
        }

        async fn get_by_id(&self, id: i64) -> Result<Task, DomainError> {
            self.tasks
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or_else(|| DomainError::not_found(format!("Task with ID {} not found", id)))
        }

        async fn get_all(&self) -> Result<Vec<Task>, DomainError> {
            let mut tasks: Vec<Task> = self.tasks.lock().unwrap().values().cloned().collect();
            tasks.sort_by_key(Task::id);
            Ok(tasks)
        }

        async fn update(&self, task: &Task) -> Result<Task, DomainError> {
            let mut tasks = self.tasks.lock().unwrap();

            if !tasks.contains_key(&task.id()) {
                return Err(DomainError::not_found(format!(
                    "Task with ID {} not found",
                    task.id()
                )));
            }

            tasks.insert(task.id(), task.clone());
            Ok(task.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), DomainError> {
            if self.tasks.lock().unwrap().remove(&id).is_none() {
                return Err(DomainError::not_found(format!(
                    "Task with ID {} not found",
                    id
                )));
            }
            Ok(())
        }

        async fn get_by_status(&self, completed: bool) -> Result<Vec<Task>, DomainError> {
            let mut tasks: Vec<Task> = self
                .tasks
                .lock()
                .unwrap()
                .values()
                .filter(|t| t.completed() == completed)
                .cloned()
                .collect();

            tasks.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
            Ok(tasks)
        }
    }
}


#[cfg(test)]
mod tests {
    use super::in_memory::InMemoryTaskRepository;
    use super::*;

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let repo = InMemoryTaskRepository::new();

        let created = repo.create(Task::new("title", "description")).await.unwrap();

        assert!(created.id() > 0);
        assert_eq!(created.created_at(), created.updated_at());
    }

    #[tokio::test]
    async fn test_create_get_round_trip() {
        let repo = InMemoryTaskRepository::new();

        let created = repo.create(Task::new("title", "description")).await.unwrap();
        let fetched = repo.get_by_id(created.id()).await.unwrap();

        assert_eq!(fetched.title(), "title");
        assert_eq!(fetched.description(), "description");
        assert!(!fetched.completed());
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_not_found() {
        let repo = InMemoryTaskRepository::new();

        let err = repo.get_by_id(99).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let repo = InMemoryTaskRepository::new();
        let created = repo.create(Task::new("title", "description")).await.unwrap();

        let mut task = created.clone();
        task.update("changed", "");
        task.mark_completed();
        repo.update(&task).await.unwrap();

        let fetched = repo.get_by_id(created.id()).await.unwrap();
        assert_eq!(fetched.title(), "changed");
        assert_eq!(fetched.description(), "description");
        assert!(fetched.completed());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryTaskRepository::new();
        let task = Task::from_storage(
            41,
            "title",
            "description",
            false,
            chrono::Utc::now(),
            chrono::Utc::now(),
        );

        let err = repo.update(&task).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let repo = InMemoryTaskRepository::new();
        let created = repo.create(Task::new("title", "description")).await.unwrap();

        repo.delete(created.id()).await.unwrap();

        let err = repo.get_by_id(created.id()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let repo = InMemoryTaskRepository::new();

        let err = repo.delete(12).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_by_status_filters() {
        let repo = InMemoryTaskRepository::new();
        let first = repo.create(Task::new("first", "d")).await.unwrap();
        repo.create(Task::new("second", "d")).await.unwrap();

        let mut done = first.clone();
        done.mark_completed();
        repo.update(&done).await.unwrap();

        let completed = repo.get_by_status(true).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].title(), "first");

        let pending = repo.get_by_status(false).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title(), "second");
    }

    #[tokio::test]
    async fn test_get_by_status_empty_store_returns_empty_vec() {
        let repo = InMemoryTaskRepository::new();

        let tasks = repo.get_by_status(true).await.unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_get_all_empty_store_returns_empty_vec() {
        let repo = InMemoryTaskRepository::new();

        let tasks = repo.get_all().await.unwrap();
        assert!(tasks.is_empty());
    }
}
