//! Task service - use-case orchestration for tasks

use std::sync::Arc;

use crate::domain::{DomainError, Task, TaskRepository};

/// Task service for CRUD operations
///
/// Holds the repository port by abstraction only; the concrete adapter is
/// chosen at wiring time.
#[derive(Debug)]
pub struct TaskService {
    repository: Arc<dyn TaskRepository>,
}

impl TaskService {
    /// Create a new TaskService with the given repository
    pub fn new(repository: Arc<dyn TaskRepository>) -> Self {
        Self { repository }
    }

    /// Create a new task
    pub async fn create_task(
        &self,
        title: &str,
        description: &str,
    ) -> Result<Task, DomainError> {
        if title.is_empty() {
            return Err(DomainError::validation("title is required"));
        }
        if description.is_empty() {
            return Err(DomainError::validation("description is required"));
        }

        let task = Task::new(title, description);

        if !task.is_valid() {
            return Err(DomainError::validation("task is not valid"));
        }

        self.repository
            .create(task)
            .await
            .map_err(|e| e.context("could not create task"))
    }

    /// Get a task by its ID
    pub async fn get_task_by_id(&self, id: i64) -> Result<Task, DomainError> {
        if id == 0 {
            return Err(DomainError::validation("task ID cannot be zero"));
        }

        self.repository
            .get_by_id(id)
            .await
            .map_err(|e| e.context(format!("could not get task with ID {}", id)))
    }

    /// Get all tasks
    pub async fn get_all_tasks(&self) -> Result<Vec<Task>, DomainError> {
        self.repository
            .get_all()
            .await
            .map_err(|e| e.context("could not get tasks"))
    }

    /// Update an existing task
    ///
    /// Empty title/description leave the stored values unchanged; the
    /// completed flag is applied only when explicitly provided, so a
    /// missing flag is distinguishable from an explicit `false`.
    pub async fn update_task(
        &self,
        id: i64,
        title: &str,
        description: &str,
        completed: Option<bool>,
    ) -> Result<Task, DomainError> {
        if id == 0 {
            return Err(DomainError::validation("task ID is required"));
        }

        let mut task = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| e.context(format!("could not find task with ID {}", id)))?;

        task.update(title, description);

        match completed {
            Some(true) => task.mark_completed(),
            Some(false) => task.mark_uncompleted(),
            None => {}
        }

        if !task.is_valid() {
            return Err(DomainError::validation("updated task is not valid"));
        }

        self.repository
            .update(&task)
            .await
            .map_err(|e| e.context(format!("could not update task with ID {}", id)))
    }

    /// Delete a task by its ID
    ///
    /// Existence is verified first so a missing task surfaces as the
    /// lookup's not-found error rather than a delete failure.
    pub async fn delete_task(&self, id: i64) -> Result<(), DomainError> {
        if id == 0 {
            return Err(DomainError::validation("task ID is required"));
        }

        self.repository
            .get_by_id(id)
            .await
            .map_err(|e| e.context(format!("could not find task with ID {}", id)))?;

        self.repository
            .delete(id)
            .await
            .map_err(|e| e.context(format!("could not delete task with ID {}", id)))
    }

    /// Get tasks filtered by completion status
    ///
    /// Ordering is the repository's concern (newest first in the shipped
    /// adapters); the service passes the result through.
    pub async fn get_tasks_by_status(&self, completed: bool) -> Result<Vec<Task>, DomainError> {
        self.repository
            .get_by_status(completed)
            .await
            .map_err(|e| e.context(format!("could not get tasks with completed={}", completed)))
    }

    /// Mark a task as completed
    pub async fn mark_task_completed(&self, id: i64) -> Result<Task, DomainError> {
        self.set_completion(id, true).await
    }

    /// Mark a task as not completed
    pub async fn mark_task_uncompleted(&self, id: i64) -> Result<Task, DomainError> {
        self.set_completion(id, false).await
    }

    async fn set_completion(&self, id: i64, completed: bool) -> Result<Task, DomainError> {
        if id == 0 {
            return Err(DomainError::validation("task ID is required"));
        }

        let mut task = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| e.context(format!("could not find task with ID {}", id)))?;

        if completed {
            task.mark_completed();
        } else {
            task.mark_uncompleted();
        }

        self.repository
            .update(&task)
            .await
            .map_err(|e| e.context(format!("could not update task with ID {}", id)))
    }
}
