//! Task entity

use chrono::{DateTime, Utc};

/// A task tracked by the system
///
/// A freshly constructed task has no identity (`id == 0`); the storage
/// adapter assigns the identifier and the persisted timestamps on create.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    id: i64,
    title: String,
    description: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Create a new task with no identity yet
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();

        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            completed: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rehydrate a task from a persisted row
    pub fn from_storage(
        id: i64,
        title: impl Into<String>,
        description: impl Into<String>,
        completed: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            completed,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Mark the task as completed
    pub fn mark_completed(&mut self) {
        self.completed = true;
        self.touch();
    }

    /// Mark the task as not completed
    pub fn mark_uncompleted(&mut self) {
        self.completed = false;
        self.touch();
    }

    /// Partially update title and description
    ///
    /// An empty incoming value means "leave unchanged"; `updated_at` is
    /// refreshed regardless of whether any field actually changed.
    pub fn update(&mut self, title: impl Into<String>, description: impl Into<String>) {
        let title = title.into();
        let description = description.into();

        if !title.is_empty() {
            self.title = title;
        }
        if !description.is_empty() {
            self.description = description;
        }
        self.touch();
    }

    /// Check that the task has its required fields
    ///
    /// Whitespace-only strings count as non-empty.
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sleep_briefly() {
        // Ensure successive timestamps differ
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    #[test]
    fn test_new_task_defaults() {
        let task = Task::new("Buy groceries", "Milk, eggs, bread");

        assert_eq!(task.id(), 0);
        assert_eq!(task.title(), "Buy groceries");
        assert_eq!(task.description(), "Milk, eggs, bread");
        assert!(!task.completed());
        assert_eq!(task.created_at(), task.updated_at());
    }

    #[test]
    fn test_is_valid() {
        assert!(Task::new("a", "b").is_valid());
        assert!(!Task::new("", "b").is_valid());
        assert!(!Task::new("a", "").is_valid());
        assert!(!Task::new("", "").is_valid());
    }

    #[test]
    fn test_whitespace_only_fields_are_valid() {
        // Intentional: validity only checks for the empty string
        assert!(Task::new("   ", "b").is_valid());
        assert!(Task::new("a", "\t").is_valid());
    }

    #[test]
    fn test_mark_completed_advances_updated_at() {
        let mut task = Task::new("title", "description");
        let before = task.updated_at();

        sleep_briefly();
        task.mark_completed();

        assert!(task.completed());
        assert!(task.updated_at() > before);
    }

    #[test]
    fn test_mark_completed_then_uncompleted_ends_false() {
        let mut task = Task::new("title", "description");
        let initial = task.updated_at();

        sleep_briefly();
        task.mark_completed();
        let after_completed = task.updated_at();

        sleep_briefly();
        task.mark_uncompleted();

        assert!(!task.completed());
        assert!(after_completed > initial);
        assert!(task.updated_at() > after_completed);
    }

    #[test]
    fn test_update_replaces_non_empty_fields() {
        let mut task = Task::new("old title", "old description");

        task.update("new title", "new description");

        assert_eq!(task.title(), "new title");
        assert_eq!(task.description(), "new description");
    }

    #[test]
    fn test_update_keeps_fields_on_empty_input() {
        let mut task = Task::new("old title", "old description");
        let before = task.updated_at();

        sleep_briefly();
        task.update("", "");

        assert_eq!(task.title(), "old title");
        assert_eq!(task.description(), "old description");
        assert!(task.updated_at() > before);
    }

    #[test]
    fn test_update_partial_title_only() {
        let mut task = Task::new("old title", "old description");

        task.update("new title", "");

        assert_eq!(task.title(), "new title");
        assert_eq!(task.description(), "old description");
    }

    #[test]
    fn test_from_storage_restores_identity() {
        let created = Utc::now();
        let updated = created + chrono::Duration::seconds(30);
        let task = Task::from_storage(7, "title", "description", true, created, updated);

        assert_eq!(task.id(), 7);
        assert!(task.completed());
        assert_eq!(task.created_at(), created);
        assert_eq!(task.updated_at(), updated);
    }
}
