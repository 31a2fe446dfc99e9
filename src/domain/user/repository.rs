//! User repository trait

use async_trait::async_trait;

use super::User;
use crate::domain::DomainError;

/// Repository trait for User persistence
///
/// Same contract as the task port: missing records surface as
/// `DomainError::NotFound`, create assigns the identifier and timestamps,
/// list operations return empty collections rather than errors.
#[async_trait]
pub trait UserRepository: Send + Sync + std::fmt::Debug {
    /// Persist a new user, assigning its identifier and timestamps
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Get a user by ID
    async fn get_by_id(&self, id: i64) -> Result<User, DomainError>;

    /// Get all users
    async fn get_all(&self) -> Result<Vec<User>, DomainError>;

    /// Update an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Delete a user by ID
    async fn delete(&self, id: i64) -> Result<(), DomainError>;

    /// Get a user by username
    async fn get_by_username(&self, username: &str) -> Result<User, DomainError>;

    /// Get a user by email
    async fn get_by_email(&self, email: &str) -> Result<User, DomainError>;

    /// Get all active users
    async fn get_active_users(&self) -> Result<Vec<User>, DomainError>;
}

/// In-memory implementation of UserRepository
pub mod in_memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Mutex;

    /// In-memory implementation of UserRepository for testing and development
    #[derive(Debug, Default)]
    pub struct InMemoryUserRepository {
        users: Mutex<HashMap<i64, User>>,
        next_id: AtomicI64,
    }

    impl InMemoryUserRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn create(&self, user: User) -> Result<User, DomainError> {
            let mut users = self.users.lock().unwrap();

            if users.values().any(|u| u.username() == user.username()) {
                return Err(DomainError::conflict(format!(
                    "Username '{}' is already in use",
                    user.username()
                )));
            }

            if users.values().any(|u| u.email() == user.email()) {
                return Err(DomainError::conflict(format!(
                    "Email '{}' is already in use",
                    user.email()
                )));
            }

            let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let now = chrono::Utc::now();
            let stored = User::from_storage(
                id,
                user.username(),
                user.email(),
                user.password_hash(),
                user.first_name(),
                user.last_name(),
                user.active(),
                now,
                now,
            );

            users.insert(id, stored.clone());
            Ok(stored)
        }

        async fn get_by_id(&self, id: i64) -> Result<User, DomainError> {
            self.users
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or_else(|| DomainError::not_found(format!("User with ID {} not found", id)))
        }

        async fn get_all(&self) -> Result<Vec<User>, DomainError> {
            let mut users: Vec<User> = self.users.lock().unwrap().values().cloned().collect();
            users.sort_by_key(User::id);
            Ok(users)
        }

        async fn update(&self, user: &User) -> Result<User, DomainError> {
            let mut users = self.users.lock().unwrap();

            if !users.contains_key(&user.id()) {
                return Err(DomainError::not_found(format!(
                    "User with ID {} not found",
                    user.id()
                )));
            }

            users.insert(user.id(), user.clone());
            Ok(user.clone())
        }

        async fn delete(&self, id: i64) -> Result<(), DomainError> {
            if self.users.lock().unwrap().remove(&id).is_none() {
                return Err(DomainError::not_found(format!(
                    "User with ID {} not found",
                    id
                )));
            }
            Ok(())
        }

        async fn get_by_username(&self, username: &str) -> Result<User, DomainError> {
            self.users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.username() == username)
                .cloned()
                .ok_or_else(|| {
                    DomainError::not_found(format!("User with username '{}' not found", username))
                })
        }

        async fn get_by_email(&self, email: &str) -> Result<User, DomainError> {
            self.users
                .lock()
                .unwrap()
                .values()
                .find(|u| u.email() == email)
                .cloned()
                .ok_or_else(|| {
                    DomainError::not_found(format!("User with email '{}' not found", email))
                })
        }

        async fn get_active_users(&self) -> Result<Vec<User>, DomainError> {
            let mut users: Vec<User> = self
                .users
                .lock()
                .unwrap()
                .values()
                .filter(|u| u.active())
                .cloned()
                .collect();

            users.sort_by_key(User::id);
            Ok(users)
        }
    }
}
