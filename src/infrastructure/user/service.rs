//! User service - use-case orchestration for users

use std::sync::Arc;

use crate::domain::{DomainError, User, UserRepository};

use super::password::PasswordHasher;

/// User service for account management and authentication
#[derive(Debug)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl UserService {
    /// Create a new UserService with the given repository and hasher
    pub fn new(repository: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { repository, hasher }
    }

    /// Create a new user
    ///
    /// Uniqueness lookups run before the password is hashed. A lookup
    /// failure other than not-found aborts creation; treating it as
    /// "available" could let a duplicate through on a transient error.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, DomainError> {
        if username.is_empty() {
            return Err(DomainError::validation("username is required"));
        }
        if email.is_empty() {
            return Err(DomainError::validation("email is required"));
        }
        if password.is_empty() {
            return Err(DomainError::validation("password is required"));
        }
        if first_name.is_empty() {
            return Err(DomainError::validation("first name is required"));
        }
        if last_name.is_empty() {
            return Err(DomainError::validation("last name is required"));
        }

        match self.repository.get_by_username(username).await {
            Ok(_) => {
                return Err(DomainError::conflict(format!(
                    "Username '{}' is already in use",
                    username
                )));
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.context("could not check username availability")),
        }

        match self.repository.get_by_email(email).await {
            Ok(_) => {
                return Err(DomainError::conflict(format!(
                    "Email '{}' is already in use",
                    email
                )));
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.context("could not check email availability")),
        }

        let password_hash = self.hasher.hash(password)?;

        let user = User::new(username, email, password_hash, first_name, last_name)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.repository
            .create(user)
            .await
            .map_err(|e| e.context("could not create user"))
    }

    /// Authenticate a user by username and password
    ///
    /// Returns the user only on full success: the account must exist, be
    /// active, and the password must verify against the stored hash.
    pub async fn authenticate_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<User, DomainError> {
        if username.is_empty() || password.is_empty() {
            return Err(DomainError::validation(
                "username and password are required",
            ));
        }

        let user = self
            .repository
            .get_by_username(username)
            .await
            .map_err(|e| e.context("could not authenticate user"))?;

        if !user.active() {
            return Err(DomainError::validation("user is inactive"));
        }

        if !self.hasher.verify(password, user.password_hash()) {
            return Err(DomainError::validation("invalid password"));
        }

        Ok(user)
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<User, DomainError> {
        if id == 0 {
            return Err(DomainError::validation("user ID cannot be zero"));
        }

        self.repository
            .get_by_id(id)
            .await
            .map_err(|e| e.context(format!("could not get user with ID {}", id)))
    }

    /// Get all users
    pub async fn get_all_users(&self) -> Result<Vec<User>, DomainError> {
        self.repository
            .get_all()
            .await
            .map_err(|e| e.context("could not get users"))
    }

    /// Update a user's first and last name
    ///
    /// Empty incoming values leave the stored fields unchanged.
    pub async fn update_user(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, DomainError> {
        if id == 0 {
            return Err(DomainError::validation("user ID is required"));
        }

        let mut user = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| e.context(format!("could not find user with ID {}", id)))?;

        user.update(first_name, last_name);

        if !user.is_valid() {
            return Err(DomainError::validation("updated user is not valid"));
        }

        self.repository
            .update(&user)
            .await
            .map_err(|e| e.context(format!("could not update user with ID {}", id)))
    }

    /// Deactivate a user
    pub async fn deactivate_user(&self, id: i64) -> Result<User, DomainError> {
        self.set_active(id, false).await
    }

    /// Activate a user
    pub async fn activate_user(&self, id: i64) -> Result<User, DomainError> {
        self.set_active(id, true).await
    }

    /// Delete a user by ID
    ///
    /// Existence is verified first so a missing user surfaces as the
    /// lookup's not-found error rather than a delete failure.
    pub async fn delete_user(&self, id: i64) -> Result<(), DomainError> {
        if id == 0 {
            return Err(DomainError::validation("user ID is required"));
        }

        self.repository
            .get_by_id(id)
            .await
            .map_err(|e| e.context(format!("could not find user with ID {}", id)))?;

        self.repository
            .delete(id)
            .await
            .map_err(|e| e.context(format!("could not delete user with ID {}", id)))
    }

    /// Get all active users
    pub async fn get_active_users(&self) -> Result<Vec<User>, DomainError> {
        self.repository
            .get_active_users()
            .await
            .map_err(|e| e.context("could not get active users"))
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<User, DomainError> {
        if id == 0 {
            return Err(DomainError::validation("user ID is required"));
        }

        let mut user = self
            .repository
            .get_by_id(id)
            .await
            .map_err(|e| e.context(format!("could not find user with ID {}", id)))?;

        if active {
            user.activate();
        } else {
            user.deactivate();
        }

        self.repository
            .update(&user)
            .await
            .map_err(|e| e.context(format!("could not update user with ID {}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::MockUserRepository;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Test hasher that records how often hashing was invoked
    #[derive(Debug, Default)]
    struct RecordingHasher {
        hash_calls: AtomicUsize,
    }

    impl RecordingHasher {
        fn hash_calls(&self) -> usize {
            self.hash_calls.load(Ordering::SeqCst)
        }
    }

    impl PasswordHasher for RecordingHasher {
        fn hash(&self, password: &str) -> Result<String, DomainError> {
            self.hash_calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("hashed::{}", password))
        }

        fn verify(&self, password: &str, hash: &str) -> bool {
            hash == format!("hashed::{}", password)
        }
    }

    fn create_service(
        repo: MockUserRepository,
    ) -> (UserService, Arc<MockUserRepository>, Arc<RecordingHasher>) {
        let repo = Arc::new(repo);
        let hasher = Arc::new(RecordingHasher::default());
        (
            UserService::new(repo.clone(), hasher.clone()),
            repo,
            hasher,
        )
    }

    async fn create_ada(service: &UserService) -> User {
        service
            .create_user("ada", "ada@example.com", "secret-password", "Ada", "Lovelace")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_user() {
        let (service, _, _) = create_service(MockUserRepository::new());

        let user = create_ada(&service).await;

        assert!(user.id() > 0);
        assert_eq!(user.username(), "ada");
        assert_eq!(user.email(), "ada@example.com");
        assert!(user.active());
        assert_ne!(user.password_hash(), "secret-password");
    }

    #[tokio::test]
    async fn test_create_user_required_fields() {
        let (service, _, _) = create_service(MockUserRepository::new());

        let cases = [
            ("", "a@b.com", "pw", "F", "L", "username is required"),
            ("ada", "", "pw", "F", "L", "email is required"),
            ("ada", "a@b.com", "", "F", "L", "password is required"),
            ("ada", "a@b.com", "pw", "", "L", "first name is required"),
            ("ada", "a@b.com", "pw", "F", "", "last name is required"),
        ];

        for (username, email, password, first, last, expected) in cases {
            let err = service
                .create_user(username, email, password, first, last)
                .await
                .unwrap_err();
            assert!(
                err.to_string().contains(expected),
                "expected '{}' in '{}'",
                expected,
                err
            );
        }
    }

    #[tokio::test]
    async fn test_create_user_invalid_entity_fields() {
        let (service, _, _) = create_service(MockUserRepository::new());

        // Short username passes the required-field check but fails entity validation
        let err = service
            .create_user("ab", "a@b.com", "password", "F", "L")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));

        let err = service
            .create_user("ada", "not-an-email", "password", "F", "L")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_duplicate_username_fails_before_hashing() {
        let (service, _, hasher) = create_service(MockUserRepository::new());
        create_ada(&service).await;
        assert_eq!(hasher.hash_calls(), 1);

        let err = service
            .create_user("ada", "other@example.com", "pw123456", "Grace", "Hopper")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
        assert_eq!(hasher.hash_calls(), 1);
    }

    #[tokio::test]
    async fn test_create_duplicate_email_conflicts() {
        let (service, _, _) = create_service(MockUserRepository::new());
        create_ada(&service).await;

        let err = service
            .create_user("grace", "ada@example.com", "pw123456", "Grace", "Hopper")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_user_aborts_on_lookup_failure() {
        // A failing uniqueness lookup must abort creation, not fall through
        let (service, _, hasher) =
            create_service(MockUserRepository::new().with_error("connection reset"));

        let err = service
            .create_user("ada", "ada@example.com", "pw123456", "Ada", "Lovelace")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Storage { .. }));
        assert_eq!(hasher.hash_calls(), 0);
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let (service, _, _) = create_service(MockUserRepository::new());
        create_ada(&service).await;

        let user = service
            .authenticate_user("ada", "secret-password")
            .await
            .unwrap();

        assert_eq!(user.username(), "ada");
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let (service, _, _) = create_service(MockUserRepository::new());
        create_ada(&service).await;

        let err = service
            .authenticate_user("ada", "wrong-password")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_user() {
        let (service, _, _) = create_service(MockUserRepository::new());

        let err = service
            .authenticate_user("ghost", "password")
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_authenticate_inactive_user() {
        let (service, _, _) = create_service(MockUserRepository::new());
        let user = create_ada(&service).await;

        service.deactivate_user(user.id()).await.unwrap();

        let err = service
            .authenticate_user("ada", "secret-password")
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_empty_credentials() {
        let (service, _, _) = create_service(MockUserRepository::new());

        let err = service.authenticate_user("", "pw").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));

        let err = service.authenticate_user("ada", "").await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_get_user_by_id_zero() {
        let (service, _, _) = create_service(MockUserRepository::new());

        let err = service.get_user_by_id(0).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_update_user_partial_merge() {
        let (service, _, _) = create_service(MockUserRepository::new());
        let user = create_ada(&service).await;

        let updated = service.update_user(user.id(), "Augusta", "").await.unwrap();

        assert_eq!(updated.first_name(), "Augusta");
        assert_eq!(updated.last_name(), "Lovelace");
    }

    #[tokio::test]
    async fn test_activate_deactivate_round_trip() {
        let (service, _, _) = create_service(MockUserRepository::new());
        let user = create_ada(&service).await;

        let deactivated = service.deactivate_user(user.id()).await.unwrap();
        assert!(!deactivated.active());

        // Idempotent in outcome
        let again = service.deactivate_user(user.id()).await.unwrap();
        assert!(!again.active());

        let activated = service.activate_user(user.id()).await.unwrap();
        assert!(activated.active());
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (service, _, _) = create_service(MockUserRepository::new());
        let user = create_ada(&service).await;

        service.delete_user(user.id()).await.unwrap();

        let err = service.get_user_by_id(user.id()).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_user_missing_is_not_found() {
        let (service, _, _) = create_service(MockUserRepository::new());

        let err = service.delete_user(42).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_active_users() {
        let (service, _, _) = create_service(MockUserRepository::new());
        let ada = create_ada(&service).await;
        service
            .create_user("grace", "grace@example.com", "pw123456", "Grace", "Hopper")
            .await
            .unwrap();

        service.deactivate_user(ada.id()).await.unwrap();

        let active = service.get_active_users().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].username(), "grace");
    }
}
