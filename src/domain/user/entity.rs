//! User entity

use chrono::{DateTime, Utc};

use super::validation::{
    validate_email, validate_names, validate_password_hash, validate_username,
    UserValidationError,
};

/// A user account
///
/// An invalid user is never constructed: `new` runs the full validity check
/// and fails instead of returning a half-built entity. The password field
/// always holds the opaque pre-hashed value, never a clear-text password.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user, validating every field
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let now = Utc::now();
        let user = Self {
            id: 0,
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            active: true,
            created_at: now,
            updated_at: now,
        };

        user.validate()?;
        Ok(user)
    }

    /// Rehydrate a user from a persisted row
    ///
    /// Storage rows are trusted; no validation is re-run here.
    pub fn from_storage(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            active,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    /// Partially update first and last name
    ///
    /// An empty incoming value means "leave unchanged"; `updated_at` is
    /// refreshed regardless.
    pub fn update(&mut self, first_name: impl Into<String>, last_name: impl Into<String>) {
        let first_name = first_name.into();
        let last_name = last_name.into();

        if !first_name.is_empty() {
            self.first_name = first_name;
        }
        if !last_name.is_empty() {
            self.last_name = last_name;
        }
        self.touch();
    }

    /// Activate the user
    pub fn activate(&mut self) {
        self.active = true;
        self.touch();
    }

    /// Deactivate the user
    pub fn deactivate(&mut self) {
        self.active = false;
        self.touch();
    }

    /// Check all field constraints at once
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    fn validate(&self) -> Result<(), UserValidationError> {
        validate_username(&self.username)?;
        validate_email(&self.email)?;
        validate_password_hash(&self.password_hash)?;
        validate_names(&self.first_name, &self.last_name)?;
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
