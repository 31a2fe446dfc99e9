//! User domain: entity, validation, and repository port

mod entity;
mod repository;
mod validation;

pub use entity::User;
pub use repository::in_memory::InMemoryUserRepository;
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_names, validate_password_hash, validate_username,
    UserValidationError,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
