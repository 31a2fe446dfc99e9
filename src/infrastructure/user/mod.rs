//! User infrastructure: application service, password hashing, and storage

mod password;
mod postgres_repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use service::UserService;
