//! PostgreSQL user repository implementation (Diesel ORM)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::{DomainError, User, UserRepository};
use crate::infrastructure::db::schema::users;
use crate::infrastructure::db::PgPool;

/// Query result row for user records
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
struct UserRow {
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

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::from_storage(
            row.id,
            row.username,
            row.email,
            row.password_hash,
            row.first_name,
            row.last_name,
            row.active,
            row.created_at,
            row.updated_at,
        )
    }
}

/// Insert model for user records
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
struct NewUserRow {
    username: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

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
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let now = Utc::now();
        let username = user.username().to_string();
        let email = user.email().to_string();
        let new_row = NewUserRow {
            username: username.clone(),
            email: email.clone(),
            password_hash: user.password_hash().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            active: user.active(),
            created_at: now,
            updated_at: now,
        };

        self.run_blocking(move |connection| {
            let row: UserRow = diesel::insert_into(users::table)
                .values(&new_row)
                .returning(UserRow::as_returning())
                .get_result(connection)
                .map_err(|e| map_unique_violation(e, &username, &email, "Failed to insert user"))?;

            Ok(row.into())
        })
        .await
    }

    async fn get_by_id(&self, id: i64) -> Result<User, DomainError> {
        self.run_blocking(move |connection| {
            let row = users::table
                .find(id)
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

            row.map(User::from)
                .ok_or_else(|| DomainError::not_found(format!("User with ID {} not found", id)))
        })
        .await
    }

    async fn get_all(&self) -> Result<Vec<User>, DomainError> {
        self.run_blocking(|connection| {
            let rows = users::table
                .order(users::id.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(|e| DomainError::storage(format!("Failed to list users: {}", e)))?;

            Ok(rows.into_iter().map(User::from).collect())
        })
        .await
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let id = user.id();
        let username = user.username().to_string();
        let email = user.email().to_string();
        let password_hash = user.password_hash().to_string();
        let first_name = user.first_name().to_string();
        let last_name = user.last_name().to_string();
        let active = user.active();
        let updated_at = user.updated_at();
        let result = user.clone();

        self.run_blocking(move |connection| {
            let affected = diesel::update(users::table.find(id))
                .set((
                    users::username.eq(&username),
                    users::email.eq(&email),
                    users::password_hash.eq(password_hash),
                    users::first_name.eq(first_name),
                    users::last_name.eq(last_name),
                    users::active.eq(active),
                    users::updated_at.eq(updated_at),
                ))
                .execute(connection)
                .map_err(|e| map_unique_violation(e, &username, &email, "Failed to update user"))?;

            if affected == 0 {
                return Err(DomainError::not_found(format!(
                    "User with ID {} not found",
                    id
                )));
            }

            Ok(result)
        })
        .await
    }

    async fn delete(&self, id: i64) -> Result<(), DomainError> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(users::table.find(id))
                .execute(connection)
                .map_err(|e| DomainError::storage(format!("Failed to delete user: {}", e)))?;

            if affected == 0 {
                return Err(DomainError::not_found(format!(
                    "User with ID {} not found",
                    id
                )));
            }

            Ok(())
        })
        .await
    }

    async fn get_by_username(&self, username: &str) -> Result<User, DomainError> {
        let username = username.to_string();

        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::username.eq(&username))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(|e| {
                    DomainError::storage(format!("Failed to get user by username: {}", e))
                })?;

            row.map(User::from).ok_or_else(|| {
                DomainError::not_found(format!("User with username '{}' not found", username))
            })
        })
        .await
    }

    async fn get_by_email(&self, email: &str) -> Result<User, DomainError> {
        let email = email.to_string();

        self.run_blocking(move |connection| {
            let row = users::table
                .filter(users::email.eq(&email))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(|e| DomainError::storage(format!("Failed to get user by email: {}", e)))?;

            row.map(User::from).ok_or_else(|| {
                DomainError::not_found(format!("User with email '{}' not found", email))
            })
        })
        .await
    }

    async fn get_active_users(&self) -> Result<Vec<User>, DomainError> {
        self.run_blocking(|connection| {
            let rows = users::table
                .filter(users::active.eq(true))
                .order(users::id.asc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(|e| DomainError::storage(format!("Failed to list active users: {}", e)))?;

            Ok(rows.into_iter().map(User::from).collect())
        })
        .await
    }
}

fn map_unique_violation(
    err: DieselError,
    username: &str,
    email: &str,
    context: &str,
) -> DomainError {
    match &err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            if info.message().contains("email") {
                DomainError::conflict(format!("Email '{}' is already in use", email))
            } else {
                DomainError::conflict(format!("Username '{}' is already in use", username))
            }
        }
        _ => DomainError::storage(format!("{}: {}", context, err)),
    }
}
