//! User endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::{DomainError, User};

/// Request to create a new user
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Request to update a user's name
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Login request
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User response - never carries the password hash
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            active: user.active(),
            created_at: user.created_at().to_rfc3339(),
            updated_at: user.updated_at().to_rfc3339(),
        }
    }
}

/// List users response
#[derive(Debug, Clone, Serialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
    pub total: usize,
}

impl ListUsersResponse {
    fn from_users(users: &[User]) -> Self {
        let users: Vec<UserResponse> = users.iter().map(UserResponse::from).collect();
        let total = users.len();
        Self { users, total }
    }
}

/// Build the users router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user).get(get_all_users))
        .route("/active", get(get_active_users))
        .route("/login", post(login))
        .route(
            "/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/{id}/activate", post(activate_user))
        .route("/{id}/deactivate", post(deactivate_user))
}

/// POST /users
async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    debug!(username = %request.username, "Creating user");

    let user = state
        .user_service
        .create_user(
            &request.username,
            &request.email,
            &request.password,
            &request.first_name,
            &request.last_name,
        )
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// GET /users
async fn get_all_users(
    State(state): State<AppState>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let users = state.user_service.get_all_users().await.map_err(ApiError::from)?;

    Ok(Json(ListUsersResponse::from_users(&users)))
}

/// GET /users/active
async fn get_active_users(
    State(state): State<AppState>,
) -> Result<Json<ListUsersResponse>, ApiError> {
    let users = state
        .user_service
        .get_active_users()
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ListUsersResponse::from_users(&users)))
}

/// GET /users/{id}
async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .get_user_by_id(id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

/// PUT /users/{id}
async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(id = %id, "Updating user");

    let user = state
        .user_service
        .update_user(id, &request.first_name, &request.last_name)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

/// DELETE /users/{id}
async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(id = %id, "Deleting user");

    state.user_service.delete_user(id).await.map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({
        "deleted": true,
        "id": id
    })))
}

/// POST /users/{id}/activate
async fn activate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(id = %id, "Activating user");

    let user = state
        .user_service
        .activate_user(id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

/// POST /users/{id}/deactivate
async fn deactivate_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(id = %id, "Deactivating user");

    let user = state
        .user_service
        .deactivate_user(id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(UserResponse::from(&user)))
}

/// POST /users/login
///
/// Any authentication failure maps to 401 with a generic message so the
/// response does not reveal whether the username exists.
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    debug!(username = %request.username, "Authenticating user");

    let user = state
        .user_service
        .authenticate_user(&request.username, &request.password)
        .await
        .map_err(|e| match e {
            DomainError::NotFound { .. } | DomainError::Validation { .. } => {
                ApiError::unauthorized("invalid username or password")
            }
            other => ApiError::from(other),
        })?;

    Ok(Json(UserResponse::from(&user)))
}
