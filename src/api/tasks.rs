//! Task endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::Task;

/// Request to create a new task
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: String,
}

/// Request to update a task
///
/// Absent title/description mean "leave unchanged"; `completed` is tri-state
/// so an absent flag is distinguishable from an explicit `false`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Status filter query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct StatusQuery {
    pub completed: bool,
}

/// Task response
#[derive(Debug, Clone, Serialize)]
pub struct TaskResponse {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Task> for TaskResponse {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_string(),
            description: task.description().to_string(),
            completed: task.completed(),
            created_at: task.created_at().to_rfc3339(),
            updated_at: task.updated_at().to_rfc3339(),
        }
    }
}

/// List tasks response
#[derive(Debug, Clone, Serialize)]
pub struct ListTasksResponse {
    pub tasks: Vec<TaskResponse>,
    pub total: usize,
}

impl ListTasksResponse {
    fn from_tasks(tasks: &[Task]) -> Self {
        let tasks: Vec<TaskResponse> = tasks.iter().map(TaskResponse::from).collect();
        let total = tasks.len();
        Self { tasks, total }
    }
}

/// Build the tasks router
pub fn create_tasks_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_task).get(get_all_tasks))
        .route("/status", get(get_tasks_by_status))
        .route(
            "/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/{id}/complete", post(complete_task))
        .route("/{id}/uncomplete", post(uncomplete_task))
}

/// POST /tasks
async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    debug!(title = %request.title, "Creating task");

    let task = state
        .task_service
        .create_task(&request.title, &request.description)
        .await
        .map_err(ApiError::from)?;

    Ok((StatusCode::CREATED, Json(TaskResponse::from(&task))))
}

/// GET /tasks
async fn get_all_tasks(
    State(state): State<AppState>,
) -> Result<Json<ListTasksResponse>, ApiError> {
    let tasks = state.task_service.get_all_tasks().await.map_err(ApiError::from)?;

    Ok(Json(ListTasksResponse::from_tasks(&tasks)))
}

/// GET /tasks/{id}
async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TaskResponse>, ApiError> {
    let task = state
        .task_service
        .get_task_by_id(id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TaskResponse::from(&task)))
}

/// PUT /tasks/{id}
async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    debug!(id = %id, "Updating task");

    let task = state
        .task_service
        .update_task(id, &request.title, &request.description, request.completed)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TaskResponse::from(&task)))
}

/// DELETE /tasks/{id}
async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(id = %id, "Deleting task");

    state.task_service.delete_task(id).await.map_err(ApiError::from)?;

    Ok(Json(serde_json::json!({
        "deleted": true,
        "id": id
    })))
}

/// GET /tasks/status?completed=<bool>
async fn get_tasks_by_status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<ListTasksResponse>, ApiError> {
    let tasks = state
        .task_service
        .get_tasks_by_status(query.completed)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(ListTasksResponse::from_tasks(&tasks)))
}

/// POST /tasks/{id}/complete
async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TaskResponse>, ApiError> {
    debug!(id = %id, "Marking task completed");

    let task = state
        .task_service
        .mark_task_completed(id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TaskResponse::from(&task)))
}

/// POST /tasks/{id}/uncomplete
async fn uncomplete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TaskResponse>, ApiError> {
    debug!(id = %id, "Marking task uncompleted");

    let task = state
        .task_service
        .mark_task_uncompleted(id)
        .await
        .map_err(ApiError::from)?;

    Ok(Json(TaskResponse::from(&task)))
}
