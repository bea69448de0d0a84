use crate::task::{Task, TaskService, TaskServiceError};
use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
    routing::{get, put},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Shared state for task handlers.
#[derive(Clone, Debug)]
pub struct TaskState {
    pub db: Arc<sea_orm::DatabaseConnection>,
}

/// JSON representation of a Task for API responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TaskJson {
    /// Unique identifier for the task
    id: u32,
    /// Short human-readable title
    title: String,
    /// Optional longer description
    description: Option<String>,
    /// Canonical status token
    status: String,
    /// When the task was created
    created_at: DateTime<Utc>,
    /// When the task was last modified
    updated_at: DateTime<Utc>,
}

impl From<Task> for TaskJson {
    fn from(task: Task) -> Self {
        Self {
            id: task.id(),
            title: task.title().to_string(),
            description: task.description().map(str::to_string),
            status: task.status().as_str().to_string(),
            created_at: task.created_at(),
            updated_at: task.updated_at(),
        }
    }
}

/// JSON request payload for creating a task.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTaskRequest {
    /// Required title, at most 120 characters after trimming
    title: String,
    /// Optional description; blank input is stored as absent
    description: Option<String>,
    /// Optional status token; defaults to NOT_STARTED
    status: Option<String>,
}

/// JSON request payload for partially updating a task.
/// Fields that are not supplied are left untouched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTaskRequest {
    /// New title; a blank title is ignored
    title: Option<String>,
    /// New description; a blank description clears the field
    description: Option<String>,
    /// New status token
    status: Option<String>,
}

/// Query parameters for filtering tasks by status.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TasksQuery {
    /// Optional status token to filter tasks by
    #[serde(default)]
    status: Option<String>,
}

/// JSON response for API errors.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub error: String,
    /// Human-readable explanation
    pub message: String,
}

fn error_response(err: TaskServiceError) -> (StatusCode, Json<ErrorResponse>) {
    match err {
        TaskServiceError::EmptyTitle
        | TaskServiceError::TitleTooLong
        | TaskServiceError::InvalidStatus(_) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "VALIDATION_ERROR".to_string(),
                message: err.to_string(),
            }),
        ),
        TaskServiceError::TaskNotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "NOT_FOUND".to_string(),
                message: err.to_string(),
            }),
        ),
        TaskServiceError::Database(db_err) => {
            tracing::error!("Database error while handling request: {}", db_err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "INTERNAL_SERVER_ERROR".to_string(),
                    message: "An unexpected error occurred while processing your request"
                        .to_string(),
                }),
            )
        }
    }
}

/// Handler for GET /tasks - Returns all tasks, optionally filtered by status.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    get,
    path = "/tasks",
    params(
        ("status" = Option<String>, Query, description = "Optional status token to filter tasks by")
    ),
    responses(
        (status = 200, description = "Successfully retrieved tasks", body = [TaskJson]),
        (status = 400, description = "Unrecognized status filter", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn list_tasks_handler(
    State(state): State<Arc<TaskState>>,
    Query(query): Query<TasksQuery>,
) -> Result<Json<Vec<TaskJson>>, (StatusCode, Json<ErrorResponse>)> {
    let service = TaskService::new(&state.db);

    // An empty status= query value means "no filter".
    let status_filter = query.status.as_deref().filter(|token| !token.is_empty());

    let tasks = service
        .list_tasks(status_filter)
        .await
        .map_err(error_response)?;
    Ok(Json(tasks.into_iter().map(TaskJson::from).collect()))
}

/// Handler for POST /tasks - Creates a new task.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    post,
    path = "/tasks",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskJson),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn create_task_handler(
    State(state): State<Arc<TaskState>>,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    let service = TaskService::new(&state.db);

    let task = service
        .create_task(
            &payload.title,
            payload.description.as_deref(),
            payload.status.as_deref(),
        )
        .await
        .map_err(error_response)?;

    let location = format!("/tasks/{}", task.id());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TaskJson::from(task)),
    ))
}

/// Handler for PUT /tasks/{id} - Partially updates a task.
#[tracing::instrument(skip(state, payload))]
#[utoipa::path(
    put,
    path = "/tasks/{id}",
    params(
        ("id" = u32, Path, description = "ID of the task to update")
    ),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskJson),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn update_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<u32>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskJson>, (StatusCode, Json<ErrorResponse>)> {
    let service = TaskService::new(&state.db);

    let task = service
        .update_task(
            id,
            payload.title.as_deref(),
            payload.description.as_deref(),
            payload.status.as_deref(),
        )
        .await
        .map_err(error_response)?;
    Ok(Json(TaskJson::from(task)))
}

/// Handler for DELETE /tasks/{id} - Deletes a task.
#[tracing::instrument(skip(state))]
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    params(
        ("id" = u32, Path, description = "ID of the task to delete")
    ),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tasks"
)]
pub async fn delete_task_handler(
    State(state): State<Arc<TaskState>>,
    Path(id): Path<u32>,
) -> Result<StatusCode, (StatusCode, Json<ErrorResponse>)> {
    let service = TaskService::new(&state.db);

    service
        .delete_task_by_id(id)
        .await
        .map_err(error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and returns the task router with all task-related routes.
pub fn create_task_router(state: Arc<TaskState>) -> Router {
    Router::new()
        .route(
            "/tasks",
            get(list_tasks_handler).post(create_task_handler),
        )
        .route(
            "/tasks/{id}",
            put(update_task_handler).delete(delete_task_handler),
        )
        .with_state(state)
}
