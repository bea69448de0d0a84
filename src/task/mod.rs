use crate::entities::*;
use chrono::{DateTime, Utc};
use sea_orm::*;

pub mod api;

pub use crate::entities::task::TaskStatus;

/// Longest accepted title, counted in characters after trimming.
pub const MAX_TITLE_LENGTH: usize = 120;

#[derive(Debug, PartialEq, Clone, Eq)]
pub struct Task {
    id: u32,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(
        id: u32,
        title: String,
        description: Option<String>,
        status: TaskStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            status,
            created_at,
            updated_at,
        }
    }

    /// Returns the ID of the task.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the title of the task.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description of the task, if any.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the status of the task.
    pub fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns when the task was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the task was last modified.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl From<task::Model> for Task {
    fn from(model: task::Model) -> Self {
        Task::new(
            model.id as u32,
            model.title,
            model.description,
            model.status,
            model.created_at,
            model.updated_at,
        )
    }
}

/// Error type for TaskService operations.
#[derive(Debug, thiserror::Error)]
pub enum TaskServiceError {
    /// Represents a missing or blank title.
    #[error("Title is required and cannot be empty")]
    EmptyTitle,
    /// Represents a title that is too long after trimming.
    #[error("Title cannot exceed {MAX_TITLE_LENGTH} characters")]
    TitleTooLong,
    /// Represents an unrecognized status token.
    #[error("Invalid status '{0}'. Valid values: NOT_STARTED, IN_PROGRESS, COMPLETED")]
    InvalidStatus(String),
    /// Represents a task not found error.
    #[error("Task with ID {0} not found")]
    TaskNotFound(u32),
    /// Represents a database error.
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

pub struct TaskService<'a> {
    db: &'a sea_orm::DatabaseConnection,
}

impl TaskService<'_> {
    pub fn new(db: &sea_orm::DatabaseConnection) -> TaskService {
        TaskService { db }
    }

    /// Creates a new task in the database.
    ///
    /// # Arguments
    ///
    /// * `title` - The title of the task; trimmed and required.
    /// * `description` - An optional description; blank input is stored as absent.
    /// * `status` - An optional status token; defaults to `NOT_STARTED`.
    ///
    /// # Returns
    ///
    /// A `Result` containing the created `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(
        &self,
        title: &str,
        description: Option<&str>,
        status: Option<&str>,
    ) -> Result<Task, TaskServiceError> {
        let title = validate_title(title)?;
        let status = parse_status_or_default(status)?;
        let description = normalize_description(description);

        let now = Utc::now();
        let active_model = task::ActiveModel {
            title: ActiveValue::Set(title),
            description: ActiveValue::Set(description),
            status: ActiveValue::Set(status),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        Ok(Task::from(created_model))
    }

    /// Retrieves all tasks from the database, ordered by ascending ID.
    ///
    /// # Arguments
    ///
    /// * `status_filter` - An optional status token; when given, only tasks
    ///   with a matching status are returned.
    ///
    /// # Returns
    ///
    /// A `Result` containing a vector of `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn list_tasks(
        &self,
        status_filter: Option<&str>,
    ) -> Result<Vec<Task>, TaskServiceError> {
        let mut query = task::Entity::find();
        if let Some(token) = status_filter {
            let status = parse_status(token)?;
            query = query.filter(task::Column::Status.eq(status));
        }

        let tasks = query
            .order_by_asc(task::Column::Id)
            .all(self.db)
            .await?
            .into_iter()
            .map(Task::from)
            .collect();
        Ok(tasks)
    }

    /// Retrieves a task by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to retrieve.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn get_task_by_id(&self, id: u32) -> Result<Task, TaskServiceError> {
        let task_model = task::Entity::find_by_id(id as i32)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;
        Ok(Task::from(task_model))
    }

    /// Applies a partial update to a task. Each field is independently
    /// optional; fields that are not supplied are left untouched.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to update.
    /// * `title` - A new title; a supplied-but-blank title is ignored.
    /// * `description` - A new description; blank input clears the field.
    /// * `status` - A new status token.
    ///
    /// # Returns
    ///
    /// A `Result` containing the updated `Task` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(
        &self,
        id: u32,
        title: Option<&str>,
        description: Option<&str>,
        status: Option<&str>,
    ) -> Result<Task, TaskServiceError> {
        let task_to_update = task::Entity::find_by_id(id as i32)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;

        let mut active_model: task::ActiveModel = task_to_update.clone().into();
        let mut changed = false;

        // Titles are required non-empty, so a blank title means "no change".
        if let Some(raw_title) = title {
            if !raw_title.trim().is_empty() {
                active_model.title = ActiveValue::Set(validate_title(raw_title)?);
                changed = true;
            }
        }

        // A supplied description always counts as a change; blank clears it.
        if let Some(raw_description) = description {
            active_model.description =
                ActiveValue::Set(normalize_description(Some(raw_description)));
            changed = true;
        }

        if let Some(token) = status {
            if !token.is_empty() {
                active_model.status = ActiveValue::Set(parse_status(token)?);
                changed = true;
            }
        }

        if !changed {
            return Ok(Task::from(task_to_update));
        }

        active_model.updated_at = ActiveValue::Set(Utc::now());
        let updated_model = active_model.update(self.db).await?;
        Ok(Task::from(updated_model))
    }

    /// Deletes a task by its ID.
    ///
    /// # Arguments
    ///
    /// * `id` - The ID of the task to delete.
    ///
    /// # Returns
    ///
    /// A `Result` containing `()` if successful, or an error otherwise.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task_by_id(&self, id: u32) -> Result<(), TaskServiceError> {
        task::Entity::find_by_id(id as i32)
            .one(self.db)
            .await?
            .ok_or(TaskServiceError::TaskNotFound(id))?;

        task::Entity::delete_by_id(id as i32).exec(self.db).await?;
        Ok(())
    }
}

fn validate_title(raw: &str) -> Result<String, TaskServiceError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskServiceError::EmptyTitle);
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(TaskServiceError::TitleTooLong);
    }
    Ok(trimmed.to_string())
}

fn normalize_description(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

fn parse_status(token: &str) -> Result<TaskStatus, TaskServiceError> {
    TaskStatus::parse(token).ok_or_else(|| TaskServiceError::InvalidStatus(token.to_string()))
}

fn parse_status_or_default(token: Option<&str>) -> Result<TaskStatus, TaskServiceError> {
    match token {
        Some(token) if !token.is_empty() => parse_status(token),
        _ => Ok(TaskStatus::NotStarted),
    }
}
