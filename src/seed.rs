use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveValue, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait};

use crate::entities::task;
use crate::entities::task::TaskStatus;

/// Populates the store with illustrative tasks when it is empty.
/// Invoked once at startup, after migrations and before serving traffic.
#[tracing::instrument(skip(db))]
pub async fn seed_database(db: &DatabaseConnection) -> Result<(), DbErr> {
    if task::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let now = Utc::now();
    let sample_tasks = vec![
        sample_task(
            "Set up development environment",
            "Install necessary tools and configure the development environment for the project",
            TaskStatus::NotStarted,
            now - Duration::days(5),
            now - Duration::days(5),
        ),
        sample_task(
            "Create project documentation",
            "Write comprehensive documentation for the project including API specs and user guides",
            TaskStatus::NotStarted,
            now - Duration::days(4),
            now - Duration::days(4),
        ),
        sample_task(
            "Implement user authentication",
            "Develop login, registration, and password reset functionality",
            TaskStatus::InProgress,
            now - Duration::days(3),
            now - Duration::days(1),
        ),
        sample_task(
            "Design database schema",
            "Create and optimize database tables for the application",
            TaskStatus::InProgress,
            now - Duration::days(2),
            now - Duration::hours(6),
        ),
        sample_task(
            "Set up CI/CD pipeline",
            "Configure automated testing and deployment processes",
            TaskStatus::Completed,
            now - Duration::days(6),
            now - Duration::days(1),
        ),
        sample_task(
            "Create task management API",
            "Develop REST API endpoints for task CRUD operations",
            TaskStatus::Completed,
            now - Duration::days(3),
            now - Duration::hours(2),
        ),
    ];

    let seeded = sample_tasks.len();
    task::Entity::insert_many(sample_tasks).exec(db).await?;
    tracing::info!("Database seeded with {} sample tasks", seeded);
    Ok(())
}

fn sample_task(
    title: &str,
    description: &str,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
) -> task::ActiveModel {
    task::ActiveModel {
        title: ActiveValue::Set(title.to_string()),
        description: ActiveValue::Set(Some(description.to_string())),
        status: ActiveValue::Set(status),
        created_at: ActiveValue::Set(created_at),
        updated_at: ActiveValue::Set(updated_at),
        ..Default::default()
    }
}
