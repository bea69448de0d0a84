use task_api_server::seed::seed_database;
use task_api_server::task::{TaskService, TaskStatus};

mod common;

#[tokio::test]
async fn can_seed_empty_database_with_sample_tasks() {
    let db = common::setup_db().await.expect("Failed to setup test db");

    seed_database(&db).await.expect("Failed to seed database");

    let task_service = TaskService::new(&db);
    let tasks = task_service
        .list_tasks(None)
        .await
        .expect("Failed to list tasks");

    assert_eq!(tasks.len(), 6);
    for status in [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Completed,
    ] {
        let matching = tasks.iter().filter(|task| task.status() == status).count();
        assert_eq!(matching, 2, "expected two {} tasks", status.as_str());
    }
    for task in &tasks {
        assert!(task.updated_at() >= task.created_at());
    }
}

#[tokio::test]
async fn can_skip_seeding_when_database_has_tasks() {
    let db = common::setup_db().await.expect("Failed to setup test db");
    let task_service = TaskService::new(&db);

    let existing = task_service
        .create_task("Pre-existing task", None, None)
        .await
        .expect("Failed to create task");

    seed_database(&db).await.expect("Failed to seed database");

    let tasks = task_service
        .list_tasks(None)
        .await
        .expect("Failed to list tasks");
    assert_eq!(tasks, vec![existing]);
}

#[tokio::test]
async fn can_seed_only_once() {
    let db = common::setup_db().await.expect("Failed to setup test db");

    seed_database(&db).await.expect("Failed to seed database");
    seed_database(&db).await.expect("Failed to seed database");

    let task_service = TaskService::new(&db);
    let tasks = task_service
        .list_tasks(None)
        .await
        .expect("Failed to list tasks");
    assert_eq!(tasks.len(), 6);
}
