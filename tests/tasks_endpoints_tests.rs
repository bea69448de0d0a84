use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{Value, json};
use std::sync::Arc;
use task_api_server::task::api::{TaskState, create_task_router};
use tower::ServiceExt;

mod common;

/// Setup function for endpoint tests using an in-memory SQLite database.
async fn setup_app() -> anyhow::Result<Router> {
    // Allow multiple calls to init for tests.
    let _ = tracing_subscriber::fmt().try_init();
    let db = common::setup_db().await?;
    let task_state = Arc::new(TaskState { db: Arc::new(db) });
    Ok(create_task_router(task_state))
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

/// Test helper to create a task through the API and return its JSON body.
async fn create_task(app: &Router, payload: Value) -> Value {
    let response = app
        .clone()
        .oneshot(json_request(Method::POST, "/tasks", &payload))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[tokio::test]
async fn can_return_empty_task_list() {
    let app = setup_app().await.expect("Failed to setup test app");

    let response = app.oneshot(get_request("/tasks")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[tokio::test]
async fn can_create_task_via_post() {
    let app = setup_app().await.expect("Failed to setup test app");

    let response = app
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/tasks",
            &json!({
                "title": "  Write integration tests  ",
                "description": "Cover every endpoint",
                "status": "in_progress"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get("location")
        .expect("Location header missing")
        .to_str()
        .unwrap()
        .to_string();

    let task = body_json(response).await;
    assert_eq!(location, format!("/tasks/{}", task["id"]));
    assert_eq!(task["title"], "Write integration tests");
    assert_eq!(task["description"], "Cover every endpoint");
    assert_eq!(task["status"], "IN_PROGRESS");
    assert_eq!(task["createdAt"], task["updatedAt"]);
}

#[tokio::test]
async fn can_reject_blank_title_via_post() {
    let app = setup_app().await.expect("Failed to setup test app");

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/tasks",
            &json!({ "title": "   " }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert_eq!(error["error"], "VALIDATION_ERROR");
    assert_eq!(error["message"], "Title is required and cannot be empty");
}

#[tokio::test]
async fn can_reject_unknown_status_via_post() {
    let app = setup_app().await.expect("Failed to setup test app");

    let response = app
        .oneshot(json_request(
            Method::POST,
            "/tasks",
            &json!({ "title": "Valid title", "status": "DONE" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert_eq!(error["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn can_filter_task_list_by_status() {
    let app = setup_app().await.expect("Failed to setup test app");

    create_task(&app, json!({ "title": "Backlog item" })).await;
    let completed = create_task(
        &app,
        json!({ "title": "Shipped item", "status": "COMPLETED" }),
    )
    .await;

    let response = app
        .clone()
        .oneshot(get_request("/tasks?status=COMPLETED"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let tasks = body_json(response).await;
    assert_eq!(tasks, json!([completed]));

    // An empty status value means "no filter".
    let response = app.oneshot(get_request("/tasks?status=")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let tasks = body_json(response).await;
    assert_eq!(tasks.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn can_reject_unknown_status_filter() {
    let app = setup_app().await.expect("Failed to setup test app");

    let response = app.oneshot(get_request("/tasks?status=bogus")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert_eq!(error["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn can_clear_description_via_put() {
    let app = setup_app().await.expect("Failed to setup test app");

    let created = create_task(
        &app,
        json!({ "title": "Keep title", "description": "Soon gone" }),
    )
    .await;

    let response = app
        .oneshot(json_request(
            Method::PUT,
            &format!("/tasks/{}", created["id"]),
            &json!({ "description": "" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["title"], "Keep title");
    assert_eq!(updated["description"], Value::Null);
    assert_eq!(updated["createdAt"], created["createdAt"]);
}

#[tokio::test]
async fn can_leave_task_unchanged_when_put_body_is_empty() {
    let app = setup_app().await.expect("Failed to setup test app");

    let created = create_task(&app, json!({ "title": "Frozen" })).await;

    let response = app
        .oneshot(json_request(
            Method::PUT,
            &format!("/tasks/{}", created["id"]),
            &json!({}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, created);
}

#[tokio::test]
async fn can_return_not_found_when_updating_missing_task() {
    let app = setup_app().await.expect("Failed to setup test app");

    let response = app
        .oneshot(json_request(
            Method::PUT,
            "/tasks/999",
            &json!({ "title": "Ghost" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let error = body_json(response).await;
    assert_eq!(error["error"], "NOT_FOUND");
    assert_eq!(error["message"], "Task with ID 999 not found");
}

#[tokio::test]
async fn can_reject_unknown_status_via_put() {
    let app = setup_app().await.expect("Failed to setup test app");

    let created = create_task(&app, json!({ "title": "Status victim" })).await;

    let response = app
        .oneshot(json_request(
            Method::PUT,
            &format!("/tasks/{}", created["id"]),
            &json!({ "status": "FINISHED" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_json(response).await;
    assert_eq!(error["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn can_delete_task_and_return_not_found_afterwards() {
    let app = setup_app().await.expect("Failed to setup test app");

    let created = create_task(&app, json!({ "title": "Short lived" })).await;
    let uri = format!("/tasks/{}", created["id"]);

    let delete_request = Request::builder()
        .method(Method::DELETE)
        .uri(&uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(delete_request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let second_delete = Request::builder()
        .method(Method::DELETE)
        .uri(&uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(second_delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.oneshot(get_request("/tasks")).await.unwrap();
    assert_eq!(body_json(response).await, json!([]));
}
