use axum::http::HeaderValue;
use migration::MigratorTrait;
use sea_orm::Database;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::seed;
use crate::task::api::{self, TaskState, create_task_router};

/// OpenAPI documentation for the task API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Task Management API",
        description = "A simple API for managing tasks"
    ),
    paths(
        api::list_tasks_handler,
        api::create_task_handler,
        api::update_task_handler,
        api::delete_task_handler,
    ),
    components(schemas(
        api::TaskJson,
        api::CreateTaskRequest,
        api::UpdateTaskRequest,
        api::ErrorResponse,
    )),
    tags((name = "Tasks", description = "Task management endpoints"))
)]
struct ApiDoc;

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    use axum::Router;

    let server_address = format!("0.0.0.0:{}", &config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Web server running on http://{}", server_address);

    let db = Database::connect(&config.db_url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");

    seed::seed_database(&db).await?;

    let task_state = Arc::new(TaskState { db: Arc::new(db) });
    let task_router = create_task_router(task_state);

    let app = Router::new()
        .merge(task_router)
        .route("/health", axum::routing::get(health_check_handler))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(frontend_cors_layer()),
        );

    axum::serve(listener, app).await?;
    Ok(())
}

/// CORS policy for the browser front-end dev servers.
fn frontend_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin([
            HeaderValue::from_static("http://localhost:3000"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods(Any)
        .allow_headers(Any)
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}
