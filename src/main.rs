#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = task_api_server::config::Config::from_env()?;
    task_api_server::web::start_web_server(config).await
}
