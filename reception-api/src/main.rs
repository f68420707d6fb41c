use reception_api::config::ReceptionApiConfig;
use reception_api::startup::Application;
use service_core::observability::{init_metrics, init_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration - fail fast if invalid
    let config = ReceptionApiConfig::load()
        .map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    init_tracing(
        "reception-api",
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;
    init_metrics()?;

    tracing::info!(
        port = config.common.port,
        login_attempts = config.rate_limit.login_attempts,
        login_window_seconds = config.rate_limit.login_window_seconds,
        "Starting reception API"
    );

    let app = Application::build(config).await?;
    app.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
