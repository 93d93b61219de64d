use obsidian_log::insight::InsightClient;
use obsidian_log::{load_entries, router, AppState, Config, EntryLog};
use std::net::SocketAddr;
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let entries = load_entries(&config.data_path).await;
    info!(count = entries.len(), path = %config.data_path.display(), "loaded entries");
    if config.insight.api_key.is_none() {
        info!("no insight API key configured; coaching remarks use the fallback");
    }

    let insight_client = InsightClient::new(config.insight.clone())?;
    let state = AppState::new(config.data_path.clone(), EntryLog::new(entries), insight_client);
    state.refresh_insight(state.log.lock().await.entries().to_vec());

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutting down");
    }
}
