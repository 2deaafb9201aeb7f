use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::signal;

use content_gateway::telemetry::init_telemetry;
use content_gateway::{AppState, Config, llm, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let telemetry_guard = init_telemetry(&config)?;

    tracing::info!(
        port = config.port,
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting content-gateway"
    );

    let session = llm::resolve(&config.llm, None)?;
    tracing::info!(
        provider = session.provider_name(),
        model = session.model_name(),
        timeout_secs = config.llm.timeout.as_secs(),
        "LLM provider resolved"
    );

    if config.app_secret.is_none() {
        tracing::warn!("APP_SECRET is not set; generation endpoints will reject every request");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = routes::create_router(AppState::new(config));

    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    telemetry_guard.shutdown();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
