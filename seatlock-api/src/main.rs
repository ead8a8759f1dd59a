use std::net::SocketAddr;
use anyhow::Context;
use seatlock_api::{app, app_config::Config, state::AppState, worker};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "seatlock_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    let app_state = AppState::new(&config.seats).context("Failed to build seat registry")?;

    tracing::info!(
        seats = app_state.coordinator.list_seats().len(),
        lock_duration_ms = config.seats.lock_duration_ms,
        "Seat registry initialised"
    );

    let sweeper = config
        .seats
        .sweep_interval()
        .map(|every| worker::start_expiry_sweeper(app_state.coordinator.clone(), every));
    if sweeper.is_none() {
        tracing::info!("Expiry sweeper disabled, relying on lazy expiry");
    }

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = sweeper {
        handle.abort();
    }
    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
    }
}
