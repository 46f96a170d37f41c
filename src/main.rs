use ecoguard::climate::ClimateFetcher;
use ecoguard::scheduler::{spawn_climate_refresh, spawn_counter_clock};
use ecoguard::{load_store, router, AppConfig, AppState, EcoState};
use std::net::SocketAddr;
use tokio::fs;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = AppConfig::from_env()?;
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let store = load_store(&config.data_path).await;
    let state = AppState::new(config.data_path.clone(), EcoState::load(store));

    let fetcher = ClimateFetcher::new(config.co2_url.clone(), config.temperature_url.clone());
    let counters = spawn_counter_clock(state.clone(), config.tick_interval);
    let refresh = spawn_climate_refresh(state.clone(), fetcher, config.fetch_interval);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    counters.abort();
    refresh.abort();
    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
}
