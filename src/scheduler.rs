use crate::climate::ClimateFetcher;
use crate::state::AppState;
use crate::ticker::Tick;
use std::time::Duration;
use tokio::{task::JoinHandle, time};
use tracing::info;

/// Ticks the climate counters and tree estimate for as long as the task lives.
pub fn spawn_counter_clock(state: AppState, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut clock = time::interval(interval);
        loop {
            clock.tick().await;
            state.data.lock().await.tick(interval);
        }
    })
}

/// Starts a fetch cycle every `every`, the first one immediately. Cycles run
/// as their own tasks, so a slow one can overlap the next.
pub fn spawn_climate_refresh(
    state: AppState,
    fetcher: ClimateFetcher,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut clock = time::interval(every);
        loop {
            clock.tick().await;
            info!("refreshing climate targets");
            let state = state.clone();
            let fetcher = fetcher.clone();
            tokio::spawn(async move { fetcher.refresh(&state).await });
        }
    })
}
