/// Adlerticker — Ticker Observer
///
/// What it does:
///   1. Polls the club's game feed on wall-clock boundaries (every 30 min,
///      every minute while a game runs)
///   2. Derives last / current / next game and resolves per-game detail
///   3. Publishes an immutable snapshot for the sensor surface
///   4. NTFY alert on every newly seen own-club goal
///
/// What it does NOT: no persistence, no history, polling only
///
/// Run:
///   cargo run --bin ticker-observer

use anyhow::Result;
use dotenv::dotenv;
use game_api::GameClient;
use std::env;
use std::fs::File;
use std::sync::Arc;
use ticker_core::{Config, Coordinator, TickerEvent, Trigger, ALL_SENSORS};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    info!("=== Adlerticker Observer — GAME FEED POLLING ===");

    // Single instance lock
    let lock_file_path = env::temp_dir().join("adlerticker_observer.lock");
    let lock_file = match File::create(&lock_file_path) {
        Ok(f) => f,
        Err(e) => {
            warn!("Failed to create lock file at {:?}: {}", lock_file_path, e);
            return Ok(());
        }
    };

    let mut lock = fd_lock::RwLock::new(lock_file);
    let _write_guard = match lock.try_write() {
        Ok(guard) => {
            info!("Acquired single-instance lock.");
            guard
        }
        Err(_) => {
            warn!("Another instance of ticker-observer is already running! Exiting.");
            return Ok(());
        }
    };

    let config = Config::from_env();
    info!("Club id: {}", config.club_id);
    info!("Feed: {}", config.base_url);
    info!(
        "Cadence: every {} min idle, every {} min while a game runs",
        config.poll_interval_mins, config.live_poll_interval_mins
    );
    info!("Logs: ./{}/", config.log_dir);

    let fetcher = Arc::new(GameClient::new(config.base_url.clone()));
    let (coordinator, triggers) = Coordinator::new(config, fetcher);

    // Console mirror of the sensor surface — every published poll dumps
    // the non-empty sensors, failures and goal alerts get their own line.
    let mut events = coordinator.subscribe();
    let mirror = {
        let coordinator = coordinator.clone();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                match event {
                    TickerEvent::SnapshotPublished => {
                        for sensor in ALL_SENSORS {
                            if let Some(value) = coordinator.read_sensor(sensor).value {
                                info!("{} = {}", sensor.key(), value);
                            }
                        }
                    }
                    TickerEvent::UpdateFailed(reason) => {
                        warn!("Update failed, showing stale data: {}", reason)
                    }
                    TickerEvent::GoalAlert(alert) => info!("🚨 {}", alert.message),
                }
            }
        })
    };

    let trigger_tx = coordinator.trigger_sender();
    let runner = tokio::spawn(coordinator.clone().run(triggers));

    trigger_tx.send(Trigger::Startup).await?;

    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received, shutting down.");
    runner.abort();
    mirror.abort();
    Ok(())
}
