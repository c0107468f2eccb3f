//! Poll cycle orchestration.
//!
//! One cycle = fetch list → select slots → resolve detail → publish →
//! re-arm the timer. Cycles are single-flight: a trigger arriving while a
//! cycle runs is dropped, never raced. A failed cycle publishes nothing,
//! keeps the previous snapshot, surfaces `UpdateFailed` — and still
//! re-arms the timer, so one bad poll can never stop the loop.

use std::sync::Arc;

use chrono::Utc;
use game_api::{FetchError, Game, GameFetcher};
use game_select::{select_games, SelectedGames};
use goal_alert::{GoalAlert, GoalAlertTracker};
use logger::{
    now_iso, send_ntfy_alert, ApiStatusEvent, EventLogger, GoalAlertEvent, PollScheduledEvent,
    SnapshotPublishedEvent, UpdateFailedEvent,
};
use tokio::sync::{broadcast, mpsc, Mutex};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::scheduler::{next_poll_deadline, PollTimer};
use crate::snapshot::{Snapshot, SnapshotStore};

/// What started a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Manual,
    Timer,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Startup => "startup",
            Trigger::Manual => "manual",
            Trigger::Timer => "timer",
        }
    }
}

/// Advisory notifications for consumers. `UpdateFailed` clears nothing —
/// the last good snapshot stays readable through an outage.
#[derive(Debug, Clone)]
pub enum TickerEvent {
    SnapshotPublished,
    UpdateFailed(String),
    GoalAlert(GoalAlert),
}

pub struct Coordinator {
    config:     Config,
    fetcher:    Arc<dyn GameFetcher>,
    store:      SnapshotStore,
    timer:      PollTimer,
    cycle_gate: Mutex<()>,
    alerts:     std::sync::Mutex<GoalAlertTracker>,
    last_alert: std::sync::Mutex<Option<GoalAlert>>,
    events:     broadcast::Sender<TickerEvent>,
    logger:     EventLogger,
    trigger_tx: mpsc::Sender<Trigger>,
}

impl Coordinator {
    pub fn new(config: Config, fetcher: Arc<dyn GameFetcher>) -> (Arc<Self>, mpsc::Receiver<Trigger>) {
        let (trigger_tx, trigger_rx) = mpsc::channel(8);
        let (events, _) = broadcast::channel(32);
        let coordinator = Arc::new(Self {
            alerts: std::sync::Mutex::new(GoalAlertTracker::new(config.club_id)),
            last_alert: std::sync::Mutex::new(None),
            logger: EventLogger::new(&config.log_dir),
            store: SnapshotStore::new(),
            timer: PollTimer::new(),
            cycle_gate: Mutex::new(()),
            events,
            trigger_tx,
            fetcher,
            config,
        });
        (coordinator, trigger_rx)
    }

    /// Latest published poll result.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.snapshot()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TickerEvent> {
        self.events.subscribe()
    }

    pub fn trigger_sender(&self) -> mpsc::Sender<Trigger> {
        self.trigger_tx.clone()
    }

    /// Ask for an out-of-schedule poll.
    pub async fn request_refresh(&self) {
        let _ = self.trigger_tx.send(Trigger::Manual).await;
    }

    /// Read one sensor against the latest snapshot.
    pub fn read_sensor(&self, sensor: crate::sensors::Sensor) -> crate::sensors::SensorReading {
        let snapshot = self.store.snapshot();
        let last_alert = self.last_alert.lock().unwrap().clone();
        crate::sensors::read_sensor(sensor, &snapshot, self.config.club_id, last_alert.as_ref())
    }

    /// Drive the poll loop until the trigger channel closes.
    pub async fn run(self: Arc<Self>, mut triggers: mpsc::Receiver<Trigger>) {
        while let Some(trigger) = triggers.recv().await {
            self.run_cycle(trigger).await;
        }
        self.timer.disarm();
    }

    /// One complete cycle. Always re-arms the timer, success or not.
    pub async fn run_cycle(&self, trigger: Trigger) {
        let Ok(_gate) = self.cycle_gate.try_lock() else {
            debug!("cycle already in flight, dropping {} trigger", trigger.as_str());
            return;
        };

        debug!("poll cycle start ({})", trigger.as_str());
        let live = match self.update().await {
            Ok(live) => live,
            Err(err) => {
                let reason = err.to_string();
                warn!("update failed, keeping previous snapshot: {reason}");
                let _ = self.logger.log(&UpdateFailedEvent {
                    ts:     now_iso(),
                    event:  "UPDATE_FAILED",
                    reason: reason.clone(),
                });
                let _ = self.events.send(TickerEvent::UpdateFailed(reason));
                // retry cadence follows whatever the retained snapshot says
                self.store.snapshot().is_live()
            }
        };

        let interval = if live {
            self.config.live_poll_interval_mins
        } else {
            self.config.poll_interval_mins
        };
        let deadline = next_poll_deadline(Utc::now(), interval);
        info!("next poll at {} (live: {})", deadline.format("%H:%M:%S"), live);
        let _ = self.logger.log(&PollScheduledEvent {
            ts:       now_iso(),
            event:    "POLL_SCHEDULED",
            deadline: deadline.to_rfc3339(),
            live,
        });
        self.timer.arm(deadline, self.trigger_tx.clone());
    }

    /// Fetch, select, resolve, publish. Returns whether a game is running.
    async fn update(&self) -> Result<bool, FetchError> {
        let games = match self.fetcher.game_list().await {
            Ok(games) => games,
            Err(err) => {
                let _ = self.logger.log(&ApiStatusEvent {
                    ts:          now_iso(),
                    event:       "API_STATUS",
                    endpoint:    "list".to_string(),
                    ok:          false,
                    status_code: err.status_code(),
                    message:     err.to_string(),
                });
                return Err(err);
            }
        };
        let _ = self.logger.log(&ApiStatusEvent {
            ts:          now_iso(),
            event:       "API_STATUS",
            endpoint:    "list".to_string(),
            ok:          true,
            status_code: Some(200),
            message:     format!("{} games", games.len()),
        });

        let SelectedGames {
            last_game,
            current_game,
            next_game,
        } = select_games(&games, &self.config.live_status);

        // the three detail fetches are independent — fan out, wait for all
        let (last_game, current_game, next_game) = tokio::join!(
            self.resolve_detail(last_game),
            self.resolve_detail(current_game),
            self.resolve_detail(next_game),
        );

        let snapshot = Snapshot {
            last_game,
            current_game,
            next_game,
            all_games: games,
            fetched_at: Some(Utc::now()),
        };
        let live = snapshot.is_live();

        let alert = self
            .alerts
            .lock()
            .unwrap()
            .observe(snapshot.current_game.as_ref());
        *self.last_alert.lock().unwrap() = alert.clone();

        let published = SnapshotPublishedEvent {
            ts:           now_iso(),
            event:        "SNAPSHOT_PUBLISHED",
            total_games:  snapshot.all_games.len(),
            last_game:    snapshot.last_game.as_ref().and_then(|g| g.status.clone()),
            current_game: snapshot.current_game.as_ref().and_then(|g| g.status.clone()),
            next_game:    snapshot.next_game.as_ref().and_then(|g| g.status.clone()),
            live,
        };
        let alert_game_id = snapshot
            .current_game
            .as_ref()
            .and_then(|g| g.id.as_ref())
            .map(|id| id.to_string());

        self.store.publish(snapshot);
        let _ = self.logger.log(&published);
        let _ = self.events.send(TickerEvent::SnapshotPublished);

        if let Some(alert) = alert {
            self.emit_alert(alert, alert_game_id).await;
        }

        Ok(live)
    }

    /// Swap a summary record for its detail record; keep the summary when
    /// the detail endpoint misbehaves. Never fails the cycle.
    async fn resolve_detail(&self, game: Option<Game>) -> Option<Game> {
        let game = game?;
        let Some(id) = game.id.clone() else {
            return Some(game);
        };
        match self.fetcher.game_detail(&id).await {
            Ok(detail) => Some(detail),
            Err(err) => {
                warn!("detail fetch for game {id} failed, using summary record: {err}");
                let _ = self.logger.log(&ApiStatusEvent {
                    ts:          now_iso(),
                    event:       "API_STATUS",
                    endpoint:    format!("detail/{id}"),
                    ok:          false,
                    status_code: err.status_code(),
                    message:     err.to_string(),
                });
                Some(game)
            }
        }
    }

    async fn emit_alert(&self, alert: GoalAlert, game_id: Option<String>) {
        info!("{}", alert.message);
        let _ = self.logger.log(&GoalAlertEvent {
            ts:          now_iso(),
            event:       "GOAL_ALERT",
            game_id,
            total_goals: alert.total,
            message:     alert.message.clone(),
        });
        if let Some(topic) = &self.config.ntfy_topic {
            send_ntfy_alert(topic, &alert.message, "Adler Mannheim").await;
        }
        let _ = self.events.send(TickerEvent::GoalAlert(alert));
    }

    #[cfg(test)]
    pub(crate) fn armed_deadline(&self) -> Option<chrono::DateTime<Utc>> {
        self.timer.armed_deadline()
    }
}
