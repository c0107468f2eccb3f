//! Wall-clock aligned poll scheduling.
//!
//! Deadlines snap to multiples of the poll interval past the top of the
//! hour — every full minute while a game runs, :00/:30 otherwise — so the
//! next poll time is predictable from a wall clock, not from process
//! uptime. One pending timer at most; re-arming cancels the old one first.

use chrono::{DateTime, Duration as ChronoDuration, Timelike, Utc};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::coordinator::Trigger;

/// Next multiple of `interval_mins` minutes past the top of the hour,
/// second 0, strictly after `now`. Sitting exactly on a boundary advances
/// a full step — no immediate re-fire.
pub fn next_poll_deadline(now: DateTime<Utc>, interval_mins: u32) -> DateTime<Utc> {
    let interval = ChronoDuration::minutes(interval_mins.max(1) as i64);
    let hour_start = now
        .with_minute(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now);

    let mut deadline = hour_start;
    while deadline <= now {
        deadline += interval;
    }
    deadline
}

/// Owns the single pending one-shot poll timer. Firing sends one
/// `Trigger::Timer` into the cycle channel; each cycle arms its successor.
#[derive(Debug, Default)]
pub struct PollTimer {
    pending: Mutex<Option<(JoinHandle<()>, DateTime<Utc>)>>,
}

impl PollTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending timer, then arm one for `deadline`. A deadline
    /// already in the past fires immediately.
    pub fn arm(&self, deadline: DateTime<Utc>, tx: mpsc::Sender<Trigger>) {
        let mut pending = self.pending.lock().unwrap();
        if let Some((old, old_deadline)) = pending.take() {
            old.abort();
            debug!("replaced pending poll timer for {old_deadline}");
        }
        let wait = (deadline - Utc::now()).to_std().unwrap_or_default();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            let _ = tx.send(Trigger::Timer).await;
        });
        *pending = Some((handle, deadline));
    }

    pub fn armed_deadline(&self) -> Option<DateTime<Utc>> {
        self.pending.lock().unwrap().as_ref().map(|(_, d)| *d)
    }

    pub fn disarm(&self) {
        if let Some((old, _)) = self.pending.lock().unwrap().take() {
            old.abort();
        }
    }
}
