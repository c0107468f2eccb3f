/// Adlerticker — Logger
/// JSONL event stream, ntfy push alerts

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

pub struct EventLogger {
    log_dir: PathBuf,
}

impl EventLogger {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        let dir = log_dir.into();
        fs::create_dir_all(&dir).ok();
        Self { log_dir: dir }
    }

    pub fn log<T: Serialize>(&self, event: &T) -> Result<()> {
        let date  = Utc::now().format("%Y-%m-%d").to_string();
        let path  = self.log_dir.join(format!("{date}.jsonl"));
        let line  = serde_json::to_string(event)?;
        let mut f = OpenOptions::new().create(true).append(true).open(&path)?;
        writeln!(f, "{line}")?;
        Ok(())
    }
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

// ── Event types ──────────────────────────────────────────────────────────────

#[derive(Serialize, Debug)]
pub struct ApiStatusEvent {
    pub ts:          String,
    pub event:       &'static str,   // "API_STATUS"
    pub endpoint:    String,         // "list" | "detail/<id>"
    pub ok:          bool,
    pub status_code: Option<u16>,
    pub message:     String,
}

#[derive(Serialize, Debug)]
pub struct SnapshotPublishedEvent {
    pub ts:           String,
    pub event:        &'static str,   // "SNAPSHOT_PUBLISHED"
    pub total_games:  usize,
    pub last_game:    Option<String>, // status of the slot, if filled
    pub current_game: Option<String>,
    pub next_game:    Option<String>,
    pub live:         bool,
}

#[derive(Serialize, Debug)]
pub struct UpdateFailedEvent {
    pub ts:     String,
    pub event:  &'static str,   // "UPDATE_FAILED"
    pub reason: String,
}

#[derive(Serialize, Debug)]
pub struct PollScheduledEvent {
    pub ts:       String,
    pub event:    &'static str,   // "POLL_SCHEDULED"
    pub deadline: String,
    pub live:     bool,
}

#[derive(Serialize, Debug)]
pub struct GoalAlertEvent {
    pub ts:          String,
    pub event:       &'static str,   // "GOAL_ALERT"
    pub game_id:     Option<String>,
    pub total_goals: i64,
    pub message:     String,
}

/// Push a readable alert to an ntfy topic.
pub async fn send_ntfy_alert(topic: &str, msg: &str, title: &str) {
    let client = reqwest::Client::new();
    match client
        .post(format!("https://ntfy.sh/{topic}"))
        .header("Title", title)
        .header("Priority", "high")
        .header("Tags", "ice_hockey")
        .body(msg.to_string())
        .send()
        .await
    {
        Ok(_)  => tracing::info!("NTFY sent: {}", title),
        Err(e) => tracing::warn!("NTFY failed: {}", e),
    }
}
