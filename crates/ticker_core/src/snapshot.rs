//! The coordinator's published state.

use chrono::{DateTime, Utc};
use game_api::Game;
use std::sync::{Arc, RwLock};

/// Result of one successful poll. Frozen on publish — consumers clone the
/// `Arc`, nobody mutates a published snapshot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub last_game:    Option<Game>,
    pub current_game: Option<Game>,
    pub next_game:    Option<Game>,
    pub all_games:    Vec<Game>,
    pub fetched_at:   Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn is_live(&self) -> bool {
        self.current_game.is_some()
    }
}

/// Holds the latest snapshot. `publish` swaps the whole pointer, so a
/// reader either sees the old poll or the new one, never a mix. A failed
/// poll publishes nothing and the previous snapshot stays.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    inner: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, snapshot: Snapshot) {
        *self.inner.write().unwrap() = Arc::new(snapshot);
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.inner.read().unwrap().clone()
    }
}
