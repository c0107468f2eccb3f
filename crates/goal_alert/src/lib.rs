/// Adlerticker — Goal Alert
///
/// Edge detector over the running game's score: fires once per newly seen
/// own-club goal, stays silent otherwise. One instance per process; the
/// counter survives across polls and resets only on restart (or via
/// `reset`, for tests).

use game_api::Game;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalAlert {
    pub total:   i64,
    pub message: String,
}

#[derive(Debug)]
pub struct GoalAlertTracker {
    club_id:    i64,
    last_total: i64,
}

impl GoalAlertTracker {
    pub fn new(club_id: i64) -> Self {
        Self {
            club_id,
            last_total: 0,
        }
    }

    /// Cumulative own-club goal count for a game.
    ///
    /// Deliberately counts only the score column the club occupies (home
    /// score when playing at home, away score otherwise) — the upstream
    /// ticker's literal formula, kept for compatibility. Note the sibling
    /// goal sensors sum both columns; see the discrepancy test below.
    pub fn club_goals(&self, game: &Game) -> i64 {
        if game.is_club_home(self.club_id) {
            game.score_home()
        } else {
            game.score_away()
        }
    }

    /// Feed one published poll result through the detector.
    ///
    /// Returns an alert exactly when the running game's own-club count
    /// exceeds everything seen so far; the stored count never decreases,
    /// so a later corrected-down score stays silent.
    pub fn observe(&mut self, current_game: Option<&Game>) -> Option<GoalAlert> {
        let game = current_game?;
        let total = self.club_goals(game);
        if total <= self.last_total {
            return None;
        }
        debug!("own-club goal count {} -> {}", self.last_total, total);
        self.last_total = total;
        Some(GoalAlert {
            total,
            message: format!("Neues Adler-Tor! Gesamt: {total}"),
        })
    }

    pub fn last_total(&self) -> i64 {
        self.last_total
    }

    /// Forget everything seen so far.
    pub fn reset(&mut self) {
        self.last_total = 0;
    }
}
