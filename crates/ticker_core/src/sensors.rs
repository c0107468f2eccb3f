//! Read-only sensor surface over the published snapshot.
//!
//! Seven observable quantities, each addressable by a stable key. The
//! host adapter (Home Assistant, MQTT bridge, whatever) wraps each one in
//! its own entity model; this layer only derives values and attribute
//! bags from the snapshot.

use game_api::Game;
use goal_alert::GoalAlert;
use serde_json::{json, Value};

use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sensor {
    LastGame,
    CurrentGame,
    NextGame,
    CurrentGoalsHome,
    CurrentGoalsAway,
    CurrentGoalsTotal,
    AdlerGoalAlert,
}

pub const ALL_SENSORS: [Sensor; 7] = [
    Sensor::LastGame,
    Sensor::CurrentGame,
    Sensor::NextGame,
    Sensor::CurrentGoalsHome,
    Sensor::CurrentGoalsAway,
    Sensor::CurrentGoalsTotal,
    Sensor::AdlerGoalAlert,
];

impl Sensor {
    pub fn key(&self) -> &'static str {
        match self {
            Sensor::LastGame => "last_game",
            Sensor::CurrentGame => "current_game",
            Sensor::NextGame => "next_game",
            Sensor::CurrentGoalsHome => "current_goals_home",
            Sensor::CurrentGoalsAway => "current_goals_away",
            Sensor::CurrentGoalsTotal => "current_goals_total",
            Sensor::AdlerGoalAlert => "adler_goal_alert",
        }
    }

    pub fn from_key(key: &str) -> Option<Sensor> {
        ALL_SENSORS.iter().copied().find(|s| s.key() == key)
    }
}

/// One sensor read: primary value plus attribute bag, both absent when
/// the backing slot is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub value:      Option<Value>,
    pub attributes: Option<Value>,
}

impl SensorReading {
    fn empty() -> Self {
        Self {
            value: None,
            attributes: None,
        }
    }
}

pub fn read_sensor(
    sensor: Sensor,
    snapshot: &Snapshot,
    club_id: i64,
    last_alert: Option<&GoalAlert>,
) -> SensorReading {
    match sensor {
        Sensor::LastGame => game_reading(snapshot.last_game.as_ref(), club_id),
        Sensor::CurrentGame => game_reading(snapshot.current_game.as_ref(), club_id),
        Sensor::NextGame => game_reading(snapshot.next_game.as_ref(), club_id),
        Sensor::CurrentGoalsHome => goal_reading(snapshot, club_id, |g| g.score_home()),
        Sensor::CurrentGoalsAway => goal_reading(snapshot, club_id, |g| g.score_away()),
        Sensor::CurrentGoalsTotal => {
            goal_reading(snapshot, club_id, |g| g.score_home() + g.score_away())
        }
        Sensor::AdlerGoalAlert => alert_reading(snapshot, last_alert),
    }
}

fn game_reading(game: Option<&Game>, club_id: i64) -> SensorReading {
    let Some(game) = game else {
        return SensorReading::empty();
    };
    SensorReading {
        value: game.status.clone().map(Value::String),
        attributes: Some(json!({
            "game_id": game.id,
            "home_team": game.hometeam,
            "away_team": game.awayteam,
            "opponent": game.opponent_of(club_id),
            "is_home": game.is_club_home(club_id),
            "score_home": game.homescore,
            "score_away": game.awayscore,
            "match_start": match_start_attr(game),
            "status": game.status,
            "goals": game.goals,
            "penalties": game.penalties,
        })),
    }
}

fn goal_reading(snapshot: &Snapshot, club_id: i64, count: impl Fn(&Game) -> i64) -> SensorReading {
    let Some(game) = snapshot.current_game.as_ref() else {
        return SensorReading::empty();
    };
    let club_is_home = game.is_club_home(club_id);
    let goals: Vec<Value> = game
        .goals
        .iter()
        .map(|goal| {
            let own = game.is_club_goal(goal, club_id);
            json!({
                "time": goal.time,
                "scorer": goal.scorer,
                "assists": goal.assists,
                "team": if own { "Adler Mannheim" } else { "Opponent" },
                "is_adler_goal": own,
            })
        })
        .collect();
    SensorReading {
        value: Some(json!(count(game))),
        attributes: Some(json!({
            "adler_is_home": club_is_home,
            "goals": goals,
        })),
    }
}

fn alert_reading(snapshot: &Snapshot, last_alert: Option<&GoalAlert>) -> SensorReading {
    let Some(game) = snapshot.current_game.as_ref() else {
        return SensorReading::empty();
    };
    SensorReading {
        value: last_alert.map(|alert| Value::String(alert.message.clone())),
        attributes: Some(json!({
            "game_id": game.id,
            "home_team": game.hometeam,
            "away_team": game.awayteam,
            "status": game.status,
        })),
    }
}

/// Kickoff attribute: normalized timestamp when parsable, otherwise the
/// raw feed string.
fn match_start_attr(game: &Game) -> Value {
    match game.match_start_ts() {
        Some(ts) => json!(ts.format("%Y-%m-%dT%H:%M:%S").to_string()),
        None => game
            .matchstart
            .as_ref()
            .map(|raw| json!(raw))
            .unwrap_or(Value::Null),
    }
}
