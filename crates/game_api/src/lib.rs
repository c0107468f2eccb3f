/// Adlerticker — Game API
///
/// Wire model + HTTP client for the club's JSON game feed:
///   GET {base}      → all games of the season (summary records)
///   GET {base}{id}  → one game with full detail (goals, penalties)
///
/// No retries here — a failed poll is simply retried by the next
/// scheduled cycle.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("feed returned HTTP {code}")]
    Status { code: u16 },
}

impl FetchError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            FetchError::Status { code } => Some(*code),
            FetchError::Transport(err) => err.status().map(|s| s.as_u16()),
        }
    }
}

/// Game identifier as the feed sends it — numeric in most seasons,
/// string in some exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameId {
    Num(u64),
    Str(String),
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameId::Num(n) => write!(f, "{n}"),
            GameId::Str(s) => write!(f, "{s}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GoalEvent {
    #[serde(default)]
    pub time:    Option<Value>,
    #[serde(default)]
    pub scorer:  Option<Value>,
    #[serde(default)]
    pub assists: Vec<Value>,
    #[serde(default)]
    pub clubid:  Option<i64>,
}

/// One game as the feed reports it. The list endpoint sends summary
/// records; the detail endpoint sends the same shape with goals and
/// penalties filled in. Field names mirror the feed's JSON keys.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Game {
    #[serde(default)]
    pub id:         Option<GameId>,
    #[serde(default)]
    pub status:     Option<String>,
    #[serde(default)]
    pub matchstart: Option<String>,
    #[serde(default)]
    pub homeclubid: Option<i64>,
    #[serde(default)]
    pub awayclubid: Option<i64>,
    #[serde(default)]
    pub hometeam:   Option<Value>,
    #[serde(default)]
    pub awayteam:   Option<Value>,
    #[serde(default)]
    pub homescore:  Option<i64>,
    #[serde(default)]
    pub awayscore:  Option<i64>,
    #[serde(default)]
    pub goals:      Vec<GoalEvent>,
    #[serde(default)]
    pub penalties:  Vec<Value>,
}

impl Game {
    /// Home score, 0 when the feed omits or nulls it.
    pub fn score_home(&self) -> i64 {
        self.homescore.unwrap_or(0)
    }

    /// Away score, 0 when the feed omits or nulls it.
    pub fn score_away(&self) -> i64 {
        self.awayscore.unwrap_or(0)
    }

    pub fn is_club_home(&self, club_id: i64) -> bool {
        self.homeclubid == Some(club_id)
    }

    /// The team blob of whoever the tracked club plays against.
    pub fn opponent_of(&self, club_id: i64) -> Option<&Value> {
        if self.is_club_home(club_id) {
            self.awayteam.as_ref()
        } else {
            self.hometeam.as_ref()
        }
    }

    /// Did the tracked club score this goal? Keyed on which score column
    /// the club occupies, same as the scoreboard itself.
    pub fn is_club_goal(&self, goal: &GoalEvent, club_id: i64) -> bool {
        let scorer = match goal.clubid {
            Some(id) => id,
            None => return false,
        };
        if self.is_club_home(club_id) {
            self.homeclubid == Some(scorer)
        } else {
            self.awayclubid == Some(scorer)
        }
    }

    /// Kickoff as a timestamp. The feed usually sends plain ISO-8601
    /// without an offset; some exports carry one. `None` when absent or
    /// unparsable — callers fall back to the raw string.
    pub fn match_start_ts(&self) -> Option<NaiveDateTime> {
        let raw = self.matchstart.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.naive_utc())
            .or_else(|_| raw.parse::<NaiveDateTime>())
            .ok()
    }
}

#[async_trait]
pub trait GameFetcher: Send + Sync {
    async fn game_list(&self) -> Result<Vec<Game>, FetchError>;
    async fn game_detail(&self, id: &GameId) -> Result<Game, FetchError>;
}

pub struct GameClient {
    client:   reqwest::Client,
    base_url: String,
}

impl GameClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("adlerticker-live/0.1")
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl GameFetcher for GameClient {
    async fn game_list(&self) -> Result<Vec<Game>, FetchError> {
        let resp = self.client.get(&self.base_url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { code: status.as_u16() });
        }
        let games = resp.json::<Vec<Game>>().await?;
        debug!("fetched {} games from feed", games.len());
        Ok(games)
    }

    async fn game_detail(&self, id: &GameId) -> Result<Game, FetchError> {
        let url = format!("{}{}", self.base_url, id);
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { code: status.as_u16() });
        }
        Ok(resp.json::<Game>().await?)
    }
}
