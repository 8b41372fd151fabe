use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    Ongoing,
    Completed,
    Aborted,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Ongoing => "ongoing",
            MatchStatus::Completed => "completed",
            MatchStatus::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, MatchStatus::Ongoing)
    }
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ongoing" => Ok(MatchStatus::Ongoing),
            "completed" => Ok(MatchStatus::Completed),
            "aborted" => Ok(MatchStatus::Aborted),
            other => Err(format!("Unknown match status: {}", other)),
        }
    }
}

/// Display category of a match. No clock is enforced for any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Bullet,
    Blitz,
    Classic,
}

impl GameType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::Bullet => "bullet",
            GameType::Blitz => "blitz",
            GameType::Classic => "classic",
        }
    }
}

impl fmt::Display for GameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "bullet" => Ok(GameType::Bullet),
            "blitz" => Ok(GameType::Blitz),
            "classic" => Ok(GameType::Classic),
            other => Err(format!("Invalid game type: {}", other)),
        }
    }
}

/// A two-player match record as held by the session store.
///
/// `move_count` always equals `moves.len()` and doubles as the version token
/// for compare-and-swap writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    pub player_a_id: String,
    pub player_b_id: String,
    pub status: MatchStatus,
    pub moves: Vec<String>,
    pub move_count: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
    pub game_type: GameType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_state: Option<String>,
}

impl Match {
    pub fn new(player_a_id: &str, player_b_id: &str, game_type: GameType) -> Self {
        Match {
            id: Uuid::new_v4().to_string(),
            player_a_id: player_a_id.to_string(),
            player_b_id: player_b_id.to_string(),
            status: MatchStatus::Ongoing,
            moves: vec![],
            move_count: 0,
            started_at: Utc::now(),
            ended_at: None,
            game_type,
            game_time: None,
            board_state: None,
        }
    }

    pub fn with_game_time(mut self, game_time: Option<u32>) -> Self {
        self.game_time = game_time;
        self
    }

    /// The player allowed to make the next move: player A on even counts.
    pub fn expected_mover(&self) -> &str {
        if self.move_count % 2 == 0 {
            &self.player_a_id
        } else {
            &self.player_b_id
        }
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.player_a_id == player_id || self.player_b_id == player_id
    }

    pub fn is_ongoing(&self) -> bool {
        self.status == MatchStatus::Ongoing
    }

    /// Returns the successor record with `notation` appended.
    pub fn with_move(&self, notation: &str, board_state: Option<String>) -> Match {
        let mut next = self.clone();
        next.moves.push(notation.to_string());
        next.move_count = next.moves.len() as u32;
        if board_state.is_some() {
            next.board_state = board_state;
        }
        next
    }

    /// Returns the successor record in the given terminal status.
    pub fn ended(&self, status: MatchStatus, ended_at: DateTime<Utc>) -> Match {
        let mut next = self.clone();
        next.status = status;
        next.ended_at = Some(ended_at);
        next
    }
}
