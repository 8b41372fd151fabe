use serde::{Deserialize, Serialize};

/// Body of a create-match request. `game_type` stays a string so unknown values
/// surface as an invalid-argument error instead of a decoding failure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateMatchRequest {
    pub player_a_id: String,
    pub player_b_id: String,
    pub game_type: String,
    #[serde(default)]
    pub game_time: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmitMoveRequest {
    #[serde(rename = "move")]
    pub notation: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EndMatchRequest {
    #[serde(default)]
    pub status: Option<String>,
}
