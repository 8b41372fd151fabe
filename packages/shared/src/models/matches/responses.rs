use serde::{Deserialize, Serialize};

use crate::models::match_record::{Match, MatchStatus};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchResponse {
    #[serde(rename = "match")]
    pub record: Match,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<Match>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MovesResponse {
    pub match_id: String,
    pub moves: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndMatchResponse {
    pub message: String,
    pub match_id: String,
    pub status: MatchStatus,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}
