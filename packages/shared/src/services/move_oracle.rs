use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chess::{Board, BoardStatus, ChessMove, Piece, Square};
use tracing::debug;

#[cfg(test)]
use mockall::automock;

/// Board position after an accepted move, opaque to the match engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRejection {
    pub reason: String,
}

impl MoveRejection {
    pub fn new(reason: impl Into<String>) -> Self {
        MoveRejection {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MoveRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reason)
    }
}

impl std::error::Error for MoveRejection {}

/// External rules authority for move legality.
///
/// Every call receives the full prior move sequence; implementations may cache
/// but must answer as if replaying from the start.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MoveOracle: Send + Sync {
    async fn validate(
        &self,
        prior_moves: &[String],
        candidate: &str,
    ) -> Result<BoardState, MoveRejection>;
}

/// Standard chess rules backed by the `chess` crate.
///
/// Accepts SAN (`e4`, `Nf3`, `O-O`) and coordinate notation (`e2e4`, `e7e8q`).
#[derive(Clone, Default)]
pub struct ChessMoveOracle;

impl ChessMoveOracle {
    pub fn new() -> Self {
        ChessMoveOracle
    }

    /// Replays `prior_moves` from the initial position.
    pub fn replay(&self, prior_moves: &[String]) -> Result<Board, MoveRejection> {
        let mut board = Board::default();
        for (index, notation) in prior_moves.iter().enumerate() {
            let chess_move = parse_move(&board, notation).ok_or_else(|| {
                MoveRejection::new(format!(
                    "Invalid previous move {} at ply {}",
                    notation,
                    index + 1
                ))
            })?;
            if !board.legal(chess_move) {
                return Err(MoveRejection::new(format!(
                    "Illegal previous move {} at ply {}",
                    notation,
                    index + 1
                )));
            }
            board = board.make_move_new(chess_move);
        }
        Ok(board)
    }

    pub fn apply(&self, prior_moves: &[String], candidate: &str) -> Result<Board, MoveRejection> {
        let board = self.replay(prior_moves)?;

        if board.status() != BoardStatus::Ongoing {
            return Err(MoveRejection::new("Game is already over on the board"));
        }

        let chess_move = parse_move(&board, candidate)
            .ok_or_else(|| MoveRejection::new(format!("Invalid move format: {}", candidate)))?;

        if !board.legal(chess_move) {
            return Err(MoveRejection::new(format!("Illegal move: {}", candidate)));
        }

        Ok(board.make_move_new(chess_move))
    }
}

#[async_trait]
impl MoveOracle for ChessMoveOracle {
    async fn validate(
        &self,
        prior_moves: &[String],
        candidate: &str,
    ) -> Result<BoardState, MoveRejection> {
        let board = self.apply(prior_moves, candidate)?;
        debug!(ply = prior_moves.len() + 1, candidate, "Move accepted");
        Ok(BoardState {
            position: format!("{}", board),
        })
    }
}

fn parse_move(board: &Board, notation: &str) -> Option<ChessMove> {
    let notation = notation.trim();
    if notation.is_empty() {
        return None;
    }
    ChessMove::from_san(board, &san_for_parser(notation))
        .ok()
        .or_else(|| parse_coordinate_move(notation))
}

/// Drops check/mate suffixes and the `=` of a promotion (`bxa8=Q+` -> `bxa8Q`),
/// which the `chess` SAN parser does not read.
fn san_for_parser(notation: &str) -> String {
    notation
        .trim_end_matches(&['+', '#'][..])
        .replace('=', "")
}

fn parse_coordinate_move(notation: &str) -> Option<ChessMove> {
    if !notation.is_ascii() || !(notation.len() == 4 || notation.len() == 5) {
        return None;
    }

    let from_sq = Square::from_str(&notation[0..2]).ok()?;
    let to_sq = Square::from_str(&notation[2..4]).ok()?;

    let promotion = match notation.get(4..5) {
        Some(p) => Some(match p {
            "q" => Piece::Queen,
            "r" => Piece::Rook,
            "b" => Piece::Bishop,
            "n" => Piece::Knight,
            _ => return None,
        }),
        None => None,
    };

    Some(ChessMove::new(from_sq, to_sq, promotion))
}
