use crate::models::auth::Caller;
use crate::models::match_record::Match;
use crate::services::errors::match_service_errors::MatchServiceError;

/// Actions the engine authorizes against a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAction {
    /// Append the next move. Only the seat on turn, or an admin.
    SubmitMove,
    /// Move the match to a terminal status. Either seat, or an admin.
    EndMatch,
    /// Read every match regardless of seats.
    ListAll,
    /// Remove a match record outright.
    Delete,
}

/// Single authorization predicate evaluated before any state change.
///
/// `record` is required for seat-scoped actions and ignored otherwise.
pub fn authorize(
    caller: &Caller,
    action: MatchAction,
    record: Option<&Match>,
) -> Result<(), MatchServiceError> {
    if caller.is_admin {
        return Ok(());
    }

    match (action, record) {
        (MatchAction::SubmitMove, Some(record)) => {
            if record.expected_mover() == caller.player_id {
                Ok(())
            } else if record.has_player(&caller.player_id) {
                Err(MatchServiceError::PermissionDenied(format!(
                    "It is not {}'s turn",
                    caller.player_id
                )))
            } else {
                Err(MatchServiceError::PermissionDenied(format!(
                    "{} is not a player in match {}",
                    caller.player_id, record.id
                )))
            }
        }
        (MatchAction::EndMatch, Some(record)) => {
            if record.has_player(&caller.player_id) {
                Ok(())
            } else {
                Err(MatchServiceError::PermissionDenied(format!(
                    "{} is not a player in match {}",
                    caller.player_id, record.id
                )))
            }
        }
        (MatchAction::SubmitMove | MatchAction::EndMatch, None) => Err(
            MatchServiceError::PermissionDenied("No match to authorize against".to_string()),
        ),
        (MatchAction::ListAll | MatchAction::Delete, _) => Err(
            MatchServiceError::PermissionDenied("This operation is for admins only".to_string()),
        ),
    }
}
