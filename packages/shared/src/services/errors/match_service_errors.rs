use std::fmt;

use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use crate::services::errors::access_policy_errors::AccessPolicyError;

/// Caller-visible error categories of the match engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    PermissionDenied,
    FailedPrecondition,
    InvalidMove,
    Conflict,
    DeadlineExceeded,
    Unauthenticated,
    Unavailable,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "invalid_argument",
            ErrorKind::NotFound => "not_found",
            ErrorKind::PermissionDenied => "permission_denied",
            ErrorKind::FailedPrecondition => "failed_precondition",
            ErrorKind::InvalidMove => "invalid_move",
            ErrorKind::Conflict => "conflict",
            ErrorKind::DeadlineExceeded => "deadline_exceeded",
            ErrorKind::Unauthenticated => "unauthenticated",
            ErrorKind::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub enum MatchServiceError {
    InvalidArgument(String),
    NotFound(String),
    PermissionDenied(String),
    FailedPrecondition(String),
    InvalidMove(String),
    Conflict(String),
    DeadlineExceeded,
    Unauthenticated(String),
    Unavailable(String),
}

impl MatchServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MatchServiceError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            MatchServiceError::NotFound(_) => ErrorKind::NotFound,
            MatchServiceError::PermissionDenied(_) => ErrorKind::PermissionDenied,
            MatchServiceError::FailedPrecondition(_) => ErrorKind::FailedPrecondition,
            MatchServiceError::InvalidMove(_) => ErrorKind::InvalidMove,
            MatchServiceError::Conflict(_) => ErrorKind::Conflict,
            MatchServiceError::DeadlineExceeded => ErrorKind::DeadlineExceeded,
            MatchServiceError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            MatchServiceError::Unavailable(_) => ErrorKind::Unavailable,
        }
    }

    pub fn match_not_found(match_id: &str) -> Self {
        MatchServiceError::NotFound(format!("Match {} not found", match_id))
    }

    pub fn match_already_ended() -> Self {
        MatchServiceError::FailedPrecondition("match already ended".to_string())
    }
}

impl fmt::Display for MatchServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MatchServiceError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            MatchServiceError::NotFound(msg) => write!(f, "Not found: {}", msg),
            MatchServiceError::PermissionDenied(msg) => write!(f, "Permission denied: {}", msg),
            MatchServiceError::FailedPrecondition(msg) => {
                write!(f, "Failed precondition: {}", msg)
            }
            MatchServiceError::InvalidMove(msg) => write!(f, "Invalid move: {}", msg),
            MatchServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            MatchServiceError::DeadlineExceeded => write!(f, "Deadline exceeded"),
            MatchServiceError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            MatchServiceError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
        }
    }
}

impl std::error::Error for MatchServiceError {}

/// Version conflicts are resolved inside the engine's retry loop, so one that
/// reaches this conversion means the write could not be linearized.
impl From<MatchRepositoryError> for MatchServiceError {
    fn from(err: MatchRepositoryError) -> Self {
        match err {
            MatchRepositoryError::NotFound => {
                MatchServiceError::NotFound("Match not found".to_string())
            }
            MatchRepositoryError::AlreadyExists => {
                MatchServiceError::Conflict("Match already exists".to_string())
            }
            MatchRepositoryError::VersionConflict { .. } => {
                MatchServiceError::Conflict(err.to_string())
            }
            MatchRepositoryError::Serialization(_) | MatchRepositoryError::DynamoDb(_) => {
                MatchServiceError::Unavailable(err.to_string())
            }
        }
    }
}

impl From<AccessPolicyError> for MatchServiceError {
    fn from(err: AccessPolicyError) -> Self {
        MatchServiceError::Unauthenticated(err.to_string())
    }
}
