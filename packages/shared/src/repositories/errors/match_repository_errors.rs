#[derive(Debug)]
pub enum MatchRepositoryError {
    NotFound,
    AlreadyExists,
    VersionConflict { expected: u32, actual: Option<u32> },
    Serialization(String),
    DynamoDb(String),
}

impl std::fmt::Display for MatchRepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchRepositoryError::NotFound => write!(f, "Match not found"),
            MatchRepositoryError::AlreadyExists => write!(f, "Match already exists"),
            MatchRepositoryError::VersionConflict {
                expected,
                actual: Some(actual),
            } => write!(
                f,
                "Version conflict: expected move count {}, found {}",
                expected, actual
            ),
            MatchRepositoryError::VersionConflict {
                expected,
                actual: None,
            } => write!(
                f,
                "Version conflict: match no longer writable at move count {}",
                expected
            ),
            MatchRepositoryError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            MatchRepositoryError::DynamoDb(msg) => write!(f, "DynamoDB error: {}", msg),
        }
    }
}

impl std::error::Error for MatchRepositoryError {}
