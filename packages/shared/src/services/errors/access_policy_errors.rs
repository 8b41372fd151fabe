use std::fmt;

#[derive(Debug)]
pub enum AccessPolicyError {
    MissingCredentials,
    MalformedHeader(String),
    InvalidToken,
    ExpiredToken,
    JwtError(String),
}

impl fmt::Display for AccessPolicyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AccessPolicyError::MissingCredentials => write!(f, "Missing Authorization header"),
            AccessPolicyError::MalformedHeader(msg) => {
                write!(f, "Malformed Authorization header: {}", msg)
            }
            AccessPolicyError::InvalidToken => write!(f, "Invalid JWT token"),
            AccessPolicyError::ExpiredToken => write!(f, "JWT token has expired"),
            AccessPolicyError::JwtError(msg) => write!(f, "JWT error: {}", msg),
        }
    }
}

impl std::error::Error for AccessPolicyError {}
