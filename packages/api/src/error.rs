use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::models::matches::responses::ErrorResponse;
use shared::services::errors::{
    access_policy_errors::AccessPolicyError,
    match_service_errors::{ErrorKind, MatchServiceError},
};

#[derive(Debug)]
pub enum ApiError {
    MatchService(MatchServiceError),
    AccessPolicy(AccessPolicyError),
    BadRequest(String),
}

impl From<MatchServiceError> for ApiError {
    fn from(error: MatchServiceError) -> Self {
        ApiError::MatchService(error)
    }
}

impl From<AccessPolicyError> for ApiError {
    fn from(error: AccessPolicyError) -> Self {
        ApiError::AccessPolicy(error)
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::MatchService(err) => err.kind(),
            ApiError::AccessPolicy(_) => ErrorKind::Unauthenticated,
            ApiError::BadRequest(_) => ErrorKind::InvalidArgument,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::InvalidArgument => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorKind::FailedPrecondition | ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InvalidMove => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::DeadlineExceeded => StatusCode::GATEWAY_TIMEOUT,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::MatchService(err) => write!(f, "{}", err),
            ApiError::AccessPolicy(err) => write!(f, "{}", err),
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.to_string(),
            kind: self.kind().as_str().to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
