use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use lambda_http::tracing::debug;
use shared::models::auth::Caller;
use shared::services::errors::access_policy_errors::AccessPolicyError;

use crate::{error::ApiError, state::AppState};

/// The caller identity, resolved through the configured access policy.
#[derive(Debug, Clone)]
pub struct AuthenticatedPlayer(pub Caller);

impl FromRequestParts<AppState> for AuthenticatedPlayer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Extract Authorization header
        let header = match parts.headers.get(AUTHORIZATION) {
            Some(value) => Some(value.to_str().map_err(|_| {
                ApiError::from(AccessPolicyError::MalformedHeader(
                    "Invalid header format".to_string(),
                ))
            })?),
            None => None,
        };

        // Verify the Bearer token and resolve the caller
        let caller = state.access_policy.resolve(header).map_err(|e| {
            debug!("Rejected request credentials: {}", e);
            ApiError::from(e)
        })?;

        Ok(AuthenticatedPlayer(caller))
    }
}
