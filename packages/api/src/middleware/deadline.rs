use std::convert::Infallible;
use std::time::Duration;

use axum::{extract::FromRequestParts, http::request::Parts};
use tokio::time::Instant;

use crate::state::AppState;

pub const REQUEST_TIMEOUT_HEADER: &str = "x-request-timeout-ms";

/// Absolute deadline for the request. Clients may shorten the configured
/// timeout through `x-request-timeout-ms` but never extend it.
#[derive(Debug, Clone, Copy)]
pub struct RequestDeadline(pub Instant);

impl FromRequestParts<AppState> for RequestDeadline {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let requested = parts
            .headers
            .get(REQUEST_TIMEOUT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_millis);

        // Never extend past the configured timeout
        let timeout = match requested {
            Some(requested) => requested.min(state.request_timeout),
            None => state.request_timeout,
        };

        Ok(RequestDeadline(Instant::now() + timeout))
    }
}
