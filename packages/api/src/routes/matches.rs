use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use lambda_http::tracing::{debug, error};
use shared::models::matches::{
    requests::{CreateMatchRequest, EndMatchRequest, SubmitMoveRequest},
    responses::{EndMatchResponse, MatchResponse, MatchesResponse, MovesResponse},
};

use crate::{
    error::ApiError,
    middleware::{auth::AuthenticatedPlayer, deadline::RequestDeadline},
    state::AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/matches", post(create_match).get(get_matches_for_player))
        .route("/matches/all", get(get_all_matches))
        .route("/matches/{id}", get(get_match).delete(delete_match))
        .route("/matches/{id}/moves", post(submit_move).get(list_moves))
        .route("/matches/{id}/end", put(end_match))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

async fn create_match(
    State(state): State<AppState>,
    AuthenticatedPlayer(caller): AuthenticatedPlayer,
    RequestDeadline(deadline): RequestDeadline,
    payload: Result<Json<CreateMatchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MatchResponse>), ApiError> {
    let request = body(payload)?;

    // Validation of players and game type happens in the service
    let record = state
        .match_service
        .create_match(&caller, &request, deadline)
        .await
        .map_err(|e| {
            error!(
                "Failed to create match between {} and {}: {}",
                request.player_a_id, request.player_b_id, e
            );
            ApiError::from(e)
        })?;

    debug!("Match created successfully: {}", record.id);
    Ok((StatusCode::CREATED, Json(MatchResponse { record })))
}

async fn get_matches_for_player(
    State(state): State<AppState>,
    AuthenticatedPlayer(caller): AuthenticatedPlayer,
    RequestDeadline(deadline): RequestDeadline,
) -> Result<Json<MatchesResponse>, ApiError> {
    state
        .match_service
        .get_matches_for_player(&caller, deadline)
        .await
        .map(|matches| Json(MatchesResponse { matches }))
        .map_err(|e| {
            error!("Failed to list matches for {}: {}", caller.player_id, e);
            ApiError::from(e)
        })
}

async fn get_all_matches(
    State(state): State<AppState>,
    AuthenticatedPlayer(caller): AuthenticatedPlayer,
    RequestDeadline(deadline): RequestDeadline,
) -> Result<Json<MatchesResponse>, ApiError> {
    state
        .match_service
        .get_all_matches(&caller, deadline)
        .await
        .map(|matches| Json(MatchesResponse { matches }))
        .map_err(|e| {
            error!("Failed to list all matches for {}: {}", caller.player_id, e);
            ApiError::from(e)
        })
}

async fn get_match(
    State(state): State<AppState>,
    AuthenticatedPlayer(_caller): AuthenticatedPlayer,
    RequestDeadline(deadline): RequestDeadline,
    Path(match_id): Path<String>,
) -> Result<Json<MatchResponse>, ApiError> {
    state
        .match_service
        .get_match(&match_id, deadline)
        .await
        .map(|record| Json(MatchResponse { record }))
        .map_err(|e| {
            error!("Failed to retrieve match {}: {}", match_id, e);
            ApiError::from(e)
        })
}

async fn delete_match(
    State(state): State<AppState>,
    AuthenticatedPlayer(caller): AuthenticatedPlayer,
    RequestDeadline(deadline): RequestDeadline,
    Path(match_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    // Admin check happens in the service
    state
        .admin_service
        .delete_match(&caller, &match_id, deadline)
        .await
        .map_err(|e| {
            error!("Failed to delete match {}: {}", match_id, e);
            ApiError::from(e)
        })?;
    debug!("Match deleted successfully: {}", match_id);
    Ok(StatusCode::NO_CONTENT)
}

async fn submit_move(
    State(state): State<AppState>,
    AuthenticatedPlayer(caller): AuthenticatedPlayer,
    RequestDeadline(deadline): RequestDeadline,
    Path(match_id): Path<String>,
    payload: Result<Json<SubmitMoveRequest>, JsonRejection>,
) -> Result<Json<MatchResponse>, ApiError> {
    let request = body(payload)?;

    // Illegal and out-of-turn moves log at debug
    let record = state
        .match_service
        .submit_move(&caller, &match_id, &request.notation, deadline)
        .await
        .map_err(|e| {
            debug!(
                "Move {} by {} rejected in match {}: {}",
                request.notation, caller.player_id, match_id, e
            );
            ApiError::from(e)
        })?;

    Ok(Json(MatchResponse { record }))
}

async fn list_moves(
    State(state): State<AppState>,
    AuthenticatedPlayer(_caller): AuthenticatedPlayer,
    RequestDeadline(deadline): RequestDeadline,
    Path(match_id): Path<String>,
) -> Result<Json<MovesResponse>, ApiError> {
    let moves = state
        .match_service
        .list_moves(&match_id, deadline)
        .await
        .map_err(|e| {
            error!("Failed to list moves for match {}: {}", match_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(MovesResponse { match_id, moves }))
}

async fn end_match(
    State(state): State<AppState>,
    AuthenticatedPlayer(caller): AuthenticatedPlayer,
    RequestDeadline(deadline): RequestDeadline,
    Path(match_id): Path<String>,
    payload: Result<Option<Json<EndMatchRequest>>, JsonRejection>,
) -> Result<Json<EndMatchResponse>, ApiError> {
    // No JSON body means the default terminal status
    let request = payload
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?
        .map(|Json(request)| request)
        .unwrap_or_default();
    let record = state
        .match_service
        .end_match(&caller, &match_id, request.status.as_deref(), deadline)
        .await
        .map_err(|e| {
            error!("Failed to end match {}: {}", match_id, e);
            ApiError::from(e)
        })?;

    Ok(Json(EndMatchResponse {
        message: "Match ended successfully".to_string(),
        match_id: record.id,
        status: record.status,
    }))
}
