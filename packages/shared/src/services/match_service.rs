use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, instrument, warn};

use crate::{
    models::{
        auth::Caller,
        match_record::{GameType, Match, MatchStatus},
        matches::requests::CreateMatchRequest,
    },
    repositories::{
        errors::match_repository_errors::MatchRepositoryError,
        match_repository::{MatchFilter, MatchRepository},
    },
    services::{
        authorization::{authorize, MatchAction},
        errors::match_service_errors::MatchServiceError,
        move_oracle::MoveOracle,
    },
};

pub const DEFAULT_MAX_MOVE_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct MatchServiceConfig {
    /// How many times a write may lose the optimistic race before giving up.
    pub max_move_attempts: u32,
}

impl Default for MatchServiceConfig {
    fn default() -> Self {
        MatchServiceConfig {
            max_move_attempts: DEFAULT_MAX_MOVE_ATTEMPTS,
        }
    }
}

/// Outcome of one optimistic read-validate-write pass.
enum Attempt {
    Applied(Match),
    LostRace,
}

/// The match session engine: lifecycle, turn order and serialized writes.
#[derive(Clone)]
pub struct MatchService {
    repository: Arc<dyn MatchRepository + Send + Sync>,
    oracle: Arc<dyn MoveOracle + Send + Sync>,
    config: MatchServiceConfig,
}

impl MatchService {
    pub fn new(
        repository: Arc<dyn MatchRepository + Send + Sync>,
        oracle: Arc<dyn MoveOracle + Send + Sync>,
    ) -> Self {
        MatchService {
            repository,
            oracle,
            config: MatchServiceConfig::default(),
        }
    }

    pub fn with_config(mut self, config: MatchServiceConfig) -> Self {
        self.config = MatchServiceConfig {
            max_move_attempts: config.max_move_attempts.max(1),
        };
        self
    }

    #[instrument(skip(self, caller, request, deadline), fields(caller_id = %caller.player_id))]
    pub async fn create_match(
        &self,
        caller: &Caller,
        request: &CreateMatchRequest,
        deadline: Instant,
    ) -> Result<Match, MatchServiceError> {
        with_deadline(deadline, async {
            let player_a = request.player_a_id.trim();
            let player_b = request.player_b_id.trim();

            if player_a.is_empty() || player_b.is_empty() {
                return Err(MatchServiceError::InvalidArgument(
                    "Player IDs cannot be empty".to_string(),
                ));
            }
            if player_a == player_b {
                return Err(MatchServiceError::InvalidArgument(
                    "Player A and player B cannot be the same".to_string(),
                ));
            }
            let game_type: GameType = request
                .game_type
                .parse()
                .map_err(MatchServiceError::InvalidArgument)?;

            let record = Match::new(player_a, player_b, game_type).with_game_time(request.game_time);
            self.repository.create_match(&record).await?;

            info!(
                match_id = %record.id,
                player_a,
                player_b,
                game_type = %game_type,
                admin = caller.is_admin,
                "Match created"
            );
            Ok(record)
        })
        .await
    }

    /// Appends `notation` as the next move. Lost optimistic races restart the
    /// whole check sequence, up to `max_move_attempts` passes.
    #[instrument(skip(self, caller, deadline), fields(caller_id = %caller.player_id))]
    pub async fn submit_move(
        &self,
        caller: &Caller,
        match_id: &str,
        notation: &str,
        deadline: Instant,
    ) -> Result<Match, MatchServiceError> {
        with_deadline(deadline, async {
            let notation = notation.trim();
            if notation.is_empty() {
                return Err(MatchServiceError::InvalidArgument(
                    "Move cannot be empty".to_string(),
                ));
            }

            for attempt in 1..=self.config.max_move_attempts {
                match self.try_submit_move(caller, match_id, notation).await? {
                    Attempt::Applied(record) => {
                        info!(match_id, move_count = record.move_count, "Move applied");
                        return Ok(record);
                    }
                    Attempt::LostRace => {
                        debug!(match_id, attempt, "Lost optimistic race, retrying");
                    }
                }
            }

            warn!(match_id, "Giving up on move after repeated version conflicts");
            Err(MatchServiceError::Conflict(format!(
                "Match {} changed concurrently {} times; move not applied",
                match_id, self.config.max_move_attempts
            )))
        })
        .await
    }

    async fn try_submit_move(
        &self,
        caller: &Caller,
        match_id: &str,
        notation: &str,
    ) -> Result<Attempt, MatchServiceError> {
        let current = self.load(match_id).await?;
        if !current.is_ongoing() {
            return Err(MatchServiceError::match_already_ended());
        }
        authorize(caller, MatchAction::SubmitMove, Some(&current))?;

        let board = self
            .oracle
            .validate(&current.moves, notation)
            .await
            .map_err(|rejection| MatchServiceError::InvalidMove(rejection.reason))?;

        let next = current.with_move(notation, Some(board.position));
        self.write(&current, &next).await
    }

    /// Moves an ongoing match to `status` (default `completed`).
    #[instrument(skip(self, caller, deadline), fields(caller_id = %caller.player_id))]
    pub async fn end_match(
        &self,
        caller: &Caller,
        match_id: &str,
        status: Option<&str>,
        deadline: Instant,
    ) -> Result<Match, MatchServiceError> {
        with_deadline(deadline, async {
            let status = parse_terminal_status(status)?;

            for attempt in 1..=self.config.max_move_attempts {
                match self.try_end_match(caller, match_id, status).await? {
                    Attempt::Applied(record) => {
                        info!(match_id, status = %record.status, "Match ended");
                        return Ok(record);
                    }
                    Attempt::LostRace => {
                        debug!(match_id, attempt, "Match advanced while ending, retrying");
                    }
                }
            }

            Err(MatchServiceError::Conflict(format!(
                "Match {} changed concurrently {} times; not ended",
                match_id, self.config.max_move_attempts
            )))
        })
        .await
    }

    async fn try_end_match(
        &self,
        caller: &Caller,
        match_id: &str,
        status: MatchStatus,
    ) -> Result<Attempt, MatchServiceError> {
        let current = self.load(match_id).await?;
        if !current.is_ongoing() {
            return Err(MatchServiceError::match_already_ended());
        }
        authorize(caller, MatchAction::EndMatch, Some(&current))?;

        let next = current.ended(status, Utc::now());
        self.write(&current, &next).await
    }

    pub async fn list_moves(
        &self,
        match_id: &str,
        deadline: Instant,
    ) -> Result<Vec<String>, MatchServiceError> {
        with_deadline(deadline, async {
            self.load(match_id).await.map(|record| record.moves)
        })
        .await
    }

    pub async fn get_match(
        &self,
        match_id: &str,
        deadline: Instant,
    ) -> Result<Match, MatchServiceError> {
        with_deadline(deadline, self.load(match_id)).await
    }

    /// Matches the caller sits in; admins see every match.
    #[instrument(skip(self, caller, deadline), fields(caller_id = %caller.player_id))]
    pub async fn get_matches_for_player(
        &self,
        caller: &Caller,
        deadline: Instant,
    ) -> Result<Vec<Match>, MatchServiceError> {
        let filter = if caller.is_admin {
            MatchFilter::All
        } else {
            MatchFilter::Player(caller.player_id.clone())
        };
        with_deadline(deadline, self.list(filter)).await
    }

    #[instrument(skip(self, caller, deadline), fields(caller_id = %caller.player_id))]
    pub async fn get_all_matches(
        &self,
        caller: &Caller,
        deadline: Instant,
    ) -> Result<Vec<Match>, MatchServiceError> {
        authorize(caller, MatchAction::ListAll, None)?;
        with_deadline(deadline, self.list(MatchFilter::All)).await
    }

    async fn load(&self, match_id: &str) -> Result<Match, MatchServiceError> {
        self.repository
            .get_match(match_id)
            .await
            .map_err(|e| match e {
                MatchRepositoryError::NotFound => MatchServiceError::match_not_found(match_id),
                other => MatchServiceError::from(other),
            })
    }

    async fn list(&self, filter: MatchFilter) -> Result<Vec<Match>, MatchServiceError> {
        let mut records = self.repository.list_matches(&filter).await?;
        records.sort_by(|a, b| {
            a.started_at
                .cmp(&b.started_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records)
    }

    async fn write(&self, current: &Match, next: &Match) -> Result<Attempt, MatchServiceError> {
        match self
            .repository
            .compare_and_swap(&current.id, current.move_count, next)
            .await
        {
            Ok(stored) => Ok(Attempt::Applied(stored)),
            Err(MatchRepositoryError::VersionConflict { expected, actual }) => {
                debug!(match_id = %current.id, expected, ?actual, "Version conflict");
                Ok(Attempt::LostRace)
            }
            Err(MatchRepositoryError::NotFound) => {
                Err(MatchServiceError::match_not_found(&current.id))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn parse_terminal_status(status: Option<&str>) -> Result<MatchStatus, MatchServiceError> {
    let status = match status {
        None => return Ok(MatchStatus::Completed),
        Some(value) => value
            .trim()
            .parse::<MatchStatus>()
            .map_err(MatchServiceError::InvalidArgument)?,
    };
    if !status.is_terminal() {
        return Err(MatchServiceError::InvalidArgument(
            "A match can only end as completed or aborted".to_string(),
        ));
    }
    Ok(status)
}

pub(crate) async fn with_deadline<T, F>(deadline: Instant, operation: F) -> Result<T, MatchServiceError>
where
    F: Future<Output = Result<T, MatchServiceError>>,
{
    if Instant::now() >= deadline {
        return Err(MatchServiceError::DeadlineExceeded);
    }
    match timeout_at(deadline, operation).await {
        Ok(result) => result,
        Err(_) => {
            warn!("Operation exceeded its deadline");
            Err(MatchServiceError::DeadlineExceeded)
        }
    }
}
