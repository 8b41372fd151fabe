use std::sync::Arc;

use tokio::time::Instant;
use tracing::{info, instrument};

use crate::{
    models::auth::Caller,
    repositories::{
        errors::match_repository_errors::MatchRepositoryError, match_repository::MatchRepository,
    },
    services::{
        authorization::{authorize, MatchAction},
        errors::match_service_errors::MatchServiceError,
        match_service::with_deadline,
    },
};

/// Administrative record maintenance that sits outside the match lifecycle.
#[derive(Clone)]
pub struct MatchAdminService {
    repository: Arc<dyn MatchRepository + Send + Sync>,
}

impl MatchAdminService {
    pub fn new(repository: Arc<dyn MatchRepository + Send + Sync>) -> Self {
        MatchAdminService { repository }
    }

    #[instrument(skip(self, caller, deadline), fields(caller_id = %caller.player_id))]
    pub async fn delete_match(
        &self,
        caller: &Caller,
        match_id: &str,
        deadline: Instant,
    ) -> Result<(), MatchServiceError> {
        authorize(caller, MatchAction::Delete, None)?;

        with_deadline(deadline, async {
            self.repository
                .delete_match(match_id)
                .await
                .map_err(|e| match e {
                    MatchRepositoryError::NotFound => MatchServiceError::match_not_found(match_id),
                    other => MatchServiceError::from(other),
                })
        })
        .await?;

        info!(match_id, "Match deleted");
        Ok(())
    }
}
