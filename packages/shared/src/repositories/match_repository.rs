use std::collections::HashMap;

use async_trait::async_trait;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use serde_dynamo::{from_item, to_item};
use tracing::{debug, instrument, warn};

use crate::models::match_record::{Match, MatchStatus};
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;

#[cfg(test)]
use mockall::automock;

/// Which matches a listing should return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchFilter {
    All,
    Player(String),
}

impl MatchFilter {
    pub fn matches(&self, record: &Match) -> bool {
        match self {
            MatchFilter::All => true,
            MatchFilter::Player(player_id) => record.has_player(player_id),
        }
    }
}

/// Durable keyed storage for match records.
///
/// `compare_and_swap` must apply atomically: it replaces the stored record only
/// while the stored `move_count` equals `expected_move_count` and the stored
/// record is still ongoing. Terminal records are never overwritten.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MatchRepository: Send + Sync {
    async fn create_match(&self, record: &Match) -> Result<(), MatchRepositoryError>;

    async fn get_match(&self, match_id: &str) -> Result<Match, MatchRepositoryError>;

    async fn compare_and_swap(
        &self,
        match_id: &str,
        expected_move_count: u32,
        next: &Match,
    ) -> Result<Match, MatchRepositoryError>;

    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<Match>, MatchRepositoryError>;

    async fn delete_match(&self, match_id: &str) -> Result<(), MatchRepositoryError>;
}

pub struct DynamoDbMatchRepository {
    pub client: Client,
    pub table_name: String,
}

impl DynamoDbMatchRepository {
    pub fn new(client: Client, table_name: String) -> Self {
        Self { client, table_name }
    }

    fn key(match_id: &str) -> AttributeValue {
        AttributeValue::S(match_id.to_string())
    }
}

/// Decodes a scanned page. One unreadable item fails the whole listing, the
/// same way it fails a point read.
fn decode_items(
    items: Vec<HashMap<String, AttributeValue>>,
) -> Result<Vec<Match>, MatchRepositoryError> {
    items
        .into_iter()
        .map(|item| {
            from_item(item).map_err(|e| {
                warn!("Unreadable match item: {}", e);
                MatchRepositoryError::Serialization(e.to_string())
            })
        })
        .collect()
}

#[async_trait]
impl MatchRepository for DynamoDbMatchRepository {
    #[instrument(skip(self, record), fields(match_id = %record.id))]
    async fn create_match(&self, record: &Match) -> Result<(), MatchRepositoryError> {
        let item =
            to_item(record).map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let conditional_failure = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);
                if conditional_failure {
                    Err(MatchRepositoryError::AlreadyExists)
                } else {
                    Err(MatchRepositoryError::DynamoDb(e.to_string()))
                }
            }
        }
    }

    #[instrument(skip(self))]
    async fn get_match(&self, match_id: &str) -> Result<Match, MatchRepositoryError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key("id", Self::key(match_id))
            .consistent_read(true)
            .send()
            .await
            .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

        if let Some(item) = output.item {
            let record: Match =
                from_item(item).map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;
            Ok(record)
        } else {
            Err(MatchRepositoryError::NotFound)
        }
    }

    #[instrument(skip(self, next))]
    async fn compare_and_swap(
        &self,
        match_id: &str,
        expected_move_count: u32,
        next: &Match,
    ) -> Result<Match, MatchRepositoryError> {
        let item = to_item(next).map_err(|e| MatchRepositoryError::Serialization(e.to_string()))?;

        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(item))
            .condition_expression("move_count = :expected AND #status = :ongoing")
            .expression_attribute_names("#status", "status")
            .expression_attribute_values(
                ":expected",
                AttributeValue::N(expected_move_count.to_string()),
            )
            .expression_attribute_values(
                ":ongoing",
                AttributeValue::S(MatchStatus::Ongoing.as_str().to_string()),
            )
            .send()
            .await;

        match result {
            Ok(_) => Ok(next.clone()),
            Err(e) => {
                let conditional_failure = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);
                if !conditional_failure {
                    return Err(MatchRepositoryError::DynamoDb(e.to_string()));
                }

                // A failed condition also covers a missing item, so look again.
                let current = self.get_match(match_id).await?;
                debug!(
                    expected = expected_move_count,
                    actual = current.move_count,
                    status = %current.status,
                    "Conditional write rejected"
                );
                let actual = (current.move_count != expected_move_count)
                    .then_some(current.move_count);
                Err(MatchRepositoryError::VersionConflict {
                    expected: expected_move_count,
                    actual,
                })
            }
        }
    }

    #[instrument(skip(self))]
    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<Match>, MatchRepositoryError> {
        let mut records = Vec::new();
        let mut start_key: Option<HashMap<String, AttributeValue>> = None;

        loop {
            let mut request = self
                .client
                .scan()
                .table_name(&self.table_name)
                .consistent_read(true)
                .set_exclusive_start_key(start_key.take());

            if let MatchFilter::Player(player_id) = filter {
                request = request
                    .filter_expression("player_a_id = :player OR player_b_id = :player")
                    .expression_attribute_values(":player", AttributeValue::S(player_id.clone()));
            }

            let output = request
                .send()
                .await
                .map_err(|e| MatchRepositoryError::DynamoDb(e.to_string()))?;

            records.extend(decode_items(output.items.unwrap_or_default())?);

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        debug!(count = records.len(), "Matches scanned");
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn delete_match(&self, match_id: &str) -> Result<(), MatchRepositoryError> {
        let result = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .key("id", Self::key(match_id))
            .condition_expression("attribute_exists(id)")
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let conditional_failure = e
                    .as_service_error()
                    .map(|se| se.is_conditional_check_failed_exception())
                    .unwrap_or(false);
                if conditional_failure {
                    Err(MatchRepositoryError::NotFound)
                } else {
                    Err(MatchRepositoryError::DynamoDb(e.to_string()))
                }
            }
        }
    }
}
