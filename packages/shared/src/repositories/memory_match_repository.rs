use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::models::match_record::Match;
use crate::repositories::errors::match_repository_errors::MatchRepositoryError;
use crate::repositories::match_repository::{MatchFilter, MatchRepository};

/// Process-local match store. Each call takes the lock once and releases it
/// before returning, so the check and the write of a compare-and-swap happen
/// under the same guard.
#[derive(Default)]
pub struct InMemoryMatchRepository {
    matches: RwLock<HashMap<String, Match>>,
}

impl InMemoryMatchRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MatchRepository for InMemoryMatchRepository {
    async fn create_match(&self, record: &Match) -> Result<(), MatchRepositoryError> {
        let mut matches = self.matches.write().await;
        if matches.contains_key(&record.id) {
            return Err(MatchRepositoryError::AlreadyExists);
        }
        matches.insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn get_match(&self, match_id: &str) -> Result<Match, MatchRepositoryError> {
        let matches = self.matches.read().await;
        matches
            .get(match_id)
            .cloned()
            .ok_or(MatchRepositoryError::NotFound)
    }

    async fn compare_and_swap(
        &self,
        match_id: &str,
        expected_move_count: u32,
        next: &Match,
    ) -> Result<Match, MatchRepositoryError> {
        let mut matches = self.matches.write().await;
        let current = matches
            .get_mut(match_id)
            .ok_or(MatchRepositoryError::NotFound)?;

        if current.move_count != expected_move_count {
            debug!(
                match_id,
                expected = expected_move_count,
                actual = current.move_count,
                "Stale move count"
            );
            return Err(MatchRepositoryError::VersionConflict {
                expected: expected_move_count,
                actual: Some(current.move_count),
            });
        }
        if !current.is_ongoing() {
            return Err(MatchRepositoryError::VersionConflict {
                expected: expected_move_count,
                actual: None,
            });
        }

        *current = next.clone();
        Ok(next.clone())
    }

    async fn list_matches(&self, filter: &MatchFilter) -> Result<Vec<Match>, MatchRepositoryError> {
        let matches = self.matches.read().await;
        Ok(matches
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    async fn delete_match(&self, match_id: &str) -> Result<(), MatchRepositoryError> {
        let mut matches = self.matches.write().await;
        matches
            .remove(match_id)
            .map(|_| ())
            .ok_or(MatchRepositoryError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::match_record::{GameType, MatchStatus};
    use chrono::Utc;

    #[tokio::test]
    async fn test_create_and_get() {
        let repository = InMemoryMatchRepository::new();
        let record = Match::new("p1", "p2", GameType::Blitz);

        repository.create_match(&record).await.unwrap();
        let stored = repository.get_match(&record.id).await.unwrap();

        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn test_create_duplicate_is_rejected() {
        let repository = InMemoryMatchRepository::new();
        let record = Match::new("p1", "p2", GameType::Blitz);

        repository.create_match(&record).await.unwrap();
        let result = repository.create_match(&record).await;

        assert!(matches!(result, Err(MatchRepositoryError::AlreadyExists)));
    }

    #[tokio::test]
    async fn test_get_missing_match() {
        let repository = InMemoryMatchRepository::new();
        let result = repository.get_match("missing").await;

        assert!(matches!(result, Err(MatchRepositoryError::NotFound)));
    }

    #[tokio::test]
    async fn test_compare_and_swap_applies_on_matching_count() {
        let repository = InMemoryMatchRepository::new();
        let record = Match::new("p1", "p2", GameType::Blitz);
        repository.create_match(&record).await.unwrap();

        let next = record.with_move("e4", None);
        let stored = repository
            .compare_and_swap(&record.id, 0, &next)
            .await
            .unwrap();

        assert_eq!(stored.move_count, 1);
        assert_eq!(repository.get_match(&record.id).await.unwrap(), next);
    }

    #[tokio::test]
    async fn test_compare_and_swap_rejects_stale_count() {
        let repository = InMemoryMatchRepository::new();
        let record = Match::new("p1", "p2", GameType::Blitz);
        repository.create_match(&record).await.unwrap();

        let first = record.with_move("e4", None);
        repository
            .compare_and_swap(&record.id, 0, &first)
            .await
            .unwrap();

        let competing = record.with_move("d4", None);
        let result = repository.compare_and_swap(&record.id, 0, &competing).await;

        assert!(matches!(
            result,
            Err(MatchRepositoryError::VersionConflict {
                expected: 0,
                actual: Some(1)
            })
        ));
        let stored = repository.get_match(&record.id).await.unwrap();
        assert_eq!(stored.moves, vec!["e4".to_string()]);
    }

    #[tokio::test]
    async fn test_compare_and_swap_never_overwrites_terminal_record() {
        let repository = InMemoryMatchRepository::new();
        let record = Match::new("p1", "p2", GameType::Blitz);
        repository.create_match(&record).await.unwrap();

        let ended = record.ended(MatchStatus::Completed, Utc::now());
        repository
            .compare_and_swap(&record.id, 0, &ended)
            .await
            .unwrap();

        let late_move = record.with_move("e4", None);
        let result = repository.compare_and_swap(&record.id, 0, &late_move).await;

        assert!(matches!(
            result,
            Err(MatchRepositoryError::VersionConflict { actual: None, .. })
        ));
        let stored = repository.get_match(&record.id).await.unwrap();
        assert_eq!(stored.status, MatchStatus::Completed);
        assert!(stored.moves.is_empty());
    }

    #[tokio::test]
    async fn test_list_matches_by_player() {
        let repository = InMemoryMatchRepository::new();
        for (a, b) in [("p1", "p2"), ("p2", "p3"), ("p3", "p4")] {
            repository
                .create_match(&Match::new(a, b, GameType::Bullet))
                .await
                .unwrap();
        }

        let p2_matches = repository
            .list_matches(&MatchFilter::Player("p2".to_string()))
            .await
            .unwrap();
        let all = repository.list_matches(&MatchFilter::All).await.unwrap();

        assert_eq!(p2_matches.len(), 2);
        assert!(p2_matches.iter().all(|m| m.has_player("p2")));
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_delete_match() {
        let repository = InMemoryMatchRepository::new();
        let record = Match::new("p1", "p2", GameType::Blitz);
        repository.create_match(&record).await.unwrap();

        repository.delete_match(&record.id).await.unwrap();

        assert!(matches!(
            repository.get_match(&record.id).await,
            Err(MatchRepositoryError::NotFound)
        ));
        assert!(matches!(
            repository.delete_match(&record.id).await,
            Err(MatchRepositoryError::NotFound)
        ));
    }
}
