//! In-process stats store.
//!
//! Used by tests, by the server's `--memory` mode and by the offline
//! client. Records live only as long as the store.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::errors::{StatsError, StatsResult};
use super::models::{CreatePolicy, PlayerRecord, validate_player_name};
use super::store::StatsStore;

/// `HashMap`-backed implementation of [`StatsStore`]
///
/// Every mutation happens inside one write-guard scope with no await in
/// between, so increments for the same key serialize and a cancelled call
/// has either fully applied or not at all.
#[derive(Debug, Default)]
pub struct MemoryStatsStore {
    players: RwLock<HashMap<String, PlayerRecord>>,
    policy: CreatePolicy,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: CreatePolicy) -> Self {
        Self {
            players: RwLock::default(),
            policy,
        }
    }

    /// Preload a record, e.g. for tests
    pub fn with_player(mut self, record: PlayerRecord) -> Self {
        self.players
            .get_mut()
            .insert(record.player_name.clone(), record);
        self
    }

    pub fn policy(&self) -> CreatePolicy {
        self.policy
    }

    pub async fn len(&self) -> usize {
        self.players.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.players.read().await.is_empty()
    }
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn create_player(&self, player_name: &str) -> StatsResult<PlayerRecord> {
        validate_player_name(player_name)?;

        let mut players = self.players.write().await;
        let record = match self.policy {
            CreatePolicy::Preserve => players
                .entry(player_name.to_string())
                .or_insert_with(|| PlayerRecord::new(player_name))
                .clone(),
            CreatePolicy::Overwrite => {
                let record = PlayerRecord::new(player_name);
                players.insert(player_name.to_string(), record.clone());
                record
            }
        };
        Ok(record)
    }

    async fn get_player(&self, player_name: &str) -> StatsResult<Option<PlayerRecord>> {
        Ok(self.players.read().await.get(player_name).cloned())
    }

    async fn increment_stat(&self, player_name: &str, won: bool) -> StatsResult<PlayerRecord> {
        let mut players = self.players.write().await;
        let record = players
            .get_mut(player_name)
            .ok_or_else(|| StatsError::NotFound(player_name.to_string()))?;
        record.record(won);
        Ok(record.clone())
    }

    async fn health_check(&self) -> StatsResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get() {
        let store = MemoryStatsStore::new();
        let created = store.create_player("Ada").await.unwrap();
        assert_eq!(created, PlayerRecord::new("Ada"));

        let found = store.get_player("Ada").await.unwrap();
        assert_eq!(found, Some(created));
    }

    #[tokio::test]
    async fn test_names_are_case_sensitive() {
        let store = MemoryStatsStore::new();
        store.create_player("Ada").await.unwrap();
        assert!(store.get_player("ada").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_with_player_preloads() {
        let mut record = PlayerRecord::new("Grace");
        record.wins = 4;
        let store = MemoryStatsStore::new().with_player(record.clone());
        assert_eq!(store.get_player("Grace").await.unwrap(), Some(record));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_increment_missing_player_does_not_create() {
        let store = MemoryStatsStore::new();
        let err = store.increment_stat("Ghost", true).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_get_or_create() {
        let store = MemoryStatsStore::new();
        let (record, created) = store.get_or_create_player("Ada").await.unwrap();
        assert!(created);
        assert_eq!(record.games(), 0);

        store.increment_stat("Ada", true).await.unwrap();
        let (record, created) = store.get_or_create_player("Ada").await.unwrap();
        assert!(!created);
        assert_eq!(record.wins, 1);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let store = MemoryStatsStore::new();
        let err = store.create_player("").await.unwrap_err();
        assert!(matches!(err, StatsError::Validation(_)));
        assert!(store.is_empty().await);
    }
}
