//! Stats store trait for testability and dependency injection.
//!
//! Orchestrators depend on `dyn StatsStore` so the same game flow can run
//! against PostgreSQL, the in-memory store, or a remote HTTP store.

use async_trait::async_trait;

use super::errors::StatsResult;
use super::models::PlayerRecord;

/// Trait for per-player win/loss persistence
///
/// Implementations must make `increment_stat` atomic per key: concurrent
/// increments for the same player all land. No operation may partially
/// apply.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Create a player with zeroed counters
    ///
    /// # Errors
    ///
    /// * `StatsError::Validation` - blank or overlong name
    /// * `StatsError::Unavailable` - backend failure
    async fn create_player(&self, player_name: &str) -> StatsResult<PlayerRecord>;

    /// Find a player by exact name; `None` when absent
    async fn get_player(&self, player_name: &str) -> StatsResult<Option<PlayerRecord>>;

    /// Add one win (`won == true`) or one loss and return the new record
    ///
    /// # Errors
    ///
    /// * `StatsError::NotFound` - no such player; never creates one
    /// * `StatsError::Unavailable` - backend failure, nothing applied
    async fn increment_stat(&self, player_name: &str, won: bool) -> StatsResult<PlayerRecord>;

    /// Check that the backend answers
    async fn health_check(&self) -> StatsResult<()>;

    /// Login helper: return the existing record or create one.
    ///
    /// The flag is `true` when the player was created by this call.
    async fn get_or_create_player(&self, player_name: &str) -> StatsResult<(PlayerRecord, bool)> {
        if let Some(record) = self.get_player(player_name).await? {
            return Ok((record, false));
        }
        let record = self.create_player(player_name).await?;
        Ok((record, true))
    }
}
