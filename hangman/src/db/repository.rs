//! PostgreSQL implementation of the stats store.
//!
//! Every operation is a single SQL statement. Increments use
//! `SET wins = wins + 1 ... RETURNING`, so the row lock taken by the update
//! serializes concurrent increments for the same player without a
//! read-modify-write round trip.

use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};
use std::time::Duration;

use super::timeouts::{DEFAULT_QUERY_TIMEOUT, backstop_for, with_timeout};
use crate::stats::{
    CreatePolicy, PlayerRecord, StatsError, StatsResult, StatsStore, validate_player_name,
};

const CREATE_PRESERVE: &str = "INSERT INTO hangman_players (player_name, wins, losses)
     VALUES ($1, 0, 0)
     ON CONFLICT (player_name) DO UPDATE SET player_name = EXCLUDED.player_name
     RETURNING player_name, wins, losses";

const CREATE_OVERWRITE: &str = "INSERT INTO hangman_players (player_name, wins, losses)
     VALUES ($1, 0, 0)
     ON CONFLICT (player_name) DO UPDATE SET wins = 0, losses = 0, updated_at = NOW()
     RETURNING player_name, wins, losses";

const INCREMENT_WINS: &str = "UPDATE hangman_players
     SET wins = wins + 1, updated_at = NOW()
     WHERE player_name = $1
     RETURNING player_name, wins, losses";

const INCREMENT_LOSSES: &str = "UPDATE hangman_players
     SET losses = losses + 1, updated_at = NOW()
     WHERE player_name = $1
     RETURNING player_name, wins, losses";

/// Default PostgreSQL implementation of [`StatsStore`]
#[derive(Clone)]
pub struct PgStatsStore {
    pool: PgPool,
    policy: CreatePolicy,
    query_timeout: Duration,
}

impl PgStatsStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            policy: CreatePolicy::default(),
            query_timeout: backstop_for(DEFAULT_QUERY_TIMEOUT),
        }
    }

    pub fn with_policy(mut self, policy: CreatePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Match the client backstop to the pool's `statement_timeout`
    pub fn with_query_timeout(mut self, statement_timeout: Duration) -> Self {
        self.query_timeout = backstop_for(statement_timeout);
        self
    }

    pub fn policy(&self) -> CreatePolicy {
        self.policy
    }
}

fn record_from_row(row: &PgRow) -> PlayerRecord {
    PlayerRecord {
        player_name: row.get("player_name"),
        wins: row.get("wins"),
        losses: row.get("losses"),
    }
}

#[async_trait]
impl StatsStore for PgStatsStore {
    async fn create_player(&self, player_name: &str) -> StatsResult<PlayerRecord> {
        validate_player_name(player_name)?;

        let sql = match self.policy {
            CreatePolicy::Preserve => CREATE_PRESERVE,
            CreatePolicy::Overwrite => CREATE_OVERWRITE,
        };
        let row = with_timeout(
            self.query_timeout,
            sqlx::query(sql).bind(player_name).fetch_one(&self.pool),
        )
        .await?;

        log::debug!("created player {player_name} ({} policy)", self.policy);
        Ok(record_from_row(&row))
    }

    async fn get_player(&self, player_name: &str) -> StatsResult<Option<PlayerRecord>> {
        let row = with_timeout(
            self.query_timeout,
            sqlx::query(
                "SELECT player_name, wins, losses FROM hangman_players WHERE player_name = $1",
            )
            .bind(player_name)
            .fetch_optional(&self.pool),
        )
        .await?;

        Ok(row.as_ref().map(record_from_row))
    }

    async fn increment_stat(&self, player_name: &str, won: bool) -> StatsResult<PlayerRecord> {
        let sql = if won { INCREMENT_WINS } else { INCREMENT_LOSSES };
        let row = with_timeout(
            self.query_timeout,
            sqlx::query(sql).bind(player_name).fetch_optional(&self.pool),
        )
        .await?
        .ok_or_else(|| StatsError::NotFound(player_name.to_string()))?;

        Ok(record_from_row(&row))
    }

    async fn health_check(&self) -> StatsResult<()> {
        with_timeout(
            self.query_timeout,
            sqlx::query("SELECT 1").execute(&self.pool),
        )
        .await?;
        Ok(())
    }
}
