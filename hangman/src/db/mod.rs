//! PostgreSQL backend for player stats.
//!
//! [`Database`] owns the sqlx pool and creates the `hangman_players` table;
//! [`PgStatsStore`] is the [`StatsStore`] implementation on top of it.
//!
//! [`StatsStore`]: crate::stats::StatsStore

use sqlx::postgres::PgPool;

pub mod config;
pub mod repository;
pub mod timeouts;

pub use config::DatabaseConfig;
pub use repository::PgStatsStore;
pub use timeouts::{TimeoutError, TimeoutResult};

use timeouts::{SCHEMA_TIMEOUT, with_default_timeout, with_timeout};

/// Players table, created on startup when missing
pub const PLAYERS_TABLE_SCHEMA: &str = "CREATE TABLE IF NOT EXISTS hangman_players (
    player_name TEXT PRIMARY KEY CHECK (player_name <> ''),
    wins BIGINT NOT NULL DEFAULT 0 CHECK (wins >= 0),
    losses BIGINT NOT NULL DEFAULT 0 CHECK (losses >= 0),
    created_at TIMESTAMP NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMP NOT NULL DEFAULT NOW()
)";

/// Shared sqlx pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    statement_timeout: std::time::Duration,
}

impl Database {
    /// Connect the pool; fails if no connection can be opened in time.
    ///
    /// ```no_run
    /// use hangman::db::{Database, DatabaseConfig};
    ///
    /// # async fn connect() -> Result<(), Box<dyn std::error::Error>> {
    /// let db = Database::new(&DatabaseConfig::with_url("postgres://localhost/hangman")).await?;
    /// db.ensure_schema().await?;
    /// let store = db.stats_store();
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(config: &DatabaseConfig) -> Result<Self, sqlx::Error> {
        let pool = config.pool_options().connect_with(config.connect_options()?).await?;
        log::debug!(
            "connected pool (max {} connections)",
            config.max_connections
        );

        Ok(Self {
            pool,
            statement_timeout: config.statement_timeout,
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Stats store backed by this pool
    pub fn stats_store(&self) -> PgStatsStore {
        PgStatsStore::new(self.pool.clone()).with_query_timeout(self.statement_timeout)
    }

    /// Create the players table if it does not exist yet
    pub async fn ensure_schema(&self) -> TimeoutResult<()> {
        with_timeout(
            SCHEMA_TIMEOUT,
            sqlx::query(PLAYERS_TABLE_SCHEMA).execute(&self.pool),
        )
        .await?;
        log::info!("hangman_players table ready");
        Ok(())
    }

    /// `SELECT 1` under the default query deadline
    pub async fn health_check(&self) -> TimeoutResult<()> {
        with_default_timeout(sqlx::query("SELECT 1").execute(&self.pool)).await?;
        Ok(())
    }

    /// Wait for checked-out connections and close the pool
    pub async fn close(self) {
        self.pool.close().await;
    }
}
