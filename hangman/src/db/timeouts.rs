//! Deadlines for stats store queries.
//!
//! The deadline that matters is Postgres `statement_timeout`, set on every
//! pooled connection (see [`DatabaseConfig::connect_options`]). The server
//! cancels a statement running past it and rolls it back, so a timed-out
//! increment has not applied.
//!
//! [`with_timeout`] is only a client-side backstop for a server that stops
//! answering. It runs [`BACKSTOP_MARGIN`] past the server deadline. When it
//! fires the statement's fate is unknown: it may still commit after the
//! future is dropped.
//!
//! [`DatabaseConfig::connect_options`]: super::DatabaseConfig::connect_options

use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

/// Per-query deadline unless `STATS_QUERY_TIMEOUT_MS` overrides it
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Deadline for `CREATE TABLE IF NOT EXISTS` at startup
pub const SCHEMA_TIMEOUT: Duration = Duration::from_secs(30);

/// How long the client waits past the server's `statement_timeout`
pub const BACKSTOP_MARGIN: Duration = Duration::from_secs(1);

/// Client deadline for a statement the server cancels after `statement_timeout`
pub fn backstop_for(statement_timeout: Duration) -> Duration {
    statement_timeout.saturating_add(BACKSTOP_MARGIN)
}

#[derive(Debug, thiserror::Error)]
pub enum TimeoutError {
    #[error("stats query timed out after {0:?}")]
    Timeout(Duration),

    #[error("stats query failed: {0}")]
    Database(#[from] sqlx::Error),
}

impl TimeoutError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

pub type TimeoutResult<T> = Result<T, TimeoutError>;

/// Run `query` with a deadline.
///
/// ```no_run
/// use hangman::db::timeouts::{DEFAULT_QUERY_TIMEOUT, with_timeout};
/// # async fn example(pool: &sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let row = with_timeout(
///     DEFAULT_QUERY_TIMEOUT,
///     sqlx::query("SELECT wins FROM hangman_players WHERE player_name = $1")
///         .bind("Ada")
///         .fetch_optional(pool),
/// )
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn with_timeout<F, T>(deadline: Duration, query: F) -> TimeoutResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    timeout(deadline, query)
        .await
        .map_err(|_| TimeoutError::Timeout(deadline))?
        .map_err(TimeoutError::Database)
}

pub async fn with_default_timeout<F, T>(query: F) -> TimeoutResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    with_timeout(DEFAULT_QUERY_TIMEOUT, query).await
}
