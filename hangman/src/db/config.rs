//! Connection pool settings for the PostgreSQL stats backend.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::time::Duration;

use super::timeouts::DEFAULT_QUERY_TIMEOUT;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long to wait for a free connection
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    /// Server-side `statement_timeout` for every pooled connection
    pub statement_timeout: Duration,
}

impl DatabaseConfig {
    /// Pool defaults pointed at `url`
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::development()
        }
    }

    /// Local development database, `postgres://postgres@localhost/hangman`
    pub fn development() -> Self {
        Self {
            url: "postgres://postgres@localhost/hangman".to_string(),
            max_connections: 20,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
            max_lifetime: Duration::from_secs(1800),
            statement_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Parsed `url` with `statement_timeout` set as a session option.
    ///
    /// Postgres cancels and rolls back any statement running past it, so a
    /// timed-out update never commits.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        let millis = self.statement_timeout.as_millis().max(1).to_string();
        Ok(PgConnectOptions::from_str(&self.url)?.options([("statement_timeout", millis)]))
    }

    /// Pool builder carrying these settings; the caller connects it
    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(self.acquire_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_url_keeps_pool_defaults() {
        let config = DatabaseConfig::with_url("postgres://hm:pw@db/hangman_test");
        assert_eq!(config.url, "postgres://hm:pw@db/hangman_test");
        assert_eq!(config.max_connections, DatabaseConfig::default().max_connections);
        assert_eq!(config.acquire_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_pool_options_carry_sizing() {
        let config = DatabaseConfig {
            max_connections: 3,
            min_connections: 2,
            ..DatabaseConfig::development()
        };
        let options = config.pool_options();
        assert_eq!(options.get_max_connections(), 3);
        assert_eq!(options.get_min_connections(), 2);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_connect_options_set_statement_timeout() {
        let config = DatabaseConfig {
            statement_timeout: Duration::from_millis(250),
            ..DatabaseConfig::with_url("postgres://hm@db:5432/hangman")
        };
        let options = config.connect_options().unwrap();
        assert_eq!(options.get_host(), "db");
        assert!(options.get_options().unwrap().contains("statement_timeout=250"));
    }

    #[test]
    fn test_connect_options_reject_bad_url() {
        assert!(DatabaseConfig::with_url("not a url").connect_options().is_err());
    }
}
