//! Server configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use hangman::{CreatePolicy, WordList, db::DatabaseConfig};
use std::{fmt, net::SocketAddr, str::FromStr, time::Duration};

/// Default bind address, the port the hangman API has always used
pub const DEFAULT_BIND: &str = "127.0.0.1:5000";

/// Complete server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server bind address
    pub bind: SocketAddr,
    /// Which stats store to run against
    pub backend: StoreBackend,
    /// Database configuration, used by the postgres backend
    pub database: DatabaseConfig,
    /// Stats store behaviour
    pub stats: StatsConfig,
    /// Game session configuration
    pub game: GameConfig,
    /// Prometheus listener address, disabled when unset
    pub metrics_bind: Option<SocketAddr>,
}

/// Stats store configuration
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// What `create_player` does for an existing name
    pub create_policy: CreatePolicy,
    /// Per-query timeout for the postgres store
    pub query_timeout: Duration,
}

/// Game configuration
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Words new rounds are drawn from
    pub words: WordList,
    /// Sessions untouched for this long are dropped
    pub session_idle_timeout: Duration,
}

/// Stats backend selection
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StoreBackend {
    #[default]
    Postgres,
    Memory,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        };
        write!(f, "{repr}")
    }
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(format!("expected `postgres` or `memory`, got `{other}`")),
        }
    }
}

/// Values given on the command line; they win over the environment
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub bind: Option<SocketAddr>,
    pub database_url: Option<String>,
    pub memory: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns error if required variables are missing or invalid
    pub fn from_env(overrides: CliOverrides) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok(), overrides)
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// `from_env` passes `std::env::var`; tests pass a map.
    pub fn from_lookup<F>(lookup: F, overrides: CliOverrides) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Bind address
        let bind = match overrides.bind {
            Some(bind) => bind,
            None => parse_or(&lookup, "SERVER_BIND", default_bind())?,
        };

        let backend = if overrides.memory {
            StoreBackend::Memory
        } else {
            parse_or(&lookup, "STATS_BACKEND", StoreBackend::default())?
        };

        // Database configuration
        let database_url = overrides.database_url.or_else(|| lookup("DATABASE_URL"));
        let database_url = match (backend, database_url) {
            (_, Some(url)) => url,
            (StoreBackend::Memory, None) => String::new(),
            (StoreBackend::Postgres, None) => {
                return Err(ConfigError::MissingRequired {
                    var: "DATABASE_URL".to_string(),
                    hint: "Set a PostgreSQL URL, pass --db-url, or run with --memory".to_string(),
                });
            }
        };

        let secs = |var: &str, default: u64| {
            parse_or(&lookup, var, default).map(Duration::from_secs)
        };
        let query_timeout =
            Duration::from_millis(parse_or(&lookup, "STATS_QUERY_TIMEOUT_MS", 5000)?);
        let database = DatabaseConfig {
            url: database_url,
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 20)?,
            min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", 1)?,
            acquire_timeout: secs("DB_CONNECTION_TIMEOUT_SECS", 5)?,
            idle_timeout: secs("DB_IDLE_TIMEOUT_SECS", 600)?,
            max_lifetime: secs("DB_MAX_LIFETIME_SECS", 1800)?,
            statement_timeout: query_timeout,
        };

        let stats = StatsConfig {
            create_policy: parse_or(&lookup, "PLAYER_CREATE_POLICY", CreatePolicy::default())?,
            query_timeout,
        };

        let words = match lookup("HANGMAN_WORDS") {
            Some(csv) => WordList::parse(&csv).map_err(|e| ConfigError::Invalid {
                var: "HANGMAN_WORDS".to_string(),
                reason: e.to_string(),
            })?,
            None => WordList::default(),
        };

        let game = GameConfig {
            words,
            session_idle_timeout: Duration::from_secs(parse_or(
                &lookup,
                "SESSION_IDLE_TIMEOUT_SECS",
                3600,
            )?),
        };

        let metrics_bind = match lookup("METRICS_BIND") {
            Some(value) => Some(value.parse().map_err(|e| ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("{e}"),
            })?),
            None => None,
        };

        Ok(ServerConfig {
            bind,
            backend,
            database,
            stats,
            game,
            metrics_bind,
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == StoreBackend::Postgres {
            if self.database.max_connections == 0 {
                return Err(ConfigError::Invalid {
                    var: "DB_MAX_CONNECTIONS".to_string(),
                    reason: "Must be greater than 0".to_string(),
                });
            }

            if self.database.min_connections > self.database.max_connections {
                return Err(ConfigError::Invalid {
                    var: "DB_MIN_CONNECTIONS".to_string(),
                    reason: format!(
                        "Cannot exceed max connections ({})",
                        self.database.max_connections
                    ),
                });
            }
        }

        if self.stats.query_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: "STATS_QUERY_TIMEOUT_MS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.game.session_idle_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                var: "SESSION_IDLE_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.metrics_bind == Some(self.bind) {
            return Err(ConfigError::Invalid {
                var: "METRICS_BIND".to_string(),
                reason: format!("Must differ from the server bind address ({})", self.bind),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

/// Helper to parse a variable with default fallback when unset
fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e| ConfigError::Invalid {
            var: key.to_string(),
            reason: format!("{e}"),
        }),
        None => Ok(default),
    }
}
