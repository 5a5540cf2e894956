//! Stats store error types.

use thiserror::Error;

use crate::db::timeouts::TimeoutError;

/// Stats store errors
#[derive(Debug, Error)]
pub enum StatsError {
    /// Malformed input, e.g. an empty player name
    #[error("{0}")]
    Validation(String),

    /// No record for this player name
    #[error("Player not found: {0}")]
    NotFound(String),

    /// Backing store could not be reached or did not answer in time
    #[error("Stats store unavailable: {0}")]
    Unavailable(String),
}

impl StatsError {
    /// Get a client-safe error message that doesn't leak backend details
    pub fn client_message(&self) -> String {
        match self {
            // Don't expose connection strings or SQL details
            StatsError::Unavailable(_) => "Stats store unavailable".to_string(),
            StatsError::NotFound(_) => "Player not found".to_string(),
            StatsError::Validation(_) => self.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StatsError::NotFound(_))
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, StatsError::Unavailable(_))
    }
}

impl From<sqlx::Error> for StatsError {
    fn from(err: sqlx::Error) -> Self {
        StatsError::Unavailable(err.to_string())
    }
}

impl From<TimeoutError> for StatsError {
    fn from(err: TimeoutError) -> Self {
        match err {
            TimeoutError::Database(e) => e.into(),
            timeout @ TimeoutError::Timeout(_) => StatsError::Unavailable(timeout.to_string()),
        }
    }
}

/// Result type for stats operations
pub type StatsResult<T> = Result<T, StatsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_message_hides_backend_details() {
        let err = StatsError::Unavailable("connection refused: postgres://secret@db".to_string());
        assert_eq!(err.client_message(), "Stats store unavailable");
        assert!(!err.client_message().contains("secret"));
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = StatsError::Validation("Player name is required".to_string());
        assert_eq!(err.client_message(), "Player name is required");
    }

    #[test]
    fn test_timeout_maps_to_unavailable() {
        let err: StatsError = TimeoutError::Timeout(Duration::from_secs(5)).into();
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_sqlx_error_maps_to_unavailable() {
        let err: StatsError = sqlx::Error::PoolTimedOut.into();
        assert!(err.is_unavailable());
        assert!(!err.is_not_found());
    }
}
