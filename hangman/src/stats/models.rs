//! Player stats data models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::{StatsError, StatsResult};

/// Longest accepted player name, in characters.
pub const MAX_PLAYER_NAME_LENGTH: usize = 64;

/// Persisted win/loss counters for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRecord {
    pub player_name: String,
    pub wins: i64,
    pub losses: i64,
}

impl PlayerRecord {
    /// Fresh record with zeroed counters
    pub fn new(player_name: impl Into<String>) -> Self {
        Self {
            player_name: player_name.into(),
            wins: 0,
            losses: 0,
        }
    }

    /// Total finished rounds
    pub fn games(&self) -> i64 {
        self.wins + self.losses
    }

    pub(crate) fn record(&mut self, won: bool) {
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}

/// What `create_player` does when the name is already taken
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreatePolicy {
    /// Keep the existing record and return it unchanged
    #[default]
    Preserve,
    /// Reset the existing record's counters to zero
    Overwrite,
}

impl fmt::Display for CreatePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreatePolicy::Preserve => write!(f, "preserve"),
            CreatePolicy::Overwrite => write!(f, "overwrite"),
        }
    }
}

impl FromStr for CreatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "preserve" => Ok(CreatePolicy::Preserve),
            "overwrite" => Ok(CreatePolicy::Overwrite),
            other => Err(format!(
                "unknown create policy {other:?}, expected \"preserve\" or \"overwrite\""
            )),
        }
    }
}

/// Check a player name before it becomes a primary key.
///
/// Names are case-sensitive and stored exactly as given; only blank and
/// overlong names are rejected.
pub fn validate_player_name(player_name: &str) -> StatsResult<()> {
    if player_name.trim().is_empty() {
        return Err(StatsError::Validation("Player name is required".to_string()));
    }
    if player_name.chars().count() > MAX_PLAYER_NAME_LENGTH {
        return Err(StatsError::Validation(format!(
            "Player name must be at most {MAX_PLAYER_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_zeroed() {
        let record = PlayerRecord::new("Ada");
        assert_eq!(record.wins, 0);
        assert_eq!(record.losses, 0);
        assert_eq!(record.games(), 0);
    }

    #[test]
    fn test_record_outcomes() {
        let mut record = PlayerRecord::new("Ada");
        record.record(true);
        record.record(false);
        record.record(true);
        assert_eq!((record.wins, record.losses, record.games()), (2, 1, 3));
    }

    #[test]
    fn test_record_json_uses_camel_case() {
        let json = serde_json::to_value(PlayerRecord::new("Ada")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "playerName": "Ada", "wins": 0, "losses": 0 })
        );
    }

    #[test]
    fn test_create_policy_parse() {
        assert_eq!("preserve".parse::<CreatePolicy>(), Ok(CreatePolicy::Preserve));
        assert_eq!(" Overwrite ".parse::<CreatePolicy>(), Ok(CreatePolicy::Overwrite));
        assert!("reset".parse::<CreatePolicy>().is_err());
        assert_eq!(CreatePolicy::default(), CreatePolicy::Preserve);
    }

    #[test]
    fn test_validate_player_name() {
        assert!(validate_player_name("Ada").is_ok());
        assert!(validate_player_name("ada lovelace").is_ok());
        assert!(matches!(
            validate_player_name(""),
            Err(StatsError::Validation(_))
        ));
        assert!(matches!(
            validate_player_name("   "),
            Err(StatsError::Validation(_))
        ));
        let long = "x".repeat(MAX_PLAYER_NAME_LENGTH + 1);
        assert!(matches!(
            validate_player_name(&long),
            Err(StatsError::Validation(_))
        ));
    }
}
