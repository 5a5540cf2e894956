//! Round error types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while setting up or playing a round
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum RoundError {
    #[error("word list is empty")]
    EmptyWordList,
    #[error("word list entry {index} is empty")]
    EmptyWord { index: usize },
    #[error("word list entry {index} ({word:?}) must contain only letters")]
    NonLetterWord { index: usize, word: String },
    #[error("word index {index} out of bounds for {len} words")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("please enter a single letter, got {0:?}")]
    InvalidInput(String),
    #[error("round is over, start a new one")]
    RoundClosed,
}

impl RoundError {
    /// Whether this error comes from bad static setup (word list or index
    /// selection) rather than from a player's input. These should not be
    /// retried.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::EmptyWordList
                | Self::EmptyWord { .. }
                | Self::NonLetterWord { .. }
                | Self::IndexOutOfBounds { .. }
        )
    }
}

/// Result type for round operations
pub type RoundResult<T> = Result<T, RoundError>;
