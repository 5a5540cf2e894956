use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::{RoundError, RoundResult};

/// A single guessable letter, always stored lowercase.
///
/// Only ASCII letters are accepted; the keyboard the game is played on
/// has A-Z and the word list is validated against the same alphabet.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Letter(char);

impl Letter {
    /// Parse raw player input into a letter.
    ///
    /// The input must be exactly one alphabetic character. Anything else,
    /// including digits and punctuation, is rejected with
    /// [`RoundError::InvalidInput`] rather than being counted as a miss.
    pub fn parse(input: &str) -> RoundResult<Self> {
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => Ok(Self(c.to_ascii_lowercase())),
            _ => Err(RoundError::InvalidInput(input.to_string())),
        }
    }

    pub fn as_char(self) -> char {
        self.0
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<char> for Letter {
    type Error = RoundError;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        if value.is_ascii_alphabetic() {
            Ok(Self(value.to_ascii_lowercase()))
        } else {
            Err(RoundError::InvalidInput(value.to_string()))
        }
    }
}

/// Status of a round. `Won` and `Lost` are terminal.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::InProgress => "in progress",
            Self::Won => "won",
            Self::Lost => "lost",
        };
        write!(f, "{repr}")
    }
}

/// What a single guess did to a round.
///
/// `AlreadyGuessed` is a reported condition, not an error: the round is
/// returned unchanged and the caller decides how to tell the player.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum GuessResult {
    /// The letter is in the word. `won` is set when it revealed the last
    /// missing letter.
    Hit { won: bool },
    /// The letter is not in the word. `lost` is set when it was the last
    /// allowed wrong guess.
    Miss { lost: bool },
    AlreadyGuessed,
}

impl GuessResult {
    /// Whether this guess moved the round into a terminal outcome.
    #[must_use]
    pub fn ended_round(self) -> bool {
        matches!(self, Self::Hit { won: true } | Self::Miss { lost: true })
    }

    /// User-facing notice for results that need one.
    pub fn notice(self, letter: Letter) -> Option<String> {
        match self {
            Self::AlreadyGuessed => Some(format!(
                "You already guessed the letter \"{}\"!",
                letter.as_char().to_ascii_uppercase()
            )),
            _ => None,
        }
    }
}
