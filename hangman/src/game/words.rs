//! Word source for new rounds.

use rand::Rng;
use serde::Serialize;

use super::constants::DEFAULT_WORDS;
use super::errors::{RoundError, RoundResult};

/// A validated, non-empty list of words made of ASCII letters.
///
/// Validation happens once at construction so every round started from the
/// list can rely on it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct WordList(Vec<String>);

impl WordList {
    pub fn new<I, S>(words: I) -> RoundResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.is_empty() {
            return Err(RoundError::EmptyWordList);
        }

        for (index, word) in words.iter().enumerate() {
            if word.is_empty() {
                return Err(RoundError::EmptyWord { index });
            }
            if !word.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(RoundError::NonLetterWord {
                    index,
                    word: word.clone(),
                });
            }
        }

        Ok(Self(words))
    }

    /// Parse a comma-separated list, e.g. `"Table, Museum,Fun"`.
    ///
    /// Entries are trimmed; an empty entry is an error, not something to skip.
    pub fn parse(csv: &str) -> RoundResult<Self> {
        if csv.trim().is_empty() {
            return Err(RoundError::EmptyWordList);
        }
        Self::new(csv.split(',').map(str::trim))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a constructed list.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for WordList {
    fn default() -> Self {
        Self(DEFAULT_WORDS.iter().map(|w| (*w).to_string()).collect())
    }
}

/// Uniformly random index in `[0, len)`.
///
/// This is the default selector passed to [`start_round`](super::start_round).
///
/// # Panics
///
/// Panics if `len` is zero. A [`WordList`] is never empty.
pub fn random_index(len: usize) -> usize {
    rand::rng().random_range(0..len)
}
