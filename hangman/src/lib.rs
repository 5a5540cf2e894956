//! # Hangman
//!
//! A hangman round engine plus a persistent store of per-player win/loss
//! counts.
//!
//! Rounds are immutable values: every guess produces a new [`Round`] and a
//! [`GuessResult`] describing what happened. A round ends as soon as every
//! letter of the secret word is revealed or the sixth wrong guess lands.
//!
//! ## Core Modules
//!
//! - [`game`]: Word list, round state and guess evaluation
//! - [`stats`]: The [`StatsStore`] contract and an in-memory backend
//! - [`db`]: PostgreSQL pool, schema bootstrap and the PostgreSQL backend
//!
//! ## Example
//!
//! ```
//! use hangman::{GuessResult, Outcome, WordList, start_round};
//!
//! let words = WordList::new(["Table"]).unwrap();
//! let round = start_round(&words, |_| 0).unwrap();
//!
//! let (round, result) = round.guess("t").unwrap();
//! assert_eq!(result, GuessResult::Hit { won: false });
//! assert_eq!(round.masked_word(), "T____");
//! assert_eq!(round.outcome(), Outcome::InProgress);
//! ```

/// Round engine: words, letters, guesses and outcomes.
pub mod game;
pub use game::{
    DEFAULT_WORDS, GuessResult, Letter, MAX_WRONG_GUESSES, Outcome, Round, RoundError,
    RoundResult, WordList, constants, entities, random_index, start_round,
};

/// Player stats contract and the in-memory backend.
pub mod stats;
pub use stats::{CreatePolicy, MemoryStatsStore, PlayerRecord, StatsError, StatsResult, StatsStore};

/// PostgreSQL connection pooling and the PostgreSQL stats backend.
pub mod db;
pub use db::{Database, DatabaseConfig, PgStatsStore};
