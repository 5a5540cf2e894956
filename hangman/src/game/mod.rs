//! Hangman game engine.
//!
//! This module provides the round state machine and its supporting types:
//! - Word list validation and random word selection
//! - Guess validation and hit/miss bookkeeping
//! - Win/loss detection with terminal outcomes

pub mod constants;
pub mod entities;
pub mod errors;
pub mod round;
pub mod words;

pub use constants::{DEFAULT_WORDS, MAX_WRONG_GUESSES};
pub use entities::{GuessResult, Letter, Outcome};
pub use errors::{RoundError, RoundResult};
pub use round::{Round, start_round};
pub use words::{WordList, random_index};
