use hangman::Letter;
use std::fmt;

/// A line of player input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// A single letter
    Guess(Letter),
    /// Abandon the current round, if any, and start a new one
    NewRound,
    /// Show the player's wins and losses
    Stats,
    Help,
    Quit,
}

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Blank line.
    Empty,
    /// A single character that is not a letter.
    InvalidGuess(String),
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "Please enter a letter"),
            Self::InvalidGuess(value) => {
                write!(f, "'{}' is not a letter. Please enter a single letter", value)
            }
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Type 'help' to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a line of input into a [`Command`].
///
/// Any single character is a guess; commands are whole words, so a letter
/// such as `q` is always a guess and never a shortcut.
///
/// # Examples
///
/// ```
/// use hm_client::commands::{Command, parse_command};
///
/// assert!(matches!(parse_command("E"), Ok(Command::Guess(l)) if l.as_char() == 'e'));
/// assert_eq!(parse_command("new"), Ok(Command::NewRound));
/// assert_eq!(parse_command(" QUIT "), Ok(Command::Quit));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(ParseError::Empty);
    }

    if trimmed.chars().count() == 1 {
        return Letter::parse(trimmed)
            .map(Command::Guess)
            .map_err(|_| ParseError::InvalidGuess(trimmed.to_string()));
    }

    match trimmed.to_ascii_lowercase().as_str() {
        "new" | "again" => Ok(Command::NewRound),
        "stats" => Ok(Command::Stats),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}
