//! Line-oriented game loop.
//!
//! Rounds are played locally with the `hangman` engine; only logging in and
//! counting finished rounds touch the stats store. The loop is generic over
//! its input and output so it can be driven from tests.

use anyhow::{Context, Result};
use hangman::{GuessResult, Letter, Round, StatsStore, WordList, start_round};
use std::io::{BufRead, Write};

use crate::commands::{Command, parse_command};

const HELP: &str = "\
Type a letter to guess it.

COMMANDS:
  new      Start a new round
  stats    Show your wins and losses
  help     Show this message
  quit     Leave the game
";

/// Gallows drawings, one per wrong guess
const GALLOWS: [&str; 7] = [
    "  +---+\n      |\n      |\n      |\n     ===",
    "  +---+\n  O   |\n      |\n      |\n     ===",
    "  +---+\n  O   |\n  |   |\n      |\n     ===",
    "  +---+\n  O   |\n /|   |\n      |\n     ===",
    "  +---+\n  O   |\n /|\\  |\n      |\n     ===",
    "  +---+\n  O   |\n /|\\  |\n /    |\n     ===",
    "  +---+\n  O   |\n /|\\  |\n / \\  |\n     ===",
];

/// Totals for one console session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub won: u32,
    pub lost: u32,
    /// Finished rounds whose result never reached the store
    pub unreported: usize,
}

/// Render the board for a round
pub fn render_board(round: &Round) -> String {
    let word: Vec<String> = round
        .masked_word()
        .chars()
        .map(|c| c.to_string())
        .collect();

    format!(
        "{}\n\nWord: {}\nTries Left: {}\nMissed Letters: {}",
        GALLOWS[round.stage().min(GALLOWS.len() - 1)],
        word.join(" "),
        round.tries_left(),
        round.missed_display()
    )
}

/// Play rounds until the player quits or input ends.
///
/// The player is looked up and created if missing before the first round.
/// A finished round is reported once; if that fails the report is retried
/// before the next command is handled.
///
/// # Errors
///
/// Fails when the player cannot be logged in or when reading input or
/// writing output fails. Stats failures after login are shown to the
/// player and do not end the session.
pub async fn play_session<R, W, F>(
    store: &dyn StatsStore,
    words: &WordList,
    player_name: &str,
    mut select: F,
    mut input: R,
    mut output: W,
) -> Result<SessionSummary>
where
    R: BufRead,
    W: Write,
    F: FnMut(usize) -> usize,
{
    let (record, created) = store
        .get_or_create_player(player_name)
        .await
        .map_err(|e| anyhow::anyhow!(e.client_message()))
        .context("Failed to log in")?;

    if created {
        writeln!(output, "Welcome, {}!", record.player_name)?;
    } else {
        writeln!(
            output,
            "Welcome back, {}! Wins: {}  Losses: {}",
            record.player_name, record.wins, record.losses
        )?;
    }

    let mut summary = SessionSummary::default();
    let mut pending: Vec<bool> = Vec::new();
    let mut round = start_round(words, &mut select)?;
    writeln!(output, "\n{}", render_board(&round))?;

    let mut line = String::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        if !pending.is_empty() {
            retry_pending(store, player_name, &mut pending, &mut output).await?;
        }

        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(output, "{e}")?;
                continue;
            }
        };

        match command {
            Command::Guess(letter) => {
                let Some(next) = apply_guess(&round, letter, &mut output)? else {
                    continue;
                };
                round = next;

                if round.is_over() {
                    let won = round.outcome() == hangman::Outcome::Won;
                    if won {
                        summary.won += 1;
                    } else {
                        summary.lost += 1;
                    }
                    if let Some(message) = round.end_message() {
                        writeln!(output, "{message}")?;
                    }
                    if !report(store, player_name, won, &mut output).await? {
                        pending.push(won);
                    }
                    writeln!(output, "Type 'new' to play again or 'quit' to leave.")?;
                }
            }
            Command::NewRound => {
                round = start_round(words, &mut select)?;
                writeln!(output, "\n{}", render_board(&round))?;
            }
            Command::Stats => match store.get_player(player_name).await {
                Ok(Some(record)) => writeln!(
                    output,
                    "{}: Wins: {}  Losses: {}",
                    record.player_name, record.wins, record.losses
                )?,
                Ok(None) => writeln!(output, "Player not found")?,
                Err(e) => writeln!(output, "Could not load stats: {}", e.client_message())?,
            },
            Command::Help => write!(output, "{HELP}")?,
            Command::Quit => break,
        }
    }

    summary.unreported = pending.len();
    match summary.unreported {
        0 => {}
        1 => writeln!(output, "Your last result could not be saved.")?,
        n => writeln!(output, "Your last {n} results could not be saved.")?,
    }
    writeln!(output, "Goodbye!")?;
    Ok(summary)
}

/// Apply a guess and print the result; `None` when the round is unchanged
fn apply_guess<W: Write>(round: &Round, letter: Letter, output: &mut W) -> Result<Option<Round>> {
    if round.is_over() {
        writeln!(output, "Round is over. Type 'new' to play again.")?;
        return Ok(None);
    }

    let (next, result) = round.guess_letter(letter)?;
    if let Some(notice) = result.notice(letter) {
        writeln!(output, "{notice}")?;
    }
    if result == GuessResult::AlreadyGuessed {
        return Ok(None);
    }

    writeln!(output, "\n{}", render_board(&next))?;
    Ok(Some(next))
}

/// Report a finished round; `false` when it has to be retried
async fn report<W: Write>(
    store: &dyn StatsStore,
    player_name: &str,
    won: bool,
    output: &mut W,
) -> Result<bool> {
    match store.increment_stat(player_name, won).await {
        Ok(record) => {
            writeln!(output, "Wins: {}  Losses: {}", record.wins, record.losses)?;
            Ok(true)
        }
        Err(e) => {
            writeln!(
                output,
                "Could not save your result ({}). Will retry.",
                e.client_message()
            )?;
            Ok(false)
        }
    }
}

/// Retry unsaved results oldest first, stopping at the first failure
async fn retry_pending<W: Write>(
    store: &dyn StatsStore,
    player_name: &str,
    pending: &mut Vec<bool>,
    output: &mut W,
) -> Result<()> {
    while let Some(&won) = pending.first() {
        if !report(store, player_name, won, output).await? {
            break;
        }
        pending.remove(0);
    }
    Ok(())
}
