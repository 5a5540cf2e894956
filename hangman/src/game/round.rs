//! Hangman round state machine.
//!
//! A [`Round`] is a plain value. Every guess returns a new round together
//! with a [`GuessResult`]; the caller keeps whichever value it wants and
//! owns any notification or stats update. Nothing here performs I/O.
//!
//! ```text
//! InProgress --hit revealing the last letter--> Won
//! InProgress --sixth wrong letter-------------> Lost
//! ```
//!
//! `Won` and `Lost` are terminal; leaving them means starting a new round.

use std::collections::BTreeSet;

use super::constants::{HIDDEN_LETTER, MAX_WRONG_GUESSES};
use super::entities::{GuessResult, Letter, Outcome};
use super::errors::{RoundError, RoundResult};
use super::words::WordList;

/// Start a fresh round with a word picked from `words`.
///
/// `select` receives the list length and returns the index of the word to
/// play. Pass [`random_index`](super::words::random_index) for a uniform
/// pick or a fixed closure in tests. An index outside the list is a
/// configuration error.
///
/// # Examples
///
/// ```
/// use hangman::game::{Outcome, WordList, start_round};
///
/// let words = WordList::new(["Table", "Fun"]).unwrap();
/// let round = start_round(&words, |_| 1).unwrap();
/// assert_eq!(round.word(), "Fun");
/// assert_eq!(round.outcome(), Outcome::InProgress);
/// ```
pub fn start_round<F>(words: &WordList, select: F) -> RoundResult<Round>
where
    F: FnOnce(usize) -> usize,
{
    let len = words.len();
    if len == 0 {
        return Err(RoundError::EmptyWordList);
    }

    let index = select(len);
    let word = words
        .get(index)
        .ok_or(RoundError::IndexOutOfBounds { index, len })?;

    log::debug!("starting round with word #{index} ({} letters)", word.len());

    Ok(Round {
        word: word.to_string(),
        guessed_letters: BTreeSet::new(),
        missed_letters: Vec::with_capacity(MAX_WRONG_GUESSES),
        outcome: Outcome::InProgress,
    })
}

/// One playthrough for a single hidden word.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Round {
    /// Word as it appears in the list; comparisons are case-folded.
    word: String,
    /// Lowercase letters guessed that occur in the word.
    guessed_letters: BTreeSet<char>,
    /// Lowercase letters guessed that do not occur in the word, in the
    /// order they were submitted.
    missed_letters: Vec<char>,
    outcome: Outcome,
}

impl Round {
    /// Submit raw player input as a guess.
    ///
    /// # Errors
    ///
    /// * `RoundError::InvalidInput` - input is not exactly one letter
    /// * `RoundError::RoundClosed` - the round is already won or lost
    pub fn guess(&self, input: &str) -> RoundResult<(Round, GuessResult)> {
        let letter = Letter::parse(input)?;
        self.guess_letter(letter)
    }

    /// Submit an already validated letter as a guess.
    ///
    /// # Errors
    ///
    /// * `RoundError::RoundClosed` - the round is already won or lost
    pub fn guess_letter(&self, letter: Letter) -> RoundResult<(Round, GuessResult)> {
        if self.outcome.is_terminal() {
            return Err(RoundError::RoundClosed);
        }

        let c = letter.as_char();
        if self.guessed_letters.contains(&c) || self.missed_letters.contains(&c) {
            return Ok((self.clone(), GuessResult::AlreadyGuessed));
        }

        let mut next = self.clone();
        if next.contains(c) {
            next.guessed_letters.insert(c);
            let won = next.is_solved();
            if won {
                next.outcome = Outcome::Won;
            }
            Ok((next, GuessResult::Hit { won }))
        } else {
            next.missed_letters.push(c);
            let lost = next.missed_letters.len() >= MAX_WRONG_GUESSES;
            if lost {
                next.outcome = Outcome::Lost;
            }
            Ok((next, GuessResult::Miss { lost }))
        }
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn guessed_letters(&self) -> &BTreeSet<char> {
        &self.guessed_letters
    }

    pub fn missed_letters(&self) -> &[char] {
        &self.missed_letters
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// Wrong guesses still allowed.
    pub fn tries_left(&self) -> usize {
        MAX_WRONG_GUESSES.saturating_sub(self.missed_letters.len())
    }

    /// Gallows drawing stage, `0` (empty noose) to `MAX_WRONG_GUESSES`.
    pub fn stage(&self) -> usize {
        self.missed_letters.len()
    }

    /// Whether `c` has been guessed, ignoring case. Guessed letters show
    /// unmasked wherever they occur in the word.
    pub fn is_revealed(&self, c: char) -> bool {
        self.guessed_letters.contains(&c.to_ascii_lowercase())
    }

    /// The word with unrevealed letters replaced by `_`, keeping the
    /// display case of revealed ones.
    pub fn masked_word(&self) -> String {
        self.masked_word_with(HIDDEN_LETTER)
    }

    pub fn masked_word_with(&self, placeholder: char) -> String {
        self.word
            .chars()
            .map(|c| if self.is_revealed(c) { c } else { placeholder })
            .collect()
    }

    /// Missed letters in submission order, uppercase and comma separated,
    /// or `"None"` when there are none yet.
    pub fn missed_display(&self) -> String {
        if self.missed_letters.is_empty() {
            return "None".to_string();
        }
        self.missed_letters
            .iter()
            .map(|c| c.to_ascii_uppercase().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// End-of-round message, only once the round is over.
    pub fn end_message(&self) -> Option<String> {
        match self.outcome {
            Outcome::InProgress => None,
            Outcome::Won => Some(format!("You Won! The word was {}", self.word)),
            Outcome::Lost => Some(format!("You Lost! The word was {}", self.word)),
        }
    }

    fn contains(&self, c: char) -> bool {
        self.word.chars().any(|w| w.to_ascii_lowercase() == c)
    }

    fn is_solved(&self) -> bool {
        self.word
            .chars()
            .all(|c| self.guessed_letters.contains(&c.to_ascii_lowercase()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_with(word: &str) -> Round {
        let words = WordList::new([word]).unwrap();
        start_round(&words, |_| 0).unwrap()
    }

    fn play(mut round: Round, guesses: &str) -> Round {
        for c in guesses.chars() {
            round = round.guess(&c.to_string()).unwrap().0;
        }
        round
    }

    #[test]
    fn test_new_round_is_fresh() {
        let round = round_with("Museum");
        assert_eq!(round.outcome(), Outcome::InProgress);
        assert!(round.guessed_letters().is_empty());
        assert!(round.missed_letters().is_empty());
        assert_eq!(round.tries_left(), MAX_WRONG_GUESSES);
        assert_eq!(round.masked_word(), "______");
    }

    #[test]
    fn test_is_revealed_is_per_letter_not_per_position() {
        let round = play(round_with("Museum"), "M");
        assert!(round.is_revealed('m'));
        assert!(round.is_revealed('M'));
        assert!(!round.is_revealed('u'));
        // Both occurrences of the letter show
        assert_eq!(round.masked_word(), "M____m");
    }

    #[test]
    fn test_selector_picks_word() {
        let words = WordList::default();
        let round = start_round(&words, |len| len - 1).unwrap();
        assert_eq!(round.word(), "React");
    }

    #[test]
    fn test_selector_out_of_bounds() {
        let words = WordList::new(["fun"]).unwrap();
        let err = start_round(&words, |len| len).unwrap_err();
        assert_eq!(err, RoundError::IndexOutOfBounds { index: 1, len: 1 });
        assert!(err.is_configuration());
    }

    #[test]
    fn test_hit_reveals_letter_case_insensitively() {
        let round = round_with("Table");
        let (round, result) = round.guess("T").unwrap();
        assert_eq!(result, GuessResult::Hit { won: false });
        assert!(round.guessed_letters().contains(&'t'));
        assert_eq!(round.masked_word(), "T____");
    }

    #[test]
    fn test_repeated_letter_in_word() {
        let round = play(round_with("Basketball"), "bal");
        assert_eq!(round.masked_word(), "Ba____ball");
        assert_eq!(round.outcome(), Outcome::InProgress);
    }

    #[test]
    fn test_miss_tracks_order() {
        let round = play(round_with("fun"), "zxq");
        assert_eq!(round.missed_letters(), &['z', 'x', 'q']);
        assert_eq!(round.tries_left(), 3);
        assert_eq!(round.stage(), 3);
        assert_eq!(round.missed_display(), "Z, X, Q");
    }

    #[test]
    fn test_already_guessed_leaves_round_unchanged() {
        let round = play(round_with("fun"), "fz");

        let (same, result) = round.guess("F").unwrap();
        assert_eq!(result, GuessResult::AlreadyGuessed);
        assert_eq!(same, round);

        let (same, result) = round.guess("z").unwrap();
        assert_eq!(result, GuessResult::AlreadyGuessed);
        assert_eq!(same, round);
    }

    #[test]
    fn test_invalid_input_is_not_a_miss() {
        let round = round_with("fun");
        assert_eq!(
            round.guess("4").unwrap_err(),
            RoundError::InvalidInput("4".to_string())
        );
        assert_eq!(
            round.guess("fu").unwrap_err(),
            RoundError::InvalidInput("fu".to_string())
        );
        assert!(round.missed_letters().is_empty());
    }

    #[test]
    fn test_win_and_end_message() {
        let round = play(round_with("Fun"), "fu");
        let (round, result) = round.guess("n").unwrap();
        assert_eq!(result, GuessResult::Hit { won: true });
        assert_eq!(round.outcome(), Outcome::Won);
        assert_eq!(round.end_message().as_deref(), Some("You Won! The word was Fun"));
    }

    #[test]
    fn test_loss_closes_round() {
        let round = play(round_with("Fun"), "zxqjv");
        let (round, result) = round.guess("w").unwrap();
        assert_eq!(result, GuessResult::Miss { lost: true });
        assert_eq!(round.outcome(), Outcome::Lost);
        assert_eq!(round.tries_left(), 0);
        assert_eq!(round.end_message().as_deref(), Some("You Lost! The word was Fun"));
        assert_eq!(round.guess("f").unwrap_err(), RoundError::RoundClosed);
    }

    #[test]
    fn test_invalid_input_checked_before_closed_round() {
        let round = play(round_with("fun"), "fun");
        assert!(round.is_over());
        assert!(matches!(round.guess("?"), Err(RoundError::InvalidInput(_))));
        assert_eq!(round.guess("a").unwrap_err(), RoundError::RoundClosed);
    }
}
