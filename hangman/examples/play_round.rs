//! Round Example
//!
//! Plays two scripted rounds against the in-memory stats store and prints
//! the board after every guess.

use hangman::{MemoryStatsStore, Outcome, Round, StatsStore, WordList, start_round};

fn print_board(round: &Round) {
    println!(
        "  {}   Tries Left: {}   Missed Letters: {}",
        round.masked_word(),
        round.tries_left(),
        round.missed_display()
    );
}

fn play(words: &WordList, index: usize, guesses: &[&str]) -> Result<Round, hangman::RoundError> {
    let mut round = start_round(words, |_| index)?;
    print_board(&round);

    for guess in guesses {
        let (next, result) = round.guess(guess)?;
        println!("Guess {guess:?} -> {result:?}");
        round = next;
        print_board(&round);
        if round.is_over() {
            break;
        }
    }
    Ok(round)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Hangman Round Example ===\n");

    let words = WordList::default();
    let store = MemoryStatsStore::new();
    store.create_player("Ada").await?;

    // Table: every letter guessed, won on "e"
    let won = play(&words, 3, &["t", "a", "a", "b", "l", "e"])?;
    // Fun: six wrong letters
    let lost = play(&words, 6, &["z", "x", "q", "j", "v", "w"])?;

    for round in [&won, &lost] {
        if let Some(message) = round.end_message() {
            println!("{message}");
        }
        store
            .increment_stat("Ada", round.outcome() == Outcome::Won)
            .await?;
    }

    if let Some(record) = store.get_player("Ada").await? {
        println!("\nAda: {} wins, {} losses", record.wins, record.losses);
    }
    Ok(())
}
