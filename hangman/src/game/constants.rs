/// Wrong guesses allowed before a round is lost.
pub const MAX_WRONG_GUESSES: usize = 6;

/// Words used when no list is configured.
pub const DEFAULT_WORDS: [&str; 8] = [
    "Morehouse",
    "Spelman",
    "Basketball",
    "Table",
    "Museum",
    "Excellent",
    "Fun",
    "React",
];

/// Placeholder shown for letters that have not been revealed yet.
pub const HIDDEN_LETTER: char = '_';
