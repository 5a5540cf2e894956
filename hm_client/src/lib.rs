//! Internal modules for the hangman client.
//!
//! This library provides command parsing, the HTTP stats client, and the
//! console game loop used by the hm_client binary.

pub mod api_client;
pub mod commands;
pub mod console;
