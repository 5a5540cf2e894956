//! Hangman HTTP server.
//!
//! Exposes the player stats store and server-side game sessions over a
//! JSON API. The binary in `main.rs` wires configuration, logging, metrics
//! and the chosen stats backend together.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod sessions;
