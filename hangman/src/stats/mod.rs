//! Player stats module: per-player win/loss counters keyed by name.
//!
//! This module implements:
//! - The [`StatsStore`] contract (create, read, atomic increment)
//! - An in-memory backend ([`MemoryStatsStore`])
//! - A configurable policy for creating a player that already exists
//!
//! The PostgreSQL backend lives in [`crate::db`].
//!
//! ## Example
//!
//! ```
//! use hangman::stats::{MemoryStatsStore, StatsStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = MemoryStatsStore::new();
//!     store.create_player("Ada").await?;
//!
//!     let record = store.increment_stat("Ada", true).await?;
//!     assert_eq!((record.wins, record.losses), (1, 0));
//!
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod memory;
pub mod models;
pub mod store;

pub use errors::{StatsError, StatsResult};
pub use memory::MemoryStatsStore;
pub use models::{CreatePolicy, MAX_PLAYER_NAME_LENGTH, PlayerRecord, validate_player_name};
pub use store::StatsStore;
