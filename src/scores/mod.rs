//! Durable leaderboard
//!
//! Persisted name → best-score table, consulted only by the HISCORE and
//! HISCORES commands.

pub mod store;

pub use store::ScoreStore;
