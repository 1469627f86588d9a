//! Rankboard - an in-memory competition-ranked leaderboard
//!
//! Rankboard keeps a dynamic population of named entities with bounded
//! integer scores and answers "top K by score" and "find by name prefix"
//! while every entity's competition rank stays derivable in O(1). The
//! ranking index is the heart of the crate; HTTP, seeding, and synthetic
//! load are thin collaborators around it.
#![warn(missing_docs)]

// Core foundational modules
pub mod core;

// Main functional modules
pub mod ranking;
pub mod api;
pub mod sim;
pub mod system;

// Re-export commonly used items for convenience
pub use crate::core::{AppState, Config, Entity, Error, LeaderboardEntry, Result, ScoreDomain};
pub use ranking::RankingIndex;

/// Crate version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
