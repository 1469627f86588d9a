//! Core system types and foundations
//!
//! Configuration, error handling, shared value types, and the application
//! state handed to every collaborator.

pub mod types;
pub mod error;
pub mod config;
pub mod app_state;
pub mod logging;

// Re-export commonly used items
pub use types::{Entity, EntityId, LeaderboardEntry, Rank, Score, ScoreDomain};
pub use error::{Error, Result};
pub use config::{load_config_or_default, Config};
pub use app_state::AppState;
