//! Application State Management
//!
//! The single object handed to every collaborator: the ranking index, the
//! configuration it was built from, and the process start time. Handlers,
//! the seeder and the load driver all receive it explicitly.

use std::sync::Arc;
use std::time::Instant;

use crate::core::config::Config;
use crate::core::error::Result;
use crate::ranking::RankingIndex;

/// Central application state
#[derive(Debug)]
pub struct AppState {
    /// Ranking index shared by handlers and background tasks
    pub index: Arc<RankingIndex>,

    /// Application configuration
    pub config: Config,

    /// When the state was created
    pub started_at: Instant,
}

impl AppState {
    /// Build the state and an empty index from a validated configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let domain = config.score_domain()?;
        Ok(Self::new(Arc::new(RankingIndex::new(domain)), config))
    }

    /// Wrap an existing index
    pub fn new(index: Arc<RankingIndex>, config: Config) -> Self {
        Self {
            index,
            config,
            started_at: Instant::now(),
        }
    }
}
