//! Tracing subscriber setup
//!
//! The subscriber is installed before configuration is loaded so config
//! loading itself is logged; the level is swapped in place once the final
//! configuration is known. `RUST_LOG`, when set, always wins.

use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

use crate::core::error::{Error, Result};

/// Handle for changing the level of the installed subscriber
pub struct LogHandle(reload::Handle<EnvFilter, Registry>);

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

/// Install the global subscriber at `default_level`.
///
/// Returns `None` if a global subscriber was already installed.
pub fn init_logging(default_level: &str) -> Option<LogHandle> {
    let (filter, handle) = reload::Layer::new(filter_for(default_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .try_init()
        .ok()?;
    Some(LogHandle(handle))
}

impl LogHandle {
    /// Replace the active level
    pub fn set_level(&self, level: &str) -> Result<()> {
        self.0
            .reload(filter_for(level))
            .map_err(|e| Error::config(format!("Failed to apply log level {}: {}", level, e)))
    }
}
