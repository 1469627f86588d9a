//! Synthetic write pressure: a background task that nudges the score of a
//! random existing entity on every tick until told to stop.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::core::config::SimulationConfig;
use crate::ranking::{RankingIndex, UpdateOutcome};
use crate::sim::seed::rng_from;
use crate::system::metrics::Metrics;

/// Periodic random score updates against existing ids
pub struct SyntheticLoadDriver {
    index: Arc<RankingIndex>,
    interval: Duration,
    max_delta: i32,
    rng: StdRng,
}

impl SyntheticLoadDriver {
    /// Build a driver from the simulation settings
    pub fn new(index: Arc<RankingIndex>, config: &SimulationConfig) -> Self {
        Self {
            index,
            interval: config.interval,
            max_delta: config.max_delta.max(0),
            rng: rng_from(config.rng_seed),
        }
    }

    /// Issue one update: a uniformly random existing id and a delta drawn
    /// from `[-max_delta, max_delta)`. `None` when the index is empty.
    pub fn step(&mut self) -> Option<UpdateOutcome> {
        let len = self.index.len();
        if len == 0 {
            return None;
        }

        let id = self.index.id_at(self.rng.random_range(0..len))?;
        let delta = if self.max_delta == 0 {
            0
        } else {
            self.rng.random_range(-self.max_delta..self.max_delta)
        };

        let outcome = self.index.update_score(id, delta as i64);
        Metrics::global().record_update(outcome);
        Some(outcome)
    }

    /// Run on the tokio runtime until `shutdown` flips to `true` or its
    /// sender is dropped. The handle yields the number of updates issued.
    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<u64> {
        tokio::spawn(self.run(shutdown))
    }

    async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> u64 {
        info!(
            interval = ?self.interval,
            max_delta = self.max_delta,
            "Synthetic load driver started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut issued = 0u64;

        loop {
            if *shutdown.borrow() {
                break;
            }
            tokio::select! {
                _ = ticker.tick() => {
                    if let Some(outcome) = self.step() {
                        issued += 1;
                        debug!(?outcome, "Synthetic score update");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        info!(issued, "Synthetic load driver stopped");
        issued
    }
}
