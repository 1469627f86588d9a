//! Prometheus metrics for the ranking service.
//!
//! All recording happens at the collaborator layer (handlers, seeder, load
//! driver) after the index lock has been released.

use crate::core::error::Result;
use crate::ranking::UpdateOutcome;
use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntGauge, Registry};

/// Crate-owned metrics registry
static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// Counters and gauges describing ranking traffic
pub struct Metrics {
    /// Entities newly registered
    pub entities_added: IntCounter,
    /// Score updates that moved an entity
    pub score_updates_applied: IntCounter,
    /// Score updates that changed nothing (unknown id or clamped no-op)
    pub score_updates_skipped: IntCounter,
    /// Top-K queries served
    pub top_queries: IntCounter,
    /// Prefix searches served
    pub search_queries: IntCounter,
    /// Committed entity count
    pub entity_count: IntGauge,
}

impl Metrics {
    /// Create and register a metrics set in `registry`
    pub fn new(registry: &Registry) -> Result<Self> {
        let metrics = Self {
            entities_added: IntCounter::new(
                "rankboard_entities_added_total",
                "Total number of entities added",
            )?,
            score_updates_applied: IntCounter::new(
                "rankboard_score_updates_applied_total",
                "Total number of score updates that moved an entity",
            )?,
            score_updates_skipped: IntCounter::new(
                "rankboard_score_updates_skipped_total",
                "Total number of score updates that changed nothing",
            )?,
            top_queries: IntCounter::new(
                "rankboard_top_queries_total",
                "Total number of top-K queries",
            )?,
            search_queries: IntCounter::new(
                "rankboard_search_queries_total",
                "Total number of prefix searches",
            )?,
            entity_count: IntGauge::new("rankboard_entities", "Number of committed entities")?,
        };

        registry.register(Box::new(metrics.entities_added.clone()))?;
        registry.register(Box::new(metrics.score_updates_applied.clone()))?;
        registry.register(Box::new(metrics.score_updates_skipped.clone()))?;
        registry.register(Box::new(metrics.top_queries.clone()))?;
        registry.register(Box::new(metrics.search_queries.clone()))?;
        registry.register(Box::new(metrics.entity_count.clone()))?;

        Ok(metrics)
    }

    /// Get the global metrics instance
    pub fn global() -> &'static Metrics {
        static INSTANCE: Lazy<Metrics> = Lazy::new(|| {
            Metrics::new(&REGISTRY).expect("metric names are unique within the crate registry")
        });
        &INSTANCE
    }

    /// Record the outcome of one score update
    pub fn record_update(&self, outcome: UpdateOutcome) {
        if outcome.is_applied() {
            self.score_updates_applied.inc();
        } else {
            self.score_updates_skipped.inc();
        }
    }
}

/// Initialize the global metrics so every series is exported from startup
pub fn init_registry() {
    let _ = Metrics::global();
}

/// Get the crate registry
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Collect all metrics in the Prometheus text exposition format
pub fn collect_metrics() -> Result<String> {
    let encoder = prometheus::TextEncoder::new();
    let metric_families = registry().gather();
    Ok(encoder.encode_to_string(&metric_families)?)
}
