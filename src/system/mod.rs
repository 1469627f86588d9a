//! System utilities and monitoring
//!
//! Metrics export and the health snapshot served by the API.

pub mod metrics;

pub mod health {
    //! Health snapshot of the running service
    use crate::ranking::RankingIndex;
    use serde::Serialize;
    use std::time::{Duration, Instant};

    /// Service health status
    #[derive(Debug, Clone, Serialize)]
    pub struct HealthStatus {
        /// Overall status; the index has no degraded mode
        pub status: &'static str,
        /// Human readable uptime
        pub uptime: String,
        /// Crate version
        pub version: &'static str,
        /// Committed entity count
        pub entities: usize,
    }

    /// Build the health snapshot for `index` given the process start time
    pub fn check(index: &RankingIndex, started_at: Instant) -> HealthStatus {
        HealthStatus {
            status: "healthy",
            uptime: format_uptime(started_at.elapsed()),
            version: crate::VERSION,
            entities: index.len(),
        }
    }

    /// Format a duration as `1d 2h 3m 4s`, dropping leading zero units
    pub fn format_uptime(elapsed: Duration) -> String {
        let secs = elapsed.as_secs();
        let (days, hours, mins, secs) = (
            secs / 86_400,
            (secs % 86_400) / 3600,
            (secs % 3600) / 60,
            secs % 60,
        );
        if days > 0 {
            format!("{}d {}h {}m {}s", days, hours, mins, secs)
        } else if hours > 0 {
            format!("{}h {}m {}s", hours, mins, secs)
        } else if mins > 0 {
            format!("{}m {}s", mins, secs)
        } else {
            format!("{}s", secs)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn uptime_drops_leading_zero_units() {
            assert_eq!(format_uptime(Duration::from_secs(5)), "5s");
            assert_eq!(format_uptime(Duration::from_secs(65)), "1m 5s");
            assert_eq!(format_uptime(Duration::from_secs(3601)), "1h 0m 1s");
            assert_eq!(format_uptime(Duration::from_secs(90_061)), "1d 1h 1m 1s");
        }
    }
}
