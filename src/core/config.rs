//! Configuration management for Rankboard
//!
//! Settings come from an optional TOML file, then environment overrides, then
//! command line overrides applied by the binary.

use crate::core::error::{Error, Result};
use crate::core::types::{Score, ScoreDomain, DEFAULT_MAX_SCORE, DEFAULT_MIN_SCORE};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

/// Fallback HTTP port when neither the file nor `PORT` provides one
pub const DEFAULT_PORT: u16 = 8080;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Score domain of the ranking index
    pub ranking: RankingConfig,

    /// Startup seeding
    pub seed: SeedConfig,

    /// Synthetic load driver
    pub simulation: SimulationConfig,

    /// Metrics configuration
    pub metrics: MetricsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP server bind address
    pub http_addr: SocketAddr,
}

/// Ranking index configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Lowest admissible score
    pub min_score: Score,

    /// Highest admissible score
    pub max_score: Score,
}

/// Seeding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Number of synthetic entities added at startup
    pub count: usize,

    /// Fixed RNG seed for reproducible data (None = seeded from the OS)
    pub rng_seed: Option<u64>,
}

/// Synthetic load configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Run the load driver
    pub enabled: bool,

    /// Delay between two score updates
    #[serde(
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub interval: Duration,

    /// Deltas are drawn from `[-max_delta, max_delta)`
    pub max_delta: i32,

    /// Fixed RNG seed for the driver (None = seeded from the OS)
    pub rng_seed: Option<u64>,
}

/// Metrics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Expose Prometheus metrics on `/metrics`
    pub enable_prometheus: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            max_score: DEFAULT_MAX_SCORE,
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            count: 10_000,
            rng_seed: None,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: Duration::from_millis(100),
            max_delta: 50,
            rng_seed: None,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enable_prometheus: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        Self::from_toml(&contents)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| Error::config(format!("Failed to parse config file: {}", e)))
    }

    /// Score domain described by the ranking section
    pub fn score_domain(&self) -> Result<ScoreDomain> {
        ScoreDomain::new(self.ranking.min_score, self.ranking.max_score)
    }

    /// Apply environment variable overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source.
    ///
    /// `PORT` replaces only the port of the configured address;
    /// `RANKBOARD_HTTP_ADDR` replaces the whole address and wins over `PORT`.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").filter(|p| !p.is_empty()) {
            let port: u16 = port
                .parse()
                .map_err(|e| Error::config(format!("Invalid PORT: {}", e)))?;
            self.server.http_addr.set_port(port);
        }

        if let Some(addr) = lookup("RANKBOARD_HTTP_ADDR") {
            self.server.http_addr = addr
                .parse()
                .map_err(|e| Error::config(format!("Invalid HTTP address: {}", e)))?;
        }

        if let Some(count) = lookup("RANKBOARD_SEED_COUNT") {
            self.seed.count = count
                .parse()
                .map_err(|e| Error::config(format!("Invalid seed count: {}", e)))?;
        }

        if let Some(enabled) = lookup("RANKBOARD_SIMULATION") {
            self.simulation.enabled = enabled
                .parse()
                .map_err(|e| Error::config(format!("Invalid simulation flag: {}", e)))?;
        }

        if let Some(level) = lookup("RANKBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.score_domain()?;

        if self.simulation.interval.is_zero() {
            return Err(Error::config("Simulation interval must be non-zero"));
        }

        if self.simulation.max_delta < 0 {
            return Err(Error::config("Simulation max_delta must not be negative"));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => return Err(Error::config(format!("Invalid log level: {}", other))),
        }

        Ok(())
    }
}

/// Load configuration from file or use defaults, then apply the environment
/// and validate.
pub fn load_config_or_default(path: Option<&str>) -> Result<Config> {
    load_config_with(path, |key| std::env::var(key).ok())
}

fn load_config_with<F>(path: Option<&str>, lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => match Config::from_file(path) {
            Ok(config) => {
                info!("Loaded configuration from: {}", path);
                config
            }
            Err(e) => {
                warn!("Failed to load config from {}: {}. Using defaults.", path, e);
                Config::default()
            }
        },
        None => {
            info!("No config file specified, using defaults");
            Config::default()
        }
    };

    config.apply_overrides_from(lookup)?;
    config.validate()?;
    Ok(config)
}

use serde::de::{self, Deserializer, Visitor};
use serde::Serializer;
use std::fmt;

// Accepts "250ms", "5s", "2m", "1h", a bare number of seconds as a string,
// or an integer number of seconds.
fn deserialize_duration<'de, D>(deserializer: D) -> std::result::Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct DurationVisitor;

    impl<'de> Visitor<'de> for DurationVisitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a duration string like '100ms' or '5s'")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Duration, E>
        where
            E: de::Error,
        {
            parse_duration(value).map_err(E::custom)
        }

        fn visit_i64<E>(self, value: i64) -> std::result::Result<Duration, E>
        where
            E: de::Error,
        {
            u64::try_from(value)
                .map(Duration::from_secs)
                .map_err(|_| E::custom("duration must not be negative"))
        }

        fn visit_u64<E>(self, value: u64) -> std::result::Result<Duration, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(value))
        }
    }

    deserializer.deserialize_any(DurationVisitor)
}

fn serialize_duration<S>(duration: &Duration, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{}ms", duration.as_millis()))
}

fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if let Some(ms) = s.strip_suffix("ms") {
        let ms: u64 = ms.parse().map_err(|_| "Invalid milliseconds")?;
        Ok(Duration::from_millis(ms))
    } else if let Some(secs) = s.strip_suffix('s') {
        let secs: u64 = secs.parse().map_err(|_| "Invalid seconds")?;
        Ok(Duration::from_secs(secs))
    } else if let Some(mins) = s.strip_suffix('m') {
        let mins: u64 = mins.parse().map_err(|_| "Invalid minutes")?;
        Ok(Duration::from_secs(mins * 60))
    } else if let Some(hours) = s.strip_suffix('h') {
        let hours: u64 = hours.parse().map_err(|_| "Invalid hours")?;
        Ok(Duration::from_secs(hours * 3600))
    } else {
        let secs: u64 = s.parse().map_err(|_| "Invalid duration format")?;
        Ok(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.server.http_addr.port(), DEFAULT_PORT);
        assert_eq!(config.score_domain().unwrap(), ScoreDomain::default());
        assert_eq!(config.seed.count, 10_000);
        assert_eq!(config.simulation.interval, Duration::from_millis(100));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let config = Config::from_toml(
            r#"
            [ranking]
            min_score = 0
            max_score = 10

            [simulation]
            interval = "250ms"
            "#,
        )
        .unwrap();

        assert_eq!(config.ranking.min_score, 0);
        assert_eq!(config.ranking.max_score, 10);
        assert_eq!(config.simulation.interval, Duration::from_millis(250));
        assert_eq!(config.simulation.max_delta, 50);
        assert_eq!(config.server.http_addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn integer_interval_is_seconds() {
        let config = Config::from_toml("[simulation]\ninterval = 2\n").unwrap();
        assert_eq!(config.simulation.interval, Duration::from_secs(2));
    }

    #[test]
    fn reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[seed]\ncount = 42\nrng_seed = 7").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.seed.count, 42);
        assert_eq!(config.seed.rng_seed, Some(7));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = "/nonexistent/rankboard.toml";
        assert!(Config::from_file(path).is_err());

        let config = load_config_with(Some(path), |_| None).unwrap();
        assert_eq!(config, Config::default());

        let env = vars(&[("RANKBOARD_SEED_COUNT", "12")]);
        let config = load_config_with(Some(path), |k| env.get(k).cloned()).unwrap();
        assert_eq!(config.seed.count, 12);
        assert_eq!(config.ranking.max_score, DEFAULT_MAX_SCORE);
    }

    #[test]
    fn port_override_keeps_host() {
        let mut config = Config::default();
        let env = vars(&[("PORT", "9000")]);
        config.apply_overrides_from(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.server.http_addr, "0.0.0.0:9000".parse().unwrap());
    }

    #[test]
    fn empty_port_is_ignored() {
        let mut config = Config::default();
        let env = vars(&[("PORT", "")]);
        config.apply_overrides_from(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.server.http_addr.port(), DEFAULT_PORT);
    }

    #[test]
    fn explicit_addr_wins_over_port() {
        let mut config = Config::default();
        let env = vars(&[
            ("PORT", "9000"),
            ("RANKBOARD_HTTP_ADDR", "127.0.0.1:7000"),
            ("RANKBOARD_SEED_COUNT", "5"),
            ("RANKBOARD_SIMULATION", "false"),
        ]);
        config.apply_overrides_from(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.server.http_addr, "127.0.0.1:7000".parse().unwrap());
        assert_eq!(config.seed.count, 5);
        assert!(!config.simulation.enabled);
    }

    #[test]
    fn bad_port_is_rejected() {
        let mut config = Config::default();
        let env = vars(&[("PORT", "eighty")]);
        let err = config
            .apply_overrides_from(|k| env.get(k).cloned())
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn validate_rejects_bad_values() {
        let mut config = Config::default();
        config.ranking.min_score = 10;
        config.ranking.max_score = 1;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.simulation.interval = Duration::ZERO;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "loud".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn parses_duration_suffixes() {
        assert_eq!(parse_duration("15ms").unwrap(), Duration::from_millis(15));
        assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("2m").unwrap(), Duration::from_secs(120));
        assert_eq!(parse_duration("1h").unwrap(), Duration::from_secs(3600));
        assert_eq!(parse_duration("9").unwrap(), Duration::from_secs(9));
        assert!(parse_duration("soon").is_err());
    }
}
