//! Synthetic data: startup seeding and the background load driver

/// Startup seeding
pub mod seed;

/// Background score updates
pub mod load_driver;

pub use load_driver::SyntheticLoadDriver;
pub use seed::{rng_from, seed_entities};
