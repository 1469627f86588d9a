//! In-memory ranking index
//!
//! Three derived structures sit next to the entity records:
//! - [`RatingHistogram`]: per-score counts plus the strictly-higher suffix
//!   table that yields competition rank in O(1)
//! - [`ScoreBuckets`]: score -> ids, walked from the top for top-K
//! - [`NamePrefixIndex`]: lower-cased prefix -> ids for name search
//!
//! [`RankingIndex`] owns all of them and keeps them consistent.

/// Rank histogram
pub mod histogram;

/// Score buckets
pub mod buckets;

/// Name prefix index
pub mod prefix_index;

/// Entity records
pub mod store;

/// Coordinator
pub mod index;


pub use buckets::ScoreBuckets;
pub use histogram::RatingHistogram;
pub use index::{IndexStats, RankingIndex, UpdateOutcome};
pub use prefix_index::NamePrefixIndex;
pub use store::EntityStore;
