//! Shared value types: ids, scores, the score domain and the read-only
//! leaderboard projection.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{Error, Result};

/// Externally assigned entity identifier. Never reused.
pub type EntityId = i64;

/// Integer score, always inside the index's [`ScoreDomain`] once committed.
pub type Score = i32;

/// Competition rank: 1 + number of entities with a strictly higher score.
pub type Rank = usize;

/// Lowest score of the default domain
pub const DEFAULT_MIN_SCORE: Score = 100;

/// Highest score of the default domain
pub const DEFAULT_MAX_SCORE: Score = 5000;

/// Closed score interval `[min, max]` every committed score is clamped into.
///
/// The domain is fixed when a ranking index is built. All translation from a
/// raw score to an array slot goes through [`ScoreDomain::offset`], which is
/// the only place the bounds are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreDomain {
    min: Score,
    max: Score,
}

impl ScoreDomain {
    /// Build a domain, rejecting an inverted interval.
    pub fn new(min: Score, max: Score) -> Result<Self> {
        if min > max {
            return Err(Error::config(format!(
                "score domain is empty: min {} exceeds max {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Lowest admissible score
    pub fn min(&self) -> Score {
        self.min
    }

    /// Highest admissible score
    pub fn max(&self) -> Score {
        self.max
    }

    /// Number of distinct scores in the domain
    pub fn size(&self) -> usize {
        (self.max as i64 - self.min as i64 + 1) as usize
    }

    /// Whether `score` lies inside the domain
    pub fn contains(&self, score: Score) -> bool {
        (self.min..=self.max).contains(&score)
    }

    /// Saturate `score` at the nearer bound.
    pub fn clamp(&self, score: i64) -> Score {
        score.clamp(self.min as i64, self.max as i64) as Score
    }

    /// Zero-based slot of `score`, or `None` outside the domain.
    pub fn offset(&self, score: Score) -> Option<usize> {
        if self.contains(score) {
            Some((score as i64 - self.min as i64) as usize)
        } else {
            None
        }
    }
}

impl Default for ScoreDomain {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_SCORE,
            max: DEFAULT_MAX_SCORE,
        }
    }
}

impl fmt::Display for ScoreDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// A ranked participant. The name is immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique id
    pub id: EntityId,
    /// Display name, indexed by lower-cased prefix
    #[serde(rename = "username")]
    pub name: String,
    /// Current score
    #[serde(rename = "rating")]
    pub score: Score,
}

impl Entity {
    /// Create a new entity record
    pub fn new(id: EntityId, name: impl Into<String>, score: Score) -> Self {
        Self {
            id,
            name: name.into(),
            score,
        }
    }
}

/// Read-only projection returned by queries. Computed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    /// Competition rank
    pub rank: Rank,
    /// Entity name
    #[serde(rename = "username")]
    pub name: String,
    /// Entity score
    #[serde(rename = "rating")]
    pub score: Score,
}
