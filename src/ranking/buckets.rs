//! Score-bucketed membership for ordered top-K enumeration.
//!
//! Buckets are created on first insertion and reclaimed as soon as they
//! empty, so memory follows the number of scores currently in use. Members
//! of one bucket iterate in ascending id order; that is the tie-break for
//! every ordered result the index produces.

use std::collections::{btree_set, BTreeMap, BTreeSet};

use crate::core::types::{EntityId, Score};

/// Members of one bucket in ascending id order
pub type BucketMembers<'a> = std::iter::Copied<btree_set::Iter<'a, EntityId>>;

/// score -> ids currently holding that score
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScoreBuckets {
    buckets: BTreeMap<Score, BTreeSet<EntityId>>,
}

impl ScoreBuckets {
    /// Create an empty bucket set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id` into the bucket for `score`. Returns false if it was
    /// already a member.
    pub fn add_member(&mut self, score: Score, id: EntityId) -> bool {
        self.buckets.entry(score).or_default().insert(id)
    }

    /// Move `id` from `old` to `new`. Returns false if `id` was not in the
    /// `old` bucket, in which case nothing changes.
    pub fn move_member(&mut self, old: Score, new: Score, id: EntityId) -> bool {
        if old == new {
            return self.contains(old, id);
        }
        if !self.remove_member(old, id) {
            return false;
        }
        self.add_member(new, id);
        true
    }

    /// Whether `id` sits in the bucket for `score`
    pub fn contains(&self, score: Score, id: EntityId) -> bool {
        self.buckets
            .get(&score)
            .is_some_and(|bucket| bucket.contains(&id))
    }

    /// Number of members at exactly `score`
    pub fn len_at(&self, score: Score) -> usize {
        self.buckets.get(&score).map_or(0, BTreeSet::len)
    }

    /// Number of non-empty buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Non-empty buckets from `score` downwards, highest score first, each
    /// yielding its members in ascending id order.
    pub fn members_descending_from(
        &self,
        score: Score,
    ) -> impl Iterator<Item = (Score, BucketMembers<'_>)> + '_ {
        self.buckets
            .range(..=score)
            .rev()
            .map(|(&score, bucket)| (score, bucket.iter().copied()))
    }

    fn remove_member(&mut self, score: Score, id: EntityId) -> bool {
        let Some(bucket) = self.buckets.get_mut(&score) else {
            return false;
        };
        let removed = bucket.remove(&id);
        if bucket.is_empty() {
            self.buckets.remove(&score);
        }
        removed
    }
}
