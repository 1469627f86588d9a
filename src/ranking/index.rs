//! The ranking index: one object owning the entity store, the histogram,
//! the score buckets and the prefix index behind a single reader-writer lock.
//!
//! Writers (`add`, `update_score`) hold the lock exclusively and touch all
//! four structures before releasing it; readers (`top`, `search`, `get`)
//! share it. No query can observe a rank that disagrees with bucket
//! membership or a committed score. Nothing under the lock blocks or logs.

use parking_lot::RwLock;
use serde::Serialize;
use tracing::warn;

use crate::core::types::{Entity, EntityId, LeaderboardEntry, Score, ScoreDomain};
use crate::ranking::buckets::ScoreBuckets;
use crate::ranking::histogram::RatingHistogram;
#[cfg(test)]
use crate::ranking::prefix_index::fold_case;
use crate::ranking::prefix_index::NamePrefixIndex;
use crate::ranking::store::EntityStore;

/// Result of a score update. Unknown ids and zero-effect deltas are not
/// errors; the outcome only says what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No entity has this id; nothing changed
    UnknownId,
    /// The clamped score equals the current one; nothing changed
    Unchanged,
    /// The entity moved between scores
    Moved {
        /// Score before the update
        from: Score,
        /// Committed score after clamping
        to: Score,
    },
}

impl UpdateOutcome {
    /// Whether any state changed
    pub fn is_applied(&self) -> bool {
        matches!(self, UpdateOutcome::Moved { .. })
    }
}

/// Point-in-time size figures for health and info endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Committed entities
    pub entities: usize,
    /// Scores currently held by at least one entity
    pub distinct_scores: usize,
    /// Distinct name prefixes indexed
    pub indexed_prefixes: usize,
    /// Score domain
    pub domain: ScoreDomain,
}

#[derive(Debug)]
struct IndexState {
    domain: ScoreDomain,
    store: EntityStore,
    histogram: RatingHistogram,
    buckets: ScoreBuckets,
    prefixes: NamePrefixIndex,
}

impl IndexState {
    fn entry(&self, entity: &Entity) -> LeaderboardEntry {
        LeaderboardEntry {
            rank: self.histogram.rank_of(entity.score),
            name: entity.name.clone(),
            score: entity.score,
        }
    }
}

/// Concurrent ranking index
#[derive(Debug)]
pub struct RankingIndex {
    state: RwLock<IndexState>,
}

impl RankingIndex {
    /// Empty index over `domain`. The domain is fixed for the index lifetime.
    pub fn new(domain: ScoreDomain) -> Self {
        Self {
            state: RwLock::new(IndexState {
                domain,
                store: EntityStore::new(),
                histogram: RatingHistogram::new(domain),
                buckets: ScoreBuckets::new(),
                prefixes: NamePrefixIndex::new(),
            }),
        }
    }

    /// Score domain every committed score lies in
    pub fn domain(&self) -> ScoreDomain {
        self.state.read().domain
    }

    /// Register a new entity in all four structures at once.
    ///
    /// An out-of-domain initial score is clamped. Returns false, and changes
    /// nothing, if the id is already registered.
    pub fn add(&self, entity: Entity) -> bool {
        let mut guard = self.state.write();
        let state = &mut *guard;

        if state.store.contains(entity.id) {
            drop(guard);
            warn!("Ignoring add for already registered id {}", entity.id);
            return false;
        }

        let score = state.domain.clamp(entity.score as i64);
        let id = entity.id;

        state.histogram.increment(score);
        state.buckets.add_member(score, id);
        state.prefixes.index(&entity.name, id);
        state.store.insert(Entity { score, ..entity });
        true
    }

    /// Apply `delta` to the score of `id`, saturating at the domain bounds.
    ///
    /// Unknown ids are a silent no-op, as is a delta that leaves the clamped
    /// score where it was.
    pub fn update_score(&self, id: EntityId, delta: i64) -> UpdateOutcome {
        let mut state = self.state.write();
        let state = &mut *state;

        let Some(old) = state.store.get(id).map(|entity| entity.score) else {
            return UpdateOutcome::UnknownId;
        };

        let new = state.domain.clamp((old as i64).saturating_add(delta));
        if new == old {
            return UpdateOutcome::Unchanged;
        }

        state.histogram.shift(old, new);
        let moved = state.buckets.move_member(old, new, id);
        debug_assert!(moved, "entity {} missing from bucket {}", id, old);
        state.store.set_score(id, new);
        UpdateOutcome::Moved { from: old, to: new }
    }

    /// Up to `limit` entries, highest score first, ties in ascending id order.
    pub fn top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        if limit == 0 {
            return Vec::new();
        }

        let state = self.state.read();
        let mut entries = Vec::with_capacity(limit.min(state.store.len()));

        let buckets = state.buckets.members_descending_from(state.domain.max());
        'buckets: for (score, members) in buckets {
            let rank = state.histogram.rank_of(score);
            for id in members {
                let Some(entity) = state.store.get(id) else {
                    continue;
                };
                entries.push(LeaderboardEntry {
                    rank,
                    name: entity.name.clone(),
                    score,
                });
                if entries.len() == limit {
                    break 'buckets;
                }
            }
        }

        entries
    }

    /// Entities whose lower-cased name starts with the lower-cased `query`,
    /// in registration order. Empty when nothing matches or `query` is empty.
    pub fn search(&self, query: &str) -> Vec<LeaderboardEntry> {
        let state = self.state.read();
        state
            .prefixes
            .lookup(query)
            .iter()
            .filter_map(|&id| state.store.get(id))
            .map(|entity| state.entry(entity))
            .collect()
    }

    /// Current entry for a single id
    pub fn get(&self, id: EntityId) -> Option<LeaderboardEntry> {
        let state = self.state.read();
        state.store.get(id).map(|entity| state.entry(entity))
    }

    /// Id at `position` in registration order
    pub fn id_at(&self, position: usize) -> Option<EntityId> {
        self.state.read().store.id_at(position)
    }

    /// Number of committed entities
    pub fn len(&self) -> usize {
        self.state.read().store.len()
    }

    /// Whether no entity has been added
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size figures, read under one shared lock
    pub fn stats(&self) -> IndexStats {
        let state = self.state.read();
        IndexStats {
            entities: state.store.len(),
            distinct_scores: state.buckets.bucket_count(),
            indexed_prefixes: state.prefixes.prefix_count(),
            domain: state.domain,
        }
    }

    /// Copy of the derived structures, for comparing state across a mutation.
    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> IndexSnapshot {
        let state = self.state.read();
        IndexSnapshot {
            counts: state.histogram.count_table().to_vec(),
            higher: state.histogram.higher_table().to_vec(),
            buckets: state.buckets.clone(),
            prefixes: state.prefixes.clone(),
        }
    }

    /// Check every cross-structure invariant under one shared lock.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) -> Result<(), String> {
        let state = self.state.read();
        let domain = state.domain;
        let counts = state.histogram.count_table();
        let higher = state.histogram.higher_table();

        if counts.iter().sum::<usize>() != state.store.len() {
            return Err(format!(
                "histogram counts {} entities, store holds {}",
                counts.iter().sum::<usize>(),
                state.store.len()
            ));
        }

        let mut running = 0;
        for slot in (0..counts.len()).rev() {
            if higher[slot] != running {
                return Err(format!(
                    "higher[{}] = {}, expected {}",
                    slot, higher[slot], running
                ));
            }
            running += counts[slot];
        }

        for score in domain.min()..=domain.max() {
            if state.buckets.len_at(score) != state.histogram.count_at(score) {
                return Err(format!("bucket {} disagrees with histogram", score));
            }
        }

        for entity in state.store.iter() {
            if !domain.contains(entity.score) {
                return Err(format!("entity {} outside domain", entity.id));
            }
            if !state.buckets.contains(entity.score, entity.id) {
                return Err(format!("entity {} missing from its bucket", entity.id));
            }
            let name = fold_case(&entity.name);
            for (start, ch) in name.char_indices() {
                let prefix = &name[..start + ch.len_utf8()];
                let hits = state
                    .prefixes
                    .lookup(prefix)
                    .iter()
                    .filter(|&&id| id == entity.id)
                    .count();
                if hits != 1 {
                    return Err(format!(
                        "entity {} indexed {} times under {:?}",
                        entity.id, hits, prefix
                    ));
                }
            }
        }

        Ok(())
    }
}

/// Derived structures captured by [`RankingIndex::snapshot`].
#[cfg(test)]
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct IndexSnapshot {
    counts: Vec<usize>,
    higher: Vec<usize>,
    buckets: ScoreBuckets,
    prefixes: NamePrefixIndex,
}

impl Default for RankingIndex {
    fn default() -> Self {
        Self::new(ScoreDomain::default())
    }
}
