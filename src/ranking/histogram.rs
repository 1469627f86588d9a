//! Per-score counts and the derived "strictly higher" suffix table.
//!
//! `higher[i]` always equals the sum of `counts[j]` for every `j > i`, so the
//! competition rank of any score is a single lookup. The table is maintained
//! incrementally: a move from `old` to `new` only touches the slots in
//! `[min(old, new), max(old, new))`, and an insertion at `s` touches the slots
//! below `s`.

use crate::core::types::{Rank, Score, ScoreDomain};

/// Rank source for the ranking index.
#[derive(Debug, Clone)]
pub struct RatingHistogram {
    domain: ScoreDomain,
    counts: Vec<usize>,
    higher: Vec<usize>,
    total: usize,
}

impl RatingHistogram {
    /// Empty histogram over `domain`
    pub fn new(domain: ScoreDomain) -> Self {
        Self {
            domain,
            counts: vec![0; domain.size()],
            higher: vec![0; domain.size()],
            total: 0,
        }
    }

    /// Score domain this histogram covers
    pub fn domain(&self) -> ScoreDomain {
        self.domain
    }

    /// Total number of counted entities
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of entities at exactly `score`
    pub fn count_at(&self, score: Score) -> usize {
        self.counts[self.slot(score)]
    }

    /// Number of entities scoring strictly higher than `score`
    pub fn higher_than(&self, score: Score) -> usize {
        self.higher[self.slot(score)]
    }

    /// Competition rank of `score`.
    ///
    /// # Panics
    /// If `score` lies outside the domain. Callers only pass clamped scores.
    pub fn rank_of(&self, score: Score) -> Rank {
        self.higher_than(score) + 1
    }

    /// Count one more entity at `score`.
    pub fn increment(&mut self, score: Score) {
        let slot = self.slot(score);
        self.counts[slot] += 1;
        for higher in &mut self.higher[..slot] {
            *higher += 1;
        }
        self.total += 1;
    }

    /// Count one fewer entity at `score`.
    ///
    /// # Panics
    /// If no entity is counted at `score`.
    pub fn decrement(&mut self, score: Score) {
        let slot = self.slot(score);
        assert!(self.counts[slot] > 0, "no entity counted at score {}", score);
        self.counts[slot] -= 1;
        for higher in &mut self.higher[..slot] {
            *higher -= 1;
        }
        self.total -= 1;
    }

    /// Move one entity from `old` to `new`, touching only the slots between
    /// the two scores.
    pub fn shift(&mut self, old: Score, new: Score) {
        let from = self.slot(old);
        let to = self.slot(new);
        if from == to {
            return;
        }
        assert!(self.counts[from] > 0, "no entity counted at score {}", old);

        self.counts[from] -= 1;
        self.counts[to] += 1;

        if to > from {
            // The entity now sits above every slot in [from, to).
            for higher in &mut self.higher[from..to] {
                *higher += 1;
            }
        } else {
            for higher in &mut self.higher[to..from] {
                *higher -= 1;
            }
        }
    }

    /// Full O(D) rebuild of the suffix table from the counts.
    ///
    /// Used as the correctness oracle for the incremental path.
    pub fn recompute(&mut self) {
        let mut running = 0;
        for slot in (0..self.counts.len()).rev() {
            self.higher[slot] = running;
            running += self.counts[slot];
        }
        self.total = running;
    }

    /// Number of scores with at least one entity
    pub fn distinct_scores(&self) -> usize {
        self.counts.iter().filter(|&&c| c > 0).count()
    }

    fn slot(&self, score: Score) -> usize {
        match self.domain.offset(score) {
            Some(slot) => slot,
            None => panic!("score {} outside domain {}", score, self.domain),
        }
    }

    #[cfg(test)]
    pub(crate) fn higher_table(&self) -> &[usize] {
        &self.higher
    }

    #[cfg(test)]
    pub(crate) fn count_table(&self) -> &[usize] {
        &self.counts
    }
}
