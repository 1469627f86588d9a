//! Startup seeding: N sequential adds of synthetic entities.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::core::types::{Entity, EntityId};
use crate::ranking::RankingIndex;
use crate::system::metrics::Metrics;

/// Base names the synthetic entities are drawn from
pub const BASE_NAMES: [&str; 15] = [
    "rahul", "arjun", "ayush", "rohit", "virat", "ananya", "priya", "neha", "riya", "isha",
    "vikram", "aman", "nathan", "vara", "ishant",
];

/// Build an RNG from an optional fixed seed
pub fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Add `count` entities with ids `1..=count`, names `{base}_{id}`, and scores
/// uniform over the index domain. Returns how many were newly registered.
pub fn seed_entities<R: Rng>(index: &RankingIndex, count: usize, rng: &mut R) -> usize {
    let domain = index.domain();
    let metrics = Metrics::global();
    let mut added = 0;

    for id in 1..=count as EntityId {
        let base = BASE_NAMES[rng.random_range(0..BASE_NAMES.len())];
        let score = rng.random_range(domain.min()..=domain.max());
        if index.add(Entity::new(id, format!("{}_{}", base, id), score)) {
            added += 1;
        }
    }

    metrics.entities_added.inc_by(added as u64);
    metrics.entity_count.set(index.len() as i64);
    info!(added, total = index.len(), "Seeded ranking index");
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ScoreDomain;

    #[test]
    fn seeds_requested_count_inside_domain() {
        let index = RankingIndex::new(ScoreDomain::new(10, 20).unwrap());
        let added = seed_entities(&index, 250, &mut rng_from(Some(42)));

        assert_eq!(added, 250);
        assert_eq!(index.len(), 250);
        for entry in index.top(250) {
            assert!((10..=20).contains(&entry.score));
            let (base, id) = entry.name.rsplit_once('_').unwrap();
            assert!(BASE_NAMES.contains(&base));
            assert!(id.parse::<usize>().unwrap() <= 250);
        }
        index.check_invariants().unwrap();
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let a = RankingIndex::default();
        let b = RankingIndex::default();
        seed_entities(&a, 100, &mut rng_from(Some(7)));
        seed_entities(&b, 100, &mut rng_from(Some(7)));
        assert_eq!(a.top(100), b.top(100));
    }

    #[test]
    fn reseeding_skips_existing_ids() {
        let index = RankingIndex::default();
        seed_entities(&index, 10, &mut rng_from(Some(1)));
        assert_eq!(seed_entities(&index, 15, &mut rng_from(Some(2))), 5);
        assert_eq!(index.len(), 15);
    }
}
