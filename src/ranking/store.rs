//! id -> entity record. Owns the only mutable score field.
//!
//! Records live in a dense vector in registration order so the load driver
//! can pick a random existing id in O(1); a hash map resolves ids to slots.
//! There is no removal, so slots never move.

use ahash::AHashMap;

use crate::core::types::{Entity, EntityId, Score};

/// Entity records
#[derive(Debug, Default, Clone)]
pub struct EntityStore {
    entities: Vec<Entity>,
    slots: AHashMap<EntityId, usize>,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new record. Returns false, leaving the store untouched, if
    /// the id is already present.
    pub fn insert(&mut self, entity: Entity) -> bool {
        if self.slots.contains_key(&entity.id) {
            return false;
        }
        self.slots.insert(entity.id, self.entities.len());
        self.entities.push(entity);
        true
    }

    /// Record for `id`
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.slots.get(&id).map(|&slot| &self.entities[slot])
    }

    /// Whether `id` is registered
    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Commit a new score onto an existing record. Returns the previous
    /// score, or `None` for an unknown id.
    pub fn set_score(&mut self, id: EntityId, score: Score) -> Option<Score> {
        let slot = *self.slots.get(&id)?;
        let entity = &mut self.entities[slot];
        Some(std::mem::replace(&mut entity.score, score))
    }

    /// Id registered at `position` (0-based, registration order)
    pub fn id_at(&self, position: usize) -> Option<EntityId> {
        self.entities.get(position).map(|entity| entity.id)
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Records in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_get_and_order() {
        let mut store = EntityStore::new();
        assert!(store.insert(Entity::new(7, "ishant_7", 400)));
        assert!(store.insert(Entity::new(3, "priya_3", 900)));

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(3).map(|e| e.score), Some(900));
        assert_eq!(store.id_at(0), Some(7));
        assert_eq!(store.id_at(1), Some(3));
        assert_eq!(store.id_at(2), None);
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut store = EntityStore::new();
        assert!(store.insert(Entity::new(1, "aman_1", 100)));
        assert!(!store.insert(Entity::new(1, "someone_else", 200)));
        assert_eq!(store.get(1).map(|e| e.name.as_str()), Some("aman_1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn set_score_returns_previous() {
        let mut store = EntityStore::new();
        store.insert(Entity::new(1, "neha_1", 250));
        assert_eq!(store.set_score(1, 300), Some(250));
        assert_eq!(store.get(1).map(|e| e.score), Some(300));
        assert_eq!(store.set_score(2, 300), None);
    }
}
