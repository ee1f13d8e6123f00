//! Render entity registry - trackable id to live entity mapping

use std::collections::HashMap;

use geosync_core::{EntityId, TrackableId};

/// The set of live render entities, keyed by trackable identifier.
///
/// Invariant: a key exists here iff a live render entity for that geometry
/// exists in the scene. Membership tests run on every delta entry every
/// tick, hence a map rather than a list.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: HashMap<TrackableId, EntityId>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        EntityRegistry::default()
    }

    pub fn get(&self, id: TrackableId) -> Option<EntityId> {
        self.entities.get(&id).copied()
    }

    pub fn insert(&mut self, id: TrackableId, entity: EntityId) {
        self.entities.insert(id, entity);
    }

    /// Remove and return the entity for `id`, if registered.
    pub fn remove(&mut self, id: TrackableId) -> Option<EntityId> {
        self.entities.remove(&id)
    }

    pub fn contains(&self, id: TrackableId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TrackableId, &EntityId)> {
        self.entities.iter()
    }

    /// Drain every entry, leaving the registry empty.
    pub fn drain(&mut self) -> impl Iterator<Item = (TrackableId, EntityId)> + '_ {
        self.entities.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_basic() {
        let mut registry = EntityRegistry::new();
        let id = TrackableId::new(100);

        assert!(!registry.contains(id));
        registry.insert(id, EntityId::new(1));
        assert!(registry.contains(id));
        assert_eq!(registry.len(), 1);

        assert_eq!(registry.remove(id), Some(EntityId::new(1)));
        assert_eq!(registry.remove(id), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_registry_drain() {
        let mut registry = EntityRegistry::new();
        for i in 0..5 {
            registry.insert(TrackableId::new(i), EntityId::new(i));
        }

        let drained: Vec<_> = registry.drain().collect();
        assert_eq!(drained.len(), 5);
        assert!(registry.is_empty());
    }
}
