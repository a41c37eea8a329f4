use std::collections::BTreeMap;

use crate::state::{Entity, EntityId};

/// Live entities the engine reads and mutates during a cast.
///
/// A store handed to the engine must already be exclusively held for every
/// entity the cast can touch; the engine does no locking of its own.
pub trait EntityStore {
    fn get(&self, id: EntityId) -> Option<&Entity>;

    fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity>;

    /// Ids of every entity visible through this store, ascending.
    fn ids(&self) -> Vec<EntityId>;
}

/// Plain in-memory store for single-threaded hosts and tests.
#[derive(Clone, Debug, Default)]
pub struct EntityMap {
    entities: BTreeMap<EntityId, Entity>,
}

impl EntityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an entity, returning the previous one.
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.id, entity)
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl FromIterator<Entity> for EntityMap {
    fn from_iter<T: IntoIterator<Item = Entity>>(iter: T) -> Self {
        Self {
            entities: iter.into_iter().map(|e| (e.id, e)).collect(),
        }
    }
}

impl EntityStore for EntityMap {
    fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    fn ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }
}
