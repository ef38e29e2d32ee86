//! Entity store: id → entity mapping plus ordered membership lanes.
//!
//! Every id in a lane resolves in the mapping. Removal purges the mapping
//! entry and the lane entry together; there is no history retention.

use crate::error::{EditError, Result};
use crate::id::{EntityId, IdAllocator};
use crate::model::{Entity, EntityKind, EntityPatch, Lane, Payload};
use kurbo::{Point, Size};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    entities: HashMap<EntityId, Entity>,
    nodes: Vec<EntityId>,
    assets: Vec<EntityId>,
    ids: IdAllocator,
}

impl EntityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id without creating an entity (shapes and text blocks share the counter).
    pub fn allocate_id(&mut self) -> EntityId {
        self.ids.allocate()
    }

    /// Insert a new entity and append it to `lane`. Returns its id.
    pub fn create(&mut self, payload: Payload, position: Point, size: Size, lane: Lane) -> EntityId {
        let id = self.ids.allocate();
        let kind = payload.kind();
        self.entities
            .insert(id, Entity::new(id, position, size, payload));
        self.lane_mut(lane).push(id);
        log::debug!("create {kind} {id} at ({}, {})", position.x, position.y);
        id
    }

    /// Merge a partial update. Fails with `NotFound` or `KindMismatch`;
    /// on failure nothing is changed.
    pub fn update(&mut self, id: EntityId, patch: EntityPatch) -> Result<()> {
        let entity = self.entities.get_mut(&id).ok_or(EditError::NotFound(id))?;
        if let Some(payload) = patch.payload {
            entity.set_payload(payload)?;
        }
        if let Some(position) = patch.position {
            entity.position = position;
        }
        if let Some(size) = patch.size {
            entity.size = size;
        }
        Ok(())
    }

    /// Remove an entity from the mapping and its lane. `None` if already gone.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let removed = self.entities.remove(&id)?;
        self.nodes.retain(|n| *n != id);
        self.assets.retain(|n| *n != id);
        Some(removed)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn kind_of(&self, id: EntityId) -> Option<EntityKind> {
        self.entities.get(&id).map(Entity::kind)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn lane(&self, lane: Lane) -> &[EntityId] {
        match lane {
            Lane::Nodes => &self.nodes,
            Lane::Assets => &self.assets,
        }
    }

    fn lane_mut(&mut self, lane: Lane) -> &mut Vec<EntityId> {
        match lane {
            Lane::Nodes => &mut self.nodes,
            Lane::Assets => &mut self.assets,
        }
    }

    /// Member ids in render order (back to front).
    pub fn ordered_ids(&self) -> impl DoubleEndedIterator<Item = EntityId> + '_ {
        self.nodes.iter().chain(self.assets.iter()).copied()
    }

    /// Member entities in render order (back to front).
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Entity> + '_ {
        self.ordered_ids().filter_map(|id| self.entities.get(&id))
    }

    /// Every lane entry resolves and every mapping entry sits in exactly one lane.
    pub fn lanes_consistent(&self) -> bool {
        let in_lanes = self.nodes.len() + self.assets.len();
        in_lanes == self.entities.len()
            && self.ordered_ids().all(|id| self.entities.contains_key(&id))
            && self.entities.keys().all(|id| {
                let hits = self.nodes.iter().chain(self.assets.iter()).filter(|n| *n == id);
                hits.count() == 1
            })
    }
}
