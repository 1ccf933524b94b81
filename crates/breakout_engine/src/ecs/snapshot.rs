//! Read-only world snapshots
//!
//! Renderers and input layers never look at the live store. They read a
//! snapshot captured at a tick boundary, tagged with the tick version it was
//! taken after.

use super::components::GraphicsComponent;
use super::entity::EntityId;
use super::world::World;
use crate::foundation::math::{Transform, Vec2};

/// Render-relevant state of one entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySnapshot {
    /// Entity id
    pub id: EntityId,
    /// Archetype the entity was spawned from
    pub archetype: String,
    /// Parent entity, if any
    pub parent: Option<EntityId>,
    /// Transform composed through all ancestors
    pub world_transform: Transform,
    /// Per-axis speed
    pub velocity: Vec2,
    /// Heading
    pub direction: Vec2,
    /// Render bindings in declaration order
    pub graphics: Vec<GraphicsComponent>,
}

/// Versioned copy of the world at a tick boundary
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorldSnapshot {
    version: u64,
    entities: Vec<EntitySnapshot>,
}

impl WorldSnapshot {
    /// Capture every live entity in spawn order
    pub fn capture(world: &World, version: u64) -> Self {
        let entities = world
            .iter()
            .map(|entity| EntitySnapshot {
                id: entity.id(),
                archetype: entity.archetype().to_string(),
                parent: entity.parent(),
                world_transform: world
                    .world_transform(entity.id())
                    .unwrap_or_else(|_| entity.transform()),
                velocity: entity.velocity(),
                direction: entity.direction(),
                graphics: entity.components().all_graphics().cloned().collect(),
            })
            .collect();
        Self { version, entities }
    }

    /// Number of completed ticks when this snapshot was taken
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Entities in spawn order
    pub fn entities(&self) -> &[EntitySnapshot] {
        &self.entities
    }

    /// Snapshot of one entity
    pub fn get(&self, id: EntityId) -> Option<&EntitySnapshot> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    /// Number of entities captured
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when no entity was captured
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
