//! Entity identity and read-only entity views

use slotmap::new_key_type;

use super::component::ComponentSet;
use super::components::{GraphicsComponent, PhysicsComponent};
use super::properties::Properties;
use crate::foundation::math::{Transform, Vec2, Vec3};

new_key_type! {
    /// Entity identifier
    ///
    /// Versioned: once an entity is destroyed its id never resolves again,
    /// even if the storage slot is later reused.
    pub struct EntityId;
}

/// Storage record of one live entity
#[derive(Debug, Clone)]
pub(crate) struct EntityRecord {
    pub(crate) archetype: String,
    pub(crate) components: ComponentSet,
    pub(crate) velocity: Vec2,
    pub(crate) direction: Vec2,
    pub(crate) properties: Properties,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
}

/// Borrowed, read-only view of an entity
#[derive(Debug, Clone, Copy)]
pub struct EntityView<'a> {
    id: EntityId,
    record: &'a EntityRecord,
}

impl<'a> EntityView<'a> {
    pub(crate) fn new(id: EntityId, record: &'a EntityRecord) -> Self {
        Self { id, record }
    }

    /// Entity id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Name of the archetype this entity was spawned from
    pub fn archetype(&self) -> &'a str {
        &self.record.archetype
    }

    /// Components in declaration order
    pub fn components(&self) -> &'a ComponentSet {
        &self.record.components
    }

    /// Local transform (relative to the parent)
    pub fn transform(&self) -> Transform {
        self.record
            .components
            .scene()
            .map(|scene| scene.transform)
            .unwrap_or_default()
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.transform().position
    }

    /// Per-axis speed
    pub fn velocity(&self) -> Vec2 {
        self.record.velocity
    }

    /// Heading
    pub fn direction(&self) -> Vec2 {
        self.record.direction
    }

    /// Collider, if the entity has one
    pub fn physics(&self) -> Option<&'a PhysicsComponent> {
        self.record.components.physics()
    }

    /// Render binding, if the entity has one
    pub fn graphics(&self) -> Option<&'a GraphicsComponent> {
        self.record.components.graphics()
    }

    /// Whether the entity accepts player control
    pub fn has_input(&self) -> bool {
        self.record.components.has_input()
    }

    /// Game properties copied from the archetype
    pub fn properties(&self) -> &'a Properties {
        &self.record.properties
    }

    /// Parent entity, if any
    pub fn parent(&self) -> Option<EntityId> {
        self.record.parent
    }

    /// Child entities in archetype order
    pub fn children(&self) -> &'a [EntityId] {
        &self.record.children
    }
}
