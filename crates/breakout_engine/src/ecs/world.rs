//! Entity store
//!
//! Owns every live entity, its component data and the parent/child tree.
//! Children are stored as id lists on the parent; a child only records its
//! parent id. Destroyed ids are retired: the versioned `slotmap` key of a
//! destroyed entity never resolves again.

use slotmap::SlotMap;

use super::component::ComponentSet;
use super::entity::{EntityId, EntityRecord, EntityView};
use super::properties::Properties;
use crate::assets::Archetype;
use crate::foundation::math::{Transform, Vec2, Vec3};

/// Entity store errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The id was never issued or the entity was destroyed
    #[error("Entity not found: {0:?}")]
    NotFound(EntityId),

    /// The archetype lacks the mandatory scene component
    #[error("Archetype `{0}` has no SceneComponent")]
    MissingScene(String),
}

/// All live entities
#[derive(Debug, Default)]
pub struct World {
    entities: SlotMap<EntityId, EntityRecord>,
    /// Live ids in spawn order, the iteration order of every query
    order: Vec<EntityId>,
    spawned_total: u64,
}

impl World {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn an entity (and its child tree) from an archetype
    ///
    /// Every spawned entity gets its own copy of the archetype's components,
    /// kinematic defaults and properties.
    pub fn spawn(&mut self, archetype: &Archetype, parent: Option<EntityId>) -> Result<EntityId, StoreError> {
        if let Some(parent) = parent {
            if !self.entities.contains_key(parent) {
                return Err(StoreError::NotFound(parent));
            }
        }
        Self::check_scene(archetype)?;

        let id = self.insert_tree(archetype, parent);
        if let Some(parent) = parent.and_then(|p| self.entities.get_mut(p)) {
            parent.children.push(id);
        }
        log::debug!("Spawned {} as {:?}", archetype.name(), id);
        Ok(id)
    }

    fn check_scene(archetype: &Archetype) -> Result<(), StoreError> {
        if archetype.components().scene().is_none() {
            return Err(StoreError::MissingScene(archetype.name().to_string()));
        }
        archetype.children().iter().try_for_each(Self::check_scene)
    }

    fn insert_tree(&mut self, archetype: &Archetype, parent: Option<EntityId>) -> EntityId {
        let id = self.entities.insert(EntityRecord {
            archetype: archetype.name().to_string(),
            components: archetype.components().clone(),
            velocity: archetype.velocity(),
            direction: archetype.direction(),
            properties: archetype.properties().clone(),
            parent,
            children: Vec::with_capacity(archetype.children().len()),
        });
        self.order.push(id);
        self.spawned_total += 1;

        for child in archetype.children() {
            let child_id = self.insert_tree(child, Some(id));
            if let Some(record) = self.entities.get_mut(id) {
                record.children.push(child_id);
            }
        }
        id
    }

    /// Destroy an entity and its whole subtree
    ///
    /// Children go first, then the entity itself. Returns how many entities
    /// were destroyed.
    pub fn destroy(&mut self, id: EntityId) -> Result<usize, StoreError> {
        let record = self.entities.get(id).ok_or(StoreError::NotFound(id))?;
        let parent = record.parent;

        // Depth-first post-order: every child before its parent
        let mut doomed = Vec::new();
        let mut stack = vec![(id, false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                doomed.push(current);
                continue;
            }
            stack.push((current, true));
            if let Some(record) = self.entities.get(current) {
                stack.extend(record.children.iter().rev().map(|&child| (child, false)));
            }
        }

        for doomed_id in &doomed {
            self.entities.remove(*doomed_id);
        }
        self.order.retain(|live| self.entities.contains_key(*live));

        if let Some(parent) = parent.and_then(|p| self.entities.get_mut(p)) {
            parent.children.retain(|&child| child != id);
        }
        log::debug!("Destroyed {:?} ({} entities)", id, doomed.len());
        Ok(doomed.len())
    }

    /// Destroy every entity; ids issued so far stay retired
    pub fn clear(&mut self) {
        let destroyed = self.entities.len();
        self.entities.clear();
        self.order.clear();
        log::debug!("Cleared world ({destroyed} entities)");
    }

    /// Read-only view of an entity
    pub fn get(&self, id: EntityId) -> Result<EntityView<'_>, StoreError> {
        self.entities
            .get(id)
            .map(|record| EntityView::new(id, record))
            .ok_or(StoreError::NotFound(id))
    }

    /// Check whether an id refers to a live entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when no entity is alive
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities spawned over the world's lifetime, destroyed ones included
    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    /// All live entities in spawn order
    pub fn iter(&self) -> impl Iterator<Item = EntityView<'_>> + Clone + '_ {
        self.order
            .iter()
            .filter_map(|&id| self.entities.get(id).map(|record| EntityView::new(id, record)))
    }

    /// Live entities carrying a physics component, in spawn order
    ///
    /// Lazy and restartable: clone the iterator or call again to walk the
    /// same entities once more.
    pub fn physics_entities(&self) -> PhysicsEntities<'_> {
        PhysicsEntities {
            world: self,
            cursor: 0,
        }
    }

    /// Live entities spawned from the named archetype
    pub fn with_archetype<'a>(&'a self, name: &'a str) -> impl Iterator<Item = EntityView<'a>> + 'a {
        self.iter().filter(move |entity| entity.archetype() == name)
    }

    /// Live entities carrying an input component
    pub fn input_entities(&self) -> impl Iterator<Item = EntityView<'_>> + '_ {
        self.iter().filter(EntityView::has_input)
    }

    /// Transform composed through every ancestor
    pub fn world_transform(&self, id: EntityId) -> Result<Transform, StoreError> {
        let mut current = self.get(id)?;
        let mut transform = current.transform();
        while let Some(parent) = current.parent() {
            current = self.get(parent)?;
            transform = current.transform().combine(&transform);
        }
        Ok(transform)
    }

    fn record_mut(&mut self, id: EntityId) -> Result<&mut EntityRecord, StoreError> {
        self.entities.get_mut(id).ok_or(StoreError::NotFound(id))
    }

    fn transform_mut(&mut self, id: EntityId) -> Result<&mut Transform, StoreError> {
        let record = self.record_mut(id)?;
        let archetype = &record.archetype;
        match record.components.scene_mut() {
            Some(scene) => Ok(&mut scene.transform),
            None => Err(StoreError::MissingScene(archetype.clone())),
        }
    }

    /// Replace the local transform
    pub fn set_transform(&mut self, id: EntityId, transform: Transform) -> Result<(), StoreError> {
        *self.transform_mut(id)? = transform;
        Ok(())
    }

    /// Move to a local position
    pub fn set_position(&mut self, id: EntityId, position: Vec3) -> Result<(), StoreError> {
        self.transform_mut(id)?.position = position;
        Ok(())
    }

    /// Shift the local position within the playfield plane
    pub fn translate(&mut self, id: EntityId, offset: Vec2) -> Result<(), StoreError> {
        let transform = self.transform_mut(id)?;
        transform.position.x += offset.x;
        transform.position.y += offset.y;
        Ok(())
    }

    /// Shift by a world-space offset, converted into the parent's frame
    pub fn translate_world(&mut self, id: EntityId, offset: Vec2) -> Result<(), StoreError> {
        let local = match self.get(id)?.parent() {
            Some(parent) => self.world_transform(parent)?.to_local_offset(offset),
            None => offset,
        };
        self.translate(id, local)
    }

    /// Replace the per-axis speed
    pub fn set_velocity(&mut self, id: EntityId, velocity: Vec2) -> Result<(), StoreError> {
        self.record_mut(id)?.velocity = velocity;
        Ok(())
    }

    /// Replace the heading
    pub fn set_direction(&mut self, id: EntityId, direction: Vec2) -> Result<(), StoreError> {
        self.record_mut(id)?.direction = direction;
        Ok(())
    }

    /// Swap the material of the first graphics binding
    ///
    /// Returns `false` when the entity has no graphics component.
    pub fn set_material(&mut self, id: EntityId, material: impl Into<String>) -> Result<bool, StoreError> {
        match self.record_mut(id)?.components.graphics_mut() {
            Some(graphics) => {
                graphics.material = material.into();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Mutable property bag
    pub fn properties_mut(&mut self, id: EntityId) -> Result<&mut Properties, StoreError> {
        Ok(&mut self.record_mut(id)?.properties)
    }

    /// Components of an entity
    pub fn components(&self, id: EntityId) -> Result<&ComponentSet, StoreError> {
        self.get(id).map(|entity| entity.components())
    }
}

/// Iterator over physics-bearing entities, see [`World::physics_entities`]
#[derive(Debug, Clone)]
pub struct PhysicsEntities<'a> {
    world: &'a World,
    cursor: usize,
}

impl<'a> Iterator for PhysicsEntities<'a> {
    type Item = EntityView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&id) = self.world.order.get(self.cursor) {
            self.cursor += 1;
            if let Some(record) = self.world.entities.get(id) {
                if record.components.physics().is_some() {
                    return Some(EntityView::new(id, record));
                }
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.world.order.len().saturating_sub(self.cursor)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::Component;
    use crate::ecs::components::{PhysicsComponent, SceneComponent, ShapeType};

    fn body(name: &str) -> Archetype {
        Archetype::new(name)
            .with_velocity(Vec2::new(1.0, 1.0))
            .with_component(Component::Scene(SceneComponent::default()))
            .with_component(Component::Physics(PhysicsComponent::new(ShapeType::Circle, 1.0)))
    }

    fn marker(name: &str) -> Archetype {
        Archetype::new(name).with_component(Component::Scene(SceneComponent::default()))
    }

    #[test]
    fn test_spawn_and_get() {
        let mut world = World::new();
        let id = world.spawn(&body("Ball"), None).unwrap();

        let ball = world.get(id).unwrap();
        assert_eq!(ball.archetype(), "Ball");
        assert_eq!(ball.velocity(), Vec2::new(1.0, 1.0));
        assert!(ball.physics().is_some());
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_spawn_requires_scene() {
        let mut world = World::new();
        let result = world.spawn(&Archetype::new("Nothing"), None);
        assert_eq!(result, Err(StoreError::MissingScene("Nothing".to_string())));
        assert!(world.is_empty());
    }

    #[test]
    fn test_set_material_changes_first_binding() {
        use crate::ecs::components::GraphicsComponent;

        let mut world = World::new();
        let brick = marker("Brick")
            .with_component(Component::Graphics(GraphicsComponent::new("Plain", "Quad")))
            .with_component(Component::Graphics(GraphicsComponent::new("Border", "Quad")));
        let id = world.spawn(&brick, None).unwrap();
        let bare = world.spawn(&marker("Wall"), None).unwrap();

        assert!(world.set_material(id, "Cracked").unwrap());
        let materials: Vec<_> = world
            .components(id)
            .unwrap()
            .all_graphics()
            .map(|graphics| graphics.material.as_str())
            .collect();
        assert_eq!(materials, ["Cracked", "Border"]);

        assert!(!world.set_material(bare, "Cracked").unwrap());
    }

    #[test]
    fn test_spawn_under_unknown_parent() {
        let mut world = World::new();
        let parent = world.spawn(&marker("Parent"), None).unwrap();
        world.destroy(parent).unwrap();

        assert_eq!(world.spawn(&marker("Child"), Some(parent)), Err(StoreError::NotFound(parent)));
    }

    #[test]
    fn test_destroyed_ids_are_retired() {
        let mut world = World::new();
        let first = world.spawn(&marker("A"), None).unwrap();
        world.destroy(first).unwrap();
        let second = world.spawn(&marker("B"), None).unwrap();

        assert_ne!(first, second);
        assert!(world.get(first).is_err());
        assert_eq!(world.destroy(first), Err(StoreError::NotFound(first)));
        assert_eq!(world.get(second).unwrap().archetype(), "B");
    }

    #[test]
    fn test_archetype_children_spawn_as_tree() {
        let mut world = World::new();
        let template = marker("Parent").with_child(marker("Left")).with_child(marker("Right").with_child(marker("Leaf")));
        let root = world.spawn(&template, None).unwrap();

        assert_eq!(world.len(), 4);
        let children: Vec<&str> = world
            .get(root)
            .unwrap()
            .children()
            .iter()
            .map(|&child| world.get(child).unwrap().archetype())
            .collect();
        assert_eq!(children, ["Left", "Right"]);

        let spawn_order: Vec<&str> = world.iter().map(|e| e.archetype()).collect();
        assert_eq!(spawn_order, ["Parent", "Left", "Right", "Leaf"]);
    }

    #[test]
    fn test_destroy_removes_subtree_and_detaches() {
        let mut world = World::new();
        let root = world.spawn(&marker("Root"), None).unwrap();
        let branch = world.spawn(&marker("Branch").with_child(marker("Leaf")), Some(root)).unwrap();
        let leaf = world.get(branch).unwrap().children()[0];

        assert_eq!(world.destroy(branch), Ok(2));
        assert!(!world.contains(branch));
        assert!(!world.contains(leaf));
        assert!(world.get(root).unwrap().children().is_empty());
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn test_clear_retires_ids() {
        let mut world = World::new();
        let old = world.spawn(&marker("Level").with_child(marker("Brick")), None).unwrap();
        world.clear();
        assert!(world.is_empty());

        let new = world.spawn(&marker("Level"), None).unwrap();
        assert_ne!(old, new);
        assert!(world.get(old).is_err());
        assert_eq!(world.spawned_total(), 3);
    }

    #[test]
    fn test_physics_entities_is_restartable() {
        let mut world = World::new();
        world.spawn(&body("Ball"), None).unwrap();
        world.spawn(&marker("Decoration"), None).unwrap();
        world.spawn(&body("Ball"), None).unwrap();

        let bodies = world.physics_entities();
        assert_eq!(bodies.clone().count(), 2);
        assert_eq!(bodies.count(), 2);
        assert_eq!(world.physics_entities().count(), 2);
    }

    #[test]
    fn test_world_transform_composes_parents() {
        let mut world = World::new();
        let parent = world.spawn(&marker("Parent"), None).unwrap();
        let child = world.spawn(&marker("Child"), Some(parent)).unwrap();

        world.set_position(parent, Vec3::new(100.0, 50.0, 0.0)).unwrap();
        world.set_position(child, Vec3::new(10.0, -5.0, 0.0)).unwrap();

        assert_eq!(world.world_transform(child).unwrap().position, Vec3::new(110.0, 45.0, 0.0));
        assert_eq!(world.get(child).unwrap().position(), Vec3::new(10.0, -5.0, 0.0));
    }
}
