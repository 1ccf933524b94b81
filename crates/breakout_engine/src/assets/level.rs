//! Level documents
//!
//! ```json
//! {
//!     "Level1": {
//!         "WorldObjects": [
//!             { "Paddle": { "components": [ { "SceneComponent_0": { "transform": { "position": { "y": -250.0 } } } } ] } },
//!             { "Brick": { "lives": 2 } }
//!         ]
//!     }
//! }
//! ```
//!
//! Each world object names a catalog archetype and carries overrides in the
//! same shape named child references use.

use std::path::Path;

use serde_json::{Map, Value};

use super::archetype::Archetype;
use super::catalog::ArchetypeCatalog;
use super::overrides::apply_overrides;
use super::{single_entry, LoadError};
use crate::ecs::entity::EntityId;
use crate::ecs::world::World;

/// One archetype instance placed by a level
#[derive(Debug, Clone, PartialEq)]
pub struct LevelObject {
    archetype: String,
    overrides: Map<String, Value>,
}

impl LevelObject {
    /// Archetype name
    pub fn archetype(&self) -> &str {
        &self.archetype
    }

    /// Raw override body
    pub fn overrides(&self) -> &Map<String, Value> {
        &self.overrides
    }
}

/// Parsed level document
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    name: String,
    objects: Vec<LevelObject>,
}

impl Level {
    /// Parse a level document
    pub fn parse(document: &Value) -> Result<Self, LoadError> {
        let (name, body) = single_entry(document, "level document")?;
        let objects = body
            .get("WorldObjects")
            .and_then(Value::as_array)
            .ok_or_else(|| LoadError::malformed(format!("level `{name}` has no `WorldObjects` array")))?;

        let objects = objects
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let what = format!("level `{name}` object #{index}");
                let (archetype, overrides) = single_entry(entry, &what)?;
                let overrides = overrides
                    .as_object()
                    .cloned()
                    .ok_or_else(|| LoadError::malformed(format!("{what} must be an object")))?;
                Ok(LevelObject {
                    archetype: archetype.to_string(),
                    overrides,
                })
            })
            .collect::<Result<Vec<_>, LoadError>>()?;

        Ok(Self {
            name: name.to_string(),
            objects,
        })
    }

    /// Parse a level from JSON text
    pub fn load_str(text: &str) -> Result<Self, LoadError> {
        let document: Value = serde_json::from_str(text)?;
        Self::parse(&document)
    }

    /// Parse a level file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        Self::load_str(&text)
    }

    /// Level name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Objects in document order
    pub fn objects(&self) -> &[LevelObject] {
        &self.objects
    }

    /// Resolve every object against the catalog and apply its overrides
    pub fn instantiate(&self, catalog: &ArchetypeCatalog) -> Result<Vec<Archetype>, LoadError> {
        self.objects
            .iter()
            .map(|object| {
                let mut archetype = catalog.require(&object.archetype)?.clone();
                apply_overrides(catalog.registry(), &mut archetype, &object.overrides)?;
                Ok(archetype)
            })
            .collect()
    }

    /// Spawn every object into `world` in document order
    ///
    /// Nothing is spawned unless every object resolves.
    pub fn spawn_into(&self, catalog: &ArchetypeCatalog, world: &mut World) -> Result<Vec<EntityId>, LoadError> {
        let instances = self.instantiate(catalog)?;
        let mut ids = Vec::with_capacity(instances.len());
        for archetype in &instances {
            ids.push(world.spawn(archetype, None)?);
        }
        log::info!("Spawned level {} ({} objects, {} entities)", self.name, ids.len(), world.len());
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::registry::ComponentRegistry;
    use crate::foundation::math::{Vec2, Vec3};
    use serde_json::json;

    fn catalog() -> ArchetypeCatalog {
        let documents = [json!({
            "Brick": {
                "lives": 1,
                "children": [],
                "components": [
                    { "SceneComponent_0": { "transform": { "scale": { "x": 60.0, "y": 20.0, "z": 0.0 } } } },
                    { "PhysicsComponent_0": { "shape_type": "AABB", "collider_weight": 0.0 } }
                ]
            }
        })];
        ArchetypeCatalog::from_documents(&documents, ComponentRegistry::default()).unwrap()
    }

    #[test]
    fn test_parse_and_spawn() {
        let level = Level::parse(&json!({
            "Test": {
                "WorldObjects": [
                    { "Brick": { "components": [ { "SceneComponent_0": { "transform": { "position": { "x": -70.0 } } } } ] } },
                    { "Brick": { "lives": 3, "components": [ { "SceneComponent_0": { "transform": { "position": { "x": 70.0 } } } } ] } }
                ]
            }
        }))
        .unwrap();
        assert_eq!(level.name(), "Test");
        assert_eq!(level.objects().len(), 2);

        let mut world = World::new();
        let ids = level.spawn_into(&catalog(), &mut world).unwrap();
        assert_eq!(ids.len(), 2);

        let left = world.get(ids[0]).unwrap();
        let right = world.get(ids[1]).unwrap();
        assert_eq!(left.position(), Vec3::new(-70.0, 0.0, 0.0));
        assert_eq!(right.position(), Vec3::new(70.0, 0.0, 0.0));
        assert_eq!(left.properties().get_i64("lives"), Some(1));
        assert_eq!(right.properties().get_i64("lives"), Some(3));
        assert_eq!(right.transform().scale, Vec3::new(60.0, 20.0, 0.0));
        assert_eq!(right.velocity(), Vec2::zeros());
    }

    #[test]
    fn test_unknown_archetype_spawns_nothing() {
        let level = Level::parse(&json!({
            "Test": { "WorldObjects": [ { "Brick": {} }, { "Dragon": {} } ] }
        }))
        .unwrap();

        let mut world = World::new();
        let result = level.spawn_into(&catalog(), &mut world);
        assert!(matches!(result, Err(LoadError::UnknownArchetype(name)) if name == "Dragon"));
        assert!(world.is_empty());
    }

    #[test]
    fn test_missing_world_objects() {
        assert!(matches!(
            Level::parse(&json!({ "Empty": {} })),
            Err(LoadError::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_shipped_level_resolves() {
        let assets = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets");
        let catalog = ArchetypeCatalog::load_dir(format!("{assets}/archetypes"), ComponentRegistry::default()).unwrap();
        let level = Level::load_file(format!("{assets}/levels/Level1.lvl")).unwrap();

        let instances = level.instantiate(&catalog).unwrap();
        assert!(instances.iter().any(|a| a.name() == "Ball"));
        assert!(instances.iter().any(|a| a.name() == "Paddle"));
        assert!(instances.iter().filter(|a| a.name() == "Brick").count() >= 1);
    }
}
