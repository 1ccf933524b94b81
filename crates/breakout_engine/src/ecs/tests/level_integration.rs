//! Integration tests for loading the shipped archetypes and level into a world
//!
//! Exercises the catalog, level overrides and entity store together.

use crate::assets::{ArchetypeCatalog, Level};
use crate::ecs::components::ShapeType;
use crate::ecs::{ComponentRegistry, World};
use crate::foundation::math::{Vec2, Vec3};

const ASSETS: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets");

fn catalog() -> ArchetypeCatalog {
    ArchetypeCatalog::load_dir(format!("{ASSETS}/archetypes"), ComponentRegistry::default()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(catalog: &ArchetypeCatalog, name: &str) -> Vec<String> {
        catalog
            .get(name)
            .unwrap()
            .components()
            .iter()
            .map(|(key, _)| key.to_string())
            .collect()
    }

    #[test]
    fn test_shipped_archetype_components() {
        let catalog = catalog();

        assert_eq!(tags(&catalog, "Ball"), ["SceneComponent_0", "PhysicsComponent_0", "GraphicsComponent_0"]);
        assert_eq!(
            tags(&catalog, "Paddle"),
            ["SceneComponent_0", "PhysicsComponent_0", "GraphicsComponent_0", "InputComponent_0"]
        );

        let ball = catalog.get("Ball").unwrap();
        let physics = ball.components().physics().unwrap();
        assert_eq!(physics.shape, ShapeType::Circle);
        assert_eq!(physics.collider_weight, 1.0);
        assert_eq!(ball.velocity(), Vec2::new(250.0, 250.0));
        assert_eq!(ball.direction(), Vec2::new(0.0, -1.0));

        let paddle = catalog.get("Paddle").unwrap();
        assert_eq!(paddle.components().graphics().unwrap().material, "PlainWhiteSurfaceBordered");
        assert_eq!(paddle.components().graphics().unwrap().model, "VertexTexCoordColorQuad");
    }

    #[test]
    fn test_spawned_entities_are_independent() {
        let catalog = catalog();
        let mut world = World::new();
        let ball = catalog.get("Ball").unwrap();

        let first = world.spawn(ball, None).unwrap();
        let second = world.spawn(ball, None).unwrap();
        assert_ne!(first, second);

        world.set_position(first, Vec3::new(10.0, 20.0, 0.0)).unwrap();
        world.set_velocity(first, Vec2::zeros()).unwrap();
        world.properties_mut(first).unwrap().set("tagged", true);

        let second = world.get(second).unwrap();
        assert_eq!(second.position(), Vec3::zeros());
        assert_eq!(second.velocity(), Vec2::new(250.0, 250.0));
        assert_eq!(second.properties().get_bool("tagged"), None);

        // The template itself is untouched
        assert_eq!(ball.velocity(), Vec2::new(250.0, 250.0));
    }

    #[test]
    fn test_level_one_layout() {
        let catalog = catalog();
        let level = Level::load_file(format!("{ASSETS}/levels/Level1.lvl")).unwrap();
        let mut world = World::new();
        let ids = level.spawn_into(&catalog, &mut world).unwrap();

        assert_eq!(ids.len(), level.objects().len());
        assert_eq!(world.with_archetype("Ball").count(), 1);
        assert_eq!(world.with_archetype("Paddle").count(), 1);
        assert_eq!(world.input_entities().count(), 1);

        let losing: Vec<_> = world
            .with_archetype("Wall")
            .filter(|wall| wall.properties().get_bool("losing_wall") == Some(true))
            .collect();
        assert_eq!(losing.len(), 1);
        assert!(losing[0].position().y < -300.0);

        let bricks: Vec<_> = world.with_archetype("Brick").collect();
        assert!(!bricks.is_empty());
        assert!(bricks.iter().all(|brick| brick.physics().unwrap().is_static()));
        assert!(bricks.iter().all(|brick| brick.properties().get_i64("lives").unwrap_or(0) >= 1));

        let paddle = world.with_archetype("Paddle").next().unwrap();
        assert_eq!(paddle.position(), Vec3::new(0.0, -250.0, 0.0));
        assert_eq!(paddle.transform().scale, Vec3::new(75.0, 20.0, 0.0));
    }

    #[test]
    fn test_destroying_level_entities() {
        let catalog = catalog();
        let level = Level::load_file(format!("{ASSETS}/levels/Level1.lvl")).unwrap();
        let mut world = World::new();
        let ids = level.spawn_into(&catalog, &mut world).unwrap();
        let total = world.len();

        for id in &ids[..3] {
            world.destroy(*id).unwrap();
        }
        assert_eq!(world.len(), total - 3);
        assert_eq!(world.spawned_total(), total as u64);
        assert!(ids[..3].iter().all(|id| world.get(*id).is_err()));
    }
}
