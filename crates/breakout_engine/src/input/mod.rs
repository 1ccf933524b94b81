//! Input sampling
//!
//! The core never reads devices. An [`InputAdapter`] turns whatever the host
//! has (keyboard, script, network) into [`InputCommand`]s, which are applied
//! to Input-bearing entities at the start of a tick.

use crate::ecs::entity::EntityId;
use crate::ecs::world::{StoreError, World};
use crate::foundation::math::{utils, Vec2, Vec3};

/// Entities a command applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputTarget {
    /// Every entity with an Input component
    AllControlled,
    /// A single entity, which must carry an Input component
    Entity(EntityId),
}

/// State change requested by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    /// Replace the heading (normalized, zero stops)
    Heading {
        /// Affected entities
        target: InputTarget,
        /// New heading
        direction: Vec2,
    },
    /// Replace the per-axis speed
    Velocity {
        /// Affected entities
        target: InputTarget,
        /// New speed
        velocity: Vec2,
    },
    /// Teleport to a local position
    Position {
        /// Affected entities
        target: InputTarget,
        /// New position
        position: Vec3,
    },
    /// Zero the heading
    Stop {
        /// Affected entities
        target: InputTarget,
    },
}

impl InputCommand {
    /// Target of the command
    pub fn target(&self) -> InputTarget {
        match *self {
            Self::Heading { target, .. }
            | Self::Velocity { target, .. }
            | Self::Position { target, .. }
            | Self::Stop { target } => target,
        }
    }
}

/// Source of input commands, polled once per tick
pub trait InputAdapter {
    /// Commands collected since the last poll
    fn poll(&mut self) -> Vec<InputCommand>;
}

/// Adapter that never produces commands
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl InputAdapter for NoInput {
    fn poll(&mut self) -> Vec<InputCommand> {
        Vec::new()
    }
}

/// Apply commands in order; returns how many entity updates were made
///
/// Commands aimed at entities without an Input component, or at entities that
/// no longer exist, are dropped with a warning.
pub fn apply_commands(world: &mut World, commands: &[InputCommand]) -> Result<usize, StoreError> {
    let mut applied = 0;
    for command in commands {
        let targets: Vec<EntityId> = match command.target() {
            InputTarget::AllControlled => world.input_entities().map(|entity| entity.id()).collect(),
            InputTarget::Entity(id) => match world.get(id) {
                Ok(entity) if entity.has_input() => vec![id],
                Ok(entity) => {
                    log::warn!("Ignoring {command:?}: {} {id:?} has no InputComponent", entity.archetype());
                    continue;
                }
                Err(_) => {
                    log::warn!("Ignoring {command:?}: {id:?} does not exist");
                    continue;
                }
            },
        };

        for id in targets {
            match *command {
                InputCommand::Heading { direction, .. } => {
                    world.set_direction(id, utils::normalize_or_zero(direction))?;
                }
                InputCommand::Velocity { velocity, .. } => world.set_velocity(id, velocity)?,
                InputCommand::Position { position, .. } => world.set_position(id, position)?,
                InputCommand::Stop { .. } => world.set_direction(id, Vec2::zeros())?,
            }
            applied += 1;
        }
    }
    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Archetype;
    use crate::ecs::component::Component;
    use crate::ecs::components::{InputComponent, SceneComponent};
    use approx::assert_relative_eq;

    fn spawn(world: &mut World, name: &str, controlled: bool) -> EntityId {
        let mut archetype = Archetype::new(name)
            .with_velocity(Vec2::new(500.0, 0.0))
            .with_component(Component::Scene(SceneComponent::default()));
        if controlled {
            archetype = archetype.with_component(Component::Input(InputComponent));
        }
        world.spawn(&archetype, None).unwrap()
    }

    #[test]
    fn test_heading_applies_to_controlled_entities() {
        let mut world = World::new();
        let paddle = spawn(&mut world, "Paddle", true);
        let ball = spawn(&mut world, "Ball", false);

        let commands = [InputCommand::Heading {
            target: InputTarget::AllControlled,
            direction: Vec2::new(-2.0, 0.0),
        }];
        assert_eq!(apply_commands(&mut world, &commands).unwrap(), 1);

        assert_relative_eq!(world.get(paddle).unwrap().direction(), Vec2::new(-1.0, 0.0), epsilon = 1e-6);
        assert_eq!(world.get(ball).unwrap().direction(), Vec2::zeros());
    }

    #[test]
    fn test_uncontrolled_target_is_ignored() {
        let mut world = World::new();
        let ball = spawn(&mut world, "Ball", false);

        let commands = [InputCommand::Velocity {
            target: InputTarget::Entity(ball),
            velocity: Vec2::new(1.0, 1.0),
        }];
        assert_eq!(apply_commands(&mut world, &commands).unwrap(), 0);
        assert_eq!(world.get(ball).unwrap().velocity(), Vec2::new(500.0, 0.0));
    }

    #[test]
    fn test_stop_and_position() {
        let mut world = World::new();
        let paddle = spawn(&mut world, "Paddle", true);
        world.set_direction(paddle, Vec2::new(1.0, 0.0)).unwrap();

        let commands = [
            InputCommand::Stop { target: InputTarget::Entity(paddle) },
            InputCommand::Position { target: InputTarget::Entity(paddle), position: Vec3::new(0.0, -250.0, 0.0) },
        ];
        assert_eq!(apply_commands(&mut world, &commands).unwrap(), 2);

        let paddle = world.get(paddle).unwrap();
        assert_eq!(paddle.direction(), Vec2::zeros());
        assert_eq!(paddle.position(), Vec3::new(0.0, -250.0, 0.0));
    }

    #[test]
    fn test_destroyed_target_is_ignored() {
        let mut world = World::new();
        let paddle = spawn(&mut world, "Paddle", true);
        world.destroy(paddle).unwrap();

        let commands = [InputCommand::Stop { target: InputTarget::Entity(paddle) }];
        assert_eq!(apply_commands(&mut world, &commands), Ok(0));
        assert!(NoInput.poll().is_empty());
    }
}
