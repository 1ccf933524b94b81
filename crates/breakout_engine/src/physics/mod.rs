//! Physics module for kinematics, collision detection and response
//!
//! A tick integrates positions first, then detects overlaps over a sampled
//! snapshot of every physics body and finally resolves the pairs one by one
//! against the live world.

pub mod collision;
pub mod collision_layers;
pub mod collision_system;
pub mod kinematics;
pub mod resolver;
pub mod shapes;

pub use collision::Contact;
pub use collision_layers::CollisionLayers;
pub use collision_system::{CollisionDetector, CollisionPair, PhysicsBody};
pub use kinematics::KinematicsIntegrator;
pub use resolver::{reflect, CollisionHandler, CollisionResolver, ResolvedCollision};
pub use shapes::{Bounds, Collider};

use crate::ecs::world::StoreError;

/// Errors raised while stepping the simulation
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// A time step or entity state the simulation cannot advance from
    #[error("Invalid simulation state: {0}")]
    InvalidSimulationState(String),

    /// The entity store rejected an update
    #[error(transparent)]
    Store(#[from] StoreError),
}
