//! # Breakout Engine
//!
//! Entity-component core and 2D arcade physics for brick-breaker games.
//!
//! ## Features
//!
//! - **Data-driven archetypes**: JSON templates with named child references
//! - **Entity store**: spawn, destroy and parent/child trees with retired ids
//! - **Kinematics**: per-axis speed gated by a heading
//! - **Collision**: circle, box and point colliders with layer filtering
//! - **Adapters**: rendering and input stay outside the core
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use breakout_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let catalog = ArchetypeCatalog::load_dir("assets/archetypes", ComponentRegistry::default())?;
//!     let level = Level::load_file("assets/levels/Level1.lvl")?;
//!
//!     let mut simulation = Simulation::new(SimulationConfig::default())?;
//!     level.spawn_into(&catalog, simulation.world_mut())?;
//!
//!     let mut renderer = RecordingRenderer::default();
//!     for _ in 0..60 {
//!         simulation.step(&mut NoInput, &mut ())?;
//!         render(simulation.snapshot(), &mut renderer);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::float_cmp
)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod assets;
pub mod physics;
pub mod input;
pub mod render;

mod simulation;

pub use simulation::{Simulation, TickReport};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Simulation, TickReport,
        assets::{Archetype, ArchetypeCatalog, ArchetypeLoader, Level, LoadError},
        config::{Config, ConfigError, SimulationConfig},
        ecs::{
            Component, ComponentRegistry, EntityId, EntityView, Properties, StoreError, World, WorldSnapshot,
            components::{GraphicsComponent, InputComponent, PhysicsComponent, SceneComponent, ShapeType},
        },
        foundation::{
            math::{Mat4, Transform, Vec2, Vec3},
            time::{FixedTimestep, Stopwatch},
        },
        input::{InputAdapter, InputCommand, InputTarget, NoInput},
        physics::{
            CollisionDetector, CollisionHandler, CollisionLayers, CollisionPair, CollisionResolver,
            ResolvedCollision, SimulationError,
        },
        render::{render, DrawCall, RecordingRenderer, RenderAdapter},
    };
}
