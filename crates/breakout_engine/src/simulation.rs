//! Fixed-tick simulation driver
//!
//! One tick runs, in order: input, kinematics, collision detection over a
//! sampled snapshot, collision resolution, snapshot publication. A tick that
//! fails leaves the previously published snapshot in place.

use crate::config::{ConfigError, SimulationConfig};
use crate::ecs::snapshot::WorldSnapshot;
use crate::ecs::world::World;
use crate::foundation::time::FixedTimestep;
use crate::input::{self, InputAdapter};
use crate::physics::{
    CollisionDetector, CollisionHandler, CollisionResolver, KinematicsIntegrator, PhysicsBody, ResolvedCollision,
    SimulationError,
};

/// Outcome of one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Snapshot version published by this tick
    pub version: u64,
    /// Entity updates made by input commands
    pub input_updates: usize,
    /// Pairs found by the detector
    pub pairs_detected: usize,
    /// Pairs that were still overlapping when resolved, in order
    pub collisions: Vec<ResolvedCollision>,
}

/// World plus the systems that advance it
#[derive(Debug)]
pub struct Simulation {
    world: World,
    config: SimulationConfig,
    integrator: KinematicsIntegrator,
    detector: CollisionDetector,
    resolver: CollisionResolver,
    clock: FixedTimestep,
    version: u64,
    snapshot: WorldSnapshot,
}

impl Simulation {
    /// Create a simulation over an empty world
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        Self::with_world(config, World::new())
    }

    /// Create a simulation over an existing world
    pub fn with_world(config: SimulationConfig, world: World) -> Result<Self, ConfigError> {
        config.validate()?;
        let fallback = config.fallback_normal();
        let snapshot = WorldSnapshot::capture(&world, 0);
        Ok(Self {
            clock: FixedTimestep::new(config.fixed_timestep, config.max_steps_per_frame),
            integrator: KinematicsIntegrator::new(),
            detector: CollisionDetector::new(fallback),
            resolver: CollisionResolver::new(fallback),
            world,
            config,
            version: 0,
            snapshot,
        })
    }

    /// Live world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Live world, for spawning and game rules between ticks
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Active configuration
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Number of completed ticks
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Snapshot published by the last completed tick
    pub fn snapshot(&self) -> &WorldSnapshot {
        &self.snapshot
    }

    /// Republish the snapshot after changes made between ticks
    pub fn refresh_snapshot(&mut self) {
        self.snapshot = WorldSnapshot::capture(&self.world, self.version);
    }

    /// Run one tick of `dt` seconds
    pub fn tick<I, H>(&mut self, dt: f32, input: &mut I, handler: &mut H) -> Result<TickReport, SimulationError>
    where
        I: InputAdapter + ?Sized,
        H: CollisionHandler + ?Sized,
    {
        let commands = input.poll();
        let input_updates = input::apply_commands(&mut self.world, &commands)?;

        self.integrator.step(&mut self.world, dt)?;

        let bodies = PhysicsBody::sample_all(&self.world)?;
        let pairs = self.detector.detect(&bodies);
        let collisions = self.resolver.resolve_all(&mut self.world, &pairs, handler)?;

        self.version += 1;
        self.snapshot = WorldSnapshot::capture(&self.world, self.version);
        log::debug!(
            "Tick {}: {} bodies, {} pairs, {} resolved, {} entities",
            self.version,
            bodies.len(),
            pairs.len(),
            collisions.len(),
            self.world.len()
        );

        Ok(TickReport {
            version: self.version,
            input_updates,
            pairs_detected: pairs.len(),
            collisions,
        })
    }

    /// Run one tick of the configured fixed length
    pub fn step<I, H>(&mut self, input: &mut I, handler: &mut H) -> Result<TickReport, SimulationError>
    where
        I: InputAdapter + ?Sized,
        H: CollisionHandler + ?Sized,
    {
        self.tick(self.config.fixed_timestep, input, handler)
    }

    /// Feed wall-clock frame time and run the ticks it covers
    pub fn advance<I, H>(
        &mut self,
        frame_time: f32,
        input: &mut I,
        handler: &mut H,
    ) -> Result<Vec<TickReport>, SimulationError>
    where
        I: InputAdapter + ?Sized,
        H: CollisionHandler + ?Sized,
    {
        let steps = self.clock.advance(frame_time);
        let dt = self.clock.step();
        (0..steps).map(|_| self.tick(dt, input, handler)).collect()
    }
}
