//! Breakout session
//!
//! Plays the configured levels in order. Losing the ball costs a play and
//! restarts the current level; clearing every brick moves on to the next one.

use std::time::Duration;

use breakout_engine::assets::{ArchetypeCatalog, Level};
use breakout_engine::ecs::{ComponentRegistry, EntityId};
use breakout_engine::foundation::math::Vec2;
use breakout_engine::foundation::time::Stopwatch;
use breakout_engine::render::{render, RenderAdapter};
use breakout_engine::Simulation;
use nalgebra::Rotation2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::input::AutoPaddle;
use crate::rules::{archetypes, BreakoutRules, GameEvent};

/// Where the session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    /// Still running
    Playing,
    /// Every level cleared
    Won,
    /// No plays left
    Lost,
    /// Tick budget used up
    OutOfTime,
}

/// End-of-session report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSummary {
    /// Final status
    pub status: GameStatus,
    /// Ticks run
    pub ticks: u64,
    /// Final score
    pub score: u64,
    /// Best score
    pub high_score: u64,
    /// Plays left
    pub plays_remaining: u32,
    /// Levels completed
    pub levels_cleared: usize,
    /// Wall time spent in `run`
    pub elapsed: Duration,
}

/// One game session
pub struct Game {
    config: GameConfig,
    catalog: ArchetypeCatalog,
    levels: Vec<Level>,
    level_index: usize,
    levels_cleared: usize,
    simulation: Simulation,
    rules: BreakoutRules,
    autopilot: AutoPaddle,
    rng: StdRng,
    plays_remaining: u32,
    status: GameStatus,
}

impl Game {
    /// Load assets and spawn the first level
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let catalog = ArchetypeCatalog::load_dir(&config.assets.archetype_dir, ComponentRegistry::default())?;
        let levels = config
            .assets
            .levels
            .iter()
            .map(Level::load_file)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_parts(config, catalog, levels)
    }

    /// Build a session from already loaded assets
    pub fn from_parts(config: GameConfig, catalog: ArchetypeCatalog, levels: Vec<Level>) -> Result<Self, GameError> {
        let simulation = Simulation::new(config.simulation.clone())?;
        let mut game = Self {
            rules: BreakoutRules::new(config.gameplay.brick_hit_score)
                .with_life_materials(config.gameplay.brick_materials.clone()),
            autopilot: AutoPaddle::new(config.gameplay.autopilot_dead_zone),
            rng: StdRng::seed_from_u64(config.gameplay.launch_seed),
            plays_remaining: config.gameplay.starting_plays,
            status: GameStatus::Playing,
            level_index: 0,
            levels_cleared: 0,
            config,
            catalog,
            levels,
            simulation,
        };
        game.load_level()?;
        Ok(game)
    }

    fn load_level(&mut self) -> Result<(), GameError> {
        let Some(level) = self.levels.get(self.level_index) else {
            self.status = GameStatus::Won;
            return Ok(());
        };

        let world = self.simulation.world_mut();
        world.clear();
        level.spawn_into(&self.catalog, world)?;
        self.rules.begin_level(world)?;
        self.autopilot.reset();
        log::info!("Playing {} ({} plays left)", level.name(), self.plays_remaining);

        self.launch_balls()?;
        self.simulation.refresh_snapshot();
        Ok(())
    }

    /// Tilt every ball's heading by a random angle within the jitter
    fn launch_balls(&mut self) -> Result<(), GameError> {
        let max_angle = self.config.gameplay.launch_jitter_degrees.to_radians();
        let world = self.simulation.world_mut();
        let balls: Vec<(EntityId, Vec2)> = world
            .with_archetype(archetypes::BALL)
            .map(|ball| (ball.id(), ball.direction()))
            .collect();

        for (id, direction) in balls {
            let angle = if max_angle > 0.0 { self.rng.gen_range(-max_angle..=max_angle) } else { 0.0 };
            world.set_direction(id, Rotation2::new(angle) * direction)?;
            log::debug!("Launched ball {id:?} at {:.1} degrees", angle.to_degrees());
        }
        Ok(())
    }

    /// Score bookkeeping
    pub fn rules(&self) -> &BreakoutRules {
        &self.rules
    }

    /// Underlying simulation
    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    /// Run one tick and draw the result
    pub fn tick<R: RenderAdapter + ?Sized>(&mut self, renderer: &mut R) -> Result<GameStatus, GameError> {
        if self.status != GameStatus::Playing {
            return Ok(self.status);
        }

        self.autopilot.observe(self.simulation.snapshot());
        self.simulation.step(&mut self.autopilot, &mut self.rules)?;
        render(self.simulation.snapshot(), renderer);

        let mut ball_lost = false;
        for event in self.rules.drain_events() {
            match event {
                GameEvent::BrickHit { brick, multiplier, points } => {
                    log::trace!("Brick {brick:?} hit x{multiplier} for {points}");
                }
                GameEvent::BrickDestroyed(brick) => log::trace!("Brick {brick:?} destroyed"),
                GameEvent::BallLost(_) => ball_lost = true,
            }
        }

        if ball_lost {
            self.plays_remaining = self.plays_remaining.saturating_sub(1);
            if self.plays_remaining == 0 {
                log::info!("Out of plays with {} points", self.rules.score());
                self.status = GameStatus::Lost;
            } else {
                self.load_level()?;
            }
        } else if self.rules.bricks_remaining() == 0 {
            self.levels_cleared += 1;
            self.level_index += 1;
            log::info!("Level cleared, score {}", self.rules.score());
            self.load_level()?;
        }
        Ok(self.status)
    }

    /// Tick until the game ends or the tick budget is spent
    pub fn run<R: RenderAdapter + ?Sized>(&mut self, renderer: &mut R) -> Result<GameSummary, GameError> {
        let max_ticks = self.config.session.max_ticks;
        let interval = self.config.session.report_interval;
        let mut ticks = 0;
        let stopwatch = Stopwatch::start_new();

        while ticks < max_ticks && self.status == GameStatus::Playing {
            self.tick(renderer)?;
            ticks += 1;
            if interval > 0 && ticks % interval == 0 {
                log::info!(
                    "Tick {ticks}: score {}, {} bricks left, {} plays left",
                    self.rules.score(),
                    self.rules.bricks_remaining(),
                    self.plays_remaining
                );
            }
        }
        if self.status == GameStatus::Playing {
            self.status = GameStatus::OutOfTime;
        }

        Ok(GameSummary {
            status: self.status,
            ticks,
            score: self.rules.score(),
            high_score: self.rules.high_score(),
            plays_remaining: self.plays_remaining,
            levels_cleared: self.levels_cleared,
            elapsed: stopwatch.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::LoggingRenderer;
    use serde_json::json;

    fn catalog() -> ArchetypeCatalog {
        let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/archetypes");
        ArchetypeCatalog::load_dir(dir, ComponentRegistry::default()).unwrap()
    }

    fn config() -> GameConfig {
        let mut config = GameConfig::default();
        config.gameplay.launch_jitter_degrees = 0.0;
        config.session.report_interval = 0;
        config
    }

    /// A ball dropping straight onto the losing wall, one brick far away
    fn doomed_level() -> Level {
        Level::parse(&json!({
            "Doomed": {
                "WorldObjects": [
                    { "Wall": { "losing_wall": true, "components": [ { "SceneComponent_0": { "transform": {
                        "position": { "x": 0.0, "y": -310.0 }, "scale": { "x": 840.0, "y": 20.0 } } } } ] } },
                    { "Brick": { "components": [ { "SceneComponent_0": { "transform": { "position": { "x": 0.0, "y": 200.0 } } } } ] } },
                    { "Ball": { "components": [ { "SceneComponent_0": { "transform": { "position": { "x": 300.0, "y": -200.0 } } } } ] } }
                ]
            }
        }))
        .unwrap()
    }

    /// A ball sitting right under its only brick
    fn easy_level() -> Level {
        Level::parse(&json!({
            "Easy": {
                "WorldObjects": [
                    { "Brick": { "components": [ { "SceneComponent_0": { "transform": { "position": { "x": 0.0, "y": 20.0 } } } } ] } },
                    { "Ball": { "direction": { "x": 0.0, "y": 1.0 } } }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_losing_every_play() {
        let mut config = config();
        config.gameplay.starting_plays = 2;
        let mut game = Game::from_parts(config, catalog(), vec![doomed_level()]).unwrap();

        let summary = game.run(&mut LoggingRenderer::new()).unwrap();
        assert_eq!(summary.status, GameStatus::Lost);
        assert_eq!(summary.plays_remaining, 0);
        assert_eq!(summary.score, 0);
        assert!(summary.ticks < game.config.session.max_ticks);
    }

    #[test]
    fn test_clearing_last_level_wins() {
        let mut game = Game::from_parts(config(), catalog(), vec![easy_level()]).unwrap();
        assert_eq!(game.rules().bricks_remaining(), 1);

        let summary = game.run(&mut LoggingRenderer::new()).unwrap();
        assert_eq!(summary.status, GameStatus::Won);
        assert_eq!(summary.levels_cleared, 1);
        assert_eq!(summary.score, 100);
        assert_eq!(summary.high_score, 100);
    }

    #[test]
    fn test_tick_budget() {
        let mut config = config();
        config.session.max_ticks = 5;
        let level = Level::load_file(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/levels/Level1.lvl")).unwrap();
        let mut game = Game::from_parts(config, catalog(), vec![level]).unwrap();

        let mut renderer = LoggingRenderer::new();
        let summary = game.run(&mut renderer).unwrap();
        assert_eq!(summary.status, GameStatus::OutOfTime);
        assert_eq!(summary.ticks, 5);
        assert_eq!(renderer.frames(), 5);
        assert_eq!(game.simulation().version(), 5);
        assert!(summary.elapsed > Duration::ZERO);
    }

    #[test]
    fn test_bricks_start_with_life_material() {
        let level = Level::load_file(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/levels/Level1.lvl")).unwrap();
        let game = Game::from_parts(config(), catalog(), vec![level]).unwrap();

        let world = game.simulation().world();
        let mut materials: Vec<String> = world
            .with_archetype(archetypes::BRICK)
            .map(|brick| brick.graphics().unwrap().material.clone())
            .collect();
        materials.dedup();
        assert_eq!(materials, ["BrickThreeLives", "BrickTwoLives", "BrickOneLife"]);
    }

    #[test]
    fn test_launch_is_seeded() {
        let mut config = config();
        config.gameplay.launch_jitter_degrees = 30.0;
        let level = || Level::load_file(concat!(env!("CARGO_MANIFEST_DIR"), "/../../assets/levels/Level1.lvl")).unwrap();

        let heading = |game: &Game| {
            let world = game.simulation().world();
            world.with_archetype(archetypes::BALL).next().unwrap().direction()
        };
        let first = Game::from_parts(config.clone(), catalog(), vec![level()]).unwrap();
        let second = Game::from_parts(config, catalog(), vec![level()]).unwrap();

        assert_eq!(heading(&first), heading(&second));
        approx::assert_relative_eq!(heading(&first).magnitude(), 1.0, epsilon = 1e-5);
        assert!(heading(&first).y < 0.0);
    }
}
