//! Breakout gameplay rules
//!
//! Bricks carry a `lives` property. Every hit costs one life and scores the
//! base points times the number of hits the brick has taken so far, so a
//! three-life brick pays 100, 200 and 300. A brick is destroyed as soon as its
//! last life is gone. A wall with `losing_wall = true` loses the ball.
//!
//! Bricks are drawn with a material per remaining life when a
//! material table is configured: entry `n - 1` for `n` lives left.

use breakout_engine::ecs::{EntityId, World};
use breakout_engine::physics::{CollisionHandler, ResolvedCollision, SimulationError};

/// Archetype names the rules react to
pub mod archetypes {
    /// Ball archetype
    pub const BALL: &str = "Ball";
    /// Brick archetype
    pub const BRICK: &str = "Brick";
    /// Wall archetype
    pub const WALL: &str = "Wall";
    /// Paddle archetype
    pub const PADDLE: &str = "Paddle";
}

const LIVES: &str = "lives";
const STARTING_LIVES: &str = "starting_lives";
const LOSING_WALL: &str = "losing_wall";

/// Something the rules noticed during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// A brick was hit
    BrickHit {
        /// Brick entity
        brick: EntityId,
        /// Hits taken including this one
        multiplier: u32,
        /// Points awarded
        points: u32,
    },
    /// A brick lost its last life
    BrickDestroyed(EntityId),
    /// The ball touched the losing wall
    BallLost(EntityId),
}

/// Score and brick bookkeeping; the collision handler of the game
#[derive(Debug, Clone)]
pub struct BreakoutRules {
    brick_hit_score: u32,
    score: u64,
    high_score: u64,
    bricks_remaining: usize,
    life_materials: Vec<String>,
    events: Vec<GameEvent>,
}

impl BreakoutRules {
    /// Create rules awarding `brick_hit_score` points per hit
    pub fn new(brick_hit_score: u32) -> Self {
        Self {
            brick_hit_score,
            score: 0,
            high_score: 0,
            bricks_remaining: 0,
            life_materials: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Draw bricks with `materials[n - 1]` while they have `n` lives left
    pub fn with_life_materials(mut self, materials: Vec<String>) -> Self {
        self.life_materials = materials;
        self
    }

    /// Material for a brick with `lives` left, if the table covers it
    fn life_material(&self, lives: i64) -> Option<&str> {
        let index = usize::try_from(lives.checked_sub(1)?).ok()?;
        self.life_materials.get(index).map(String::as_str)
    }

    fn paint_brick(&self, world: &mut World, brick: EntityId, lives: i64) -> Result<(), SimulationError> {
        if let Some(material) = self.life_material(lives) {
            world.set_material(brick, material)?;
        }
        Ok(())
    }

    /// Prepare a freshly spawned level
    ///
    /// Records each brick's starting lives and counts the bricks. Returns the
    /// brick count.
    pub fn begin_level(&mut self, world: &mut World) -> Result<usize, SimulationError> {
        let bricks: Vec<(EntityId, i64)> = world
            .with_archetype(archetypes::BRICK)
            .map(|brick| (brick.id(), brick.properties().get_i64(LIVES).unwrap_or(1)))
            .collect();

        for (id, lives) in &bricks {
            let properties = world.properties_mut(*id)?;
            properties.set(LIVES, *lives);
            properties.set(STARTING_LIVES, *lives);
            self.paint_brick(world, *id, *lives)?;
        }
        self.bricks_remaining = bricks.len();
        self.events.clear();
        log::info!("Level started with {} bricks", self.bricks_remaining);
        Ok(self.bricks_remaining)
    }

    /// Current score
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Best score of the session
    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    /// Bricks still standing
    pub fn bricks_remaining(&self) -> usize {
        self.bricks_remaining
    }

    /// Take the events collected since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn hit_brick(&mut self, world: &mut World, brick: EntityId) -> Result<(), SimulationError> {
        let properties = world.get(brick)?.properties();
        let remaining = properties.get_i64(LIVES).unwrap_or(1);
        let starting = properties.get_i64(STARTING_LIVES).unwrap_or(remaining);
        if remaining <= 0 {
            return Ok(());
        }

        let remaining = remaining - 1;
        let multiplier = u32::try_from(starting - remaining).unwrap_or(1).max(1);
        let points = self.brick_hit_score.saturating_mul(multiplier);
        self.score += u64::from(points);
        self.high_score = self.high_score.max(self.score);
        self.events.push(GameEvent::BrickHit { brick, multiplier, points });
        log::debug!("Brick {brick:?} hit ({remaining} lives left), +{points} -> {}", self.score);

        if remaining == 0 {
            world.destroy(brick)?;
            self.bricks_remaining = self.bricks_remaining.saturating_sub(1);
            self.events.push(GameEvent::BrickDestroyed(brick));
        } else {
            world.properties_mut(brick)?.set(LIVES, remaining);
            self.paint_brick(world, brick, remaining)?;
        }
        Ok(())
    }
}

impl CollisionHandler for BreakoutRules {
    fn on_collision(&mut self, world: &mut World, collision: &ResolvedCollision) -> Result<(), SimulationError> {
        let archetype_a = world.get(collision.a)?.archetype().to_string();
        let archetype_b = world.get(collision.b)?.archetype().to_string();

        for (this, this_archetype, other_archetype) in [
            (collision.a, &archetype_a, &archetype_b),
            (collision.b, &archetype_b, &archetype_a),
        ] {
            if other_archetype != archetypes::BALL {
                continue;
            }
            match this_archetype.as_str() {
                archetypes::BRICK => self.hit_brick(world, this)?,
                archetypes::WALL => {
                    let losing = world.get(this)?.properties().get_bool(LOSING_WALL).unwrap_or(false);
                    if losing {
                        if let Some(ball) = collision.other(this) {
                            log::info!("Ball {ball:?} lost");
                            self.events.push(GameEvent::BallLost(ball));
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}
