//! Headless paddle control
//!
//! Stands in for a keyboard: follows the ball horizontally using the last
//! published snapshot, like a player watching the screen.

use breakout_engine::ecs::WorldSnapshot;
use breakout_engine::input::{InputAdapter, InputCommand, InputTarget};
use breakout_engine::foundation::math::Vec2;

use crate::rules::archetypes;

/// Paddle autopilot
///
/// Compares the heading it wants with the paddle's actual heading in the
/// snapshot, so a heading changed by a collision is corrected on the next
/// tick.
#[derive(Debug, Clone)]
pub struct AutoPaddle {
    dead_zone: f32,
    pending: Vec<InputCommand>,
}

impl AutoPaddle {
    /// Create an autopilot that ignores offsets smaller than `dead_zone`
    pub fn new(dead_zone: f32) -> Self {
        Self {
            dead_zone,
            pending: Vec::new(),
        }
    }

    /// Look at the latest snapshot and queue a heading change if needed
    pub fn observe(&mut self, snapshot: &WorldSnapshot) {
        let find = |name: &str| snapshot.entities().iter().find(|entity| entity.archetype == name);
        let (Some(ball), Some(paddle)) = (find(archetypes::BALL), find(archetypes::PADDLE)) else {
            return;
        };

        let offset = ball.world_transform.position.x - paddle.world_transform.position.x;
        let heading = if offset.abs() <= self.dead_zone { 0.0 } else { offset.signum() };
        let wanted = Vec2::new(heading, 0.0);
        if paddle.direction == wanted {
            return;
        }

        let target = InputTarget::AllControlled;
        self.pending.push(if heading == 0.0 {
            InputCommand::Stop { target }
        } else {
            InputCommand::Heading { target, direction: wanted }
        });
    }

    /// Drop queued commands, e.g. after a level reload
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}

impl InputAdapter for AutoPaddle {
    fn poll(&mut self) -> Vec<InputCommand> {
        std::mem::take(&mut self.pending)
    }
}
