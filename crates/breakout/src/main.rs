//! Headless breakout
//!
//! Runs the configured levels with an autopilot paddle and logs the result.
//! Usage: `breakout [config.toml|config.ron]`

mod config;
mod error;
mod game;
mod input;
mod render;
mod rules;

use breakout_engine::config::Config;
use breakout_engine::foundation::logging;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::Game;
use crate::render::LoggingRenderer;

const DEFAULT_CONFIG: &str = "breakout.toml";

fn run(config_path: &str) -> Result<(), GameError> {
    let config = GameConfig::load_or_default(config_path)?;
    config.validate()?;
    logging::init_with_level(&config.simulation.log_level);

    log::info!("Starting breakout with {config_path}");
    let mut game = Game::new(config)?;
    let mut renderer = LoggingRenderer::new();
    let summary = game.run(&mut renderer)?;

    log::info!(
        "{:?} after {} ticks in {:.2?}: score {}, high score {}, {} levels cleared, {} draw calls",
        summary.status,
        summary.ticks,
        summary.elapsed,
        summary.score,
        summary.high_score,
        summary.levels_cleared,
        renderer.total_calls()
    );
    Ok(())
}

fn main() {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    if let Err(e) = run(&config_path) {
        logging::init_with_level("error");
        log::error!("breakout failed: {e}");
        std::process::exit(1);
    }
}
