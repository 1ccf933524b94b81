//! Game error type

use breakout_engine::assets::LoadError;
use breakout_engine::config::ConfigError;
use breakout_engine::ecs::StoreError;
use breakout_engine::physics::SimulationError;

/// Errors that stop the game
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Configuration could not be read or is invalid
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Archetype or level documents are broken
    #[error("Asset error: {0}")]
    Load(#[from] LoadError),

    /// A tick failed
    #[error("Simulation error: {0}")]
    Simulation(#[from] SimulationError),

    /// An entity update between ticks failed
    #[error("Entity store error: {0}")]
    Store(#[from] StoreError),
}
