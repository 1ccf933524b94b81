//! Game configuration
//!
//! Loaded from `breakout.toml` (or `.ron`) next to the binary; every field has
//! a default so a partial file is enough.

use breakout_engine::config::{Config, ConfigError, SimulationConfig};
use serde::{Deserialize, Serialize};

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Asset locations
    pub assets: AssetConfig,

    /// Gameplay settings
    pub gameplay: GameplayConfig,

    /// Headless session settings
    pub session: SessionConfig,

    /// Tick loop settings
    pub simulation: SimulationConfig,
}

/// Asset locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory holding the `.go` archetype documents
    pub archetype_dir: String,

    /// Level files, played in order
    pub levels: Vec<String>,
}

/// Gameplay configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Balls available before the game is over
    pub starting_plays: u32,

    /// Points per brick hit, multiplied by the hit count of that brick
    pub brick_hit_score: u32,

    /// Seed for the launch angle jitter
    pub launch_seed: u64,

    /// Largest launch angle off the archetype direction, in degrees
    pub launch_jitter_degrees: f32,

    /// Horizontal distance the autopilot paddle tolerates before moving
    pub autopilot_dead_zone: f32,

    /// Brick material per remaining life, one life first
    pub brick_materials: Vec<String>,
}

/// Headless session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Ticks to run before the session stops on its own
    pub max_ticks: u64,

    /// Log a progress line every this many ticks, 0 to disable
    pub report_interval: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            assets: AssetConfig::default(),
            gameplay: GameplayConfig::default(),
            session: SessionConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            archetype_dir: "assets/archetypes".to_string(),
            levels: vec!["assets/levels/Level1.lvl".to_string()],
        }
    }
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            starting_plays: 3,
            brick_hit_score: 100,
            launch_seed: 0x5eed_b0a1,
            launch_jitter_degrees: 30.0,
            autopilot_dead_zone: 8.0,
            brick_materials: vec![
                "BrickOneLife".to_string(),
                "BrickTwoLives".to_string(),
                "BrickThreeLives".to_string(),
            ],
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_ticks: 60 * 60 * 2,
            report_interval: 600,
        }
    }
}

impl Config for GameConfig {}

impl GameConfig {
    /// Check values the game cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        if self.assets.levels.is_empty() {
            return Err(ConfigError::Invalid("at least one level is required".to_string()));
        }
        if self.gameplay.starting_plays == 0 {
            return Err(ConfigError::Invalid("starting_plays must be at least 1".to_string()));
        }
        let jitter = self.gameplay.launch_jitter_degrees;
        if !(0.0..90.0).contains(&jitter) {
            return Err(ConfigError::Invalid(format!(
                "launch_jitter_degrees must be in [0, 90), got {jitter}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.gameplay.starting_plays, 3);
        assert_eq!(config.gameplay.brick_hit_score, 100);
    }

    #[test]
    fn test_partial_toml() {
        let config: GameConfig = toml::from_str(
            r#"
            [gameplay]
            launch_seed = 7

            [simulation]
            fixed_timestep = 0.01
            "#,
        )
        .unwrap();
        assert_eq!(config.gameplay.launch_seed, 7);
        assert_eq!(config.gameplay.starting_plays, 3);
        assert_eq!(config.simulation.fixed_timestep, 0.01);
        assert_eq!(config.assets, AssetConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = GameConfig::default();
        config.assets.levels.clear();
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.gameplay.launch_jitter_degrees = 90.0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.simulation.max_steps_per_frame = 0;
        assert!(config.validate().is_err());
    }
}
