//! Configuration system
//!
//! Any `serde` type with a `Default` can be read from or written to `.toml`
//! and `.ron` files through [`Config`]. [`SimulationConfig`] holds the tuning
//! knobs of the tick loop.

pub use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec2;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Load configuration from file, or the default when the file is absent
    fn load_or_default(path: &str) -> Result<Self, ConfigError> {
        if std::path::Path::new(path).exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No config at {path}, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Values parsed but failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tick loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Length of one simulation tick in seconds
    pub fixed_timestep: f32,

    /// Upper bound on ticks run for a single rendered frame
    pub max_steps_per_frame: u32,

    /// Contact normal used when two shapes share a center
    pub degenerate_normal: [f32; 2],

    /// Default log filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_steps_per_frame: 5,
            degenerate_normal: [1.0, 0.0],
            log_level: "info".to_string(),
        }
    }
}

impl Config for SimulationConfig {}

impl SimulationConfig {
    /// Set the tick length
    pub fn with_fixed_timestep(mut self, seconds: f32) -> Self {
        self.fixed_timestep = seconds;
        self
    }

    /// Set the per-frame tick cap
    pub fn with_max_steps_per_frame(mut self, steps: u32) -> Self {
        self.max_steps_per_frame = steps;
        self
    }

    /// Set the fallback contact normal
    pub fn with_degenerate_normal(mut self, x: f32, y: f32) -> Self {
        self.degenerate_normal = [x, y];
        self
    }

    /// Set the default log filter
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Fallback contact normal as a unit vector
    pub fn fallback_normal(&self) -> Vec2 {
        let [x, y] = self.degenerate_normal;
        Vec2::new(x, y).try_normalize(f32::EPSILON).unwrap_or_else(|| Vec2::new(1.0, 0.0))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fixed_timestep.is_finite() && self.fixed_timestep > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fixed_timestep must be a positive number, got {}",
                self.fixed_timestep
            )));
        }
        if self.max_steps_per_frame == 0 {
            return Err(ConfigError::Invalid("max_steps_per_frame must be at least 1".to_string()));
        }
        let [x, y] = self.degenerate_normal;
        if !(x.is_finite() && y.is_finite()) || x.hypot(y) < f32::EPSILON {
            return Err(ConfigError::Invalid(
                "degenerate_normal must be a finite, non-zero vector".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = SimulationConfig::default()
            .with_fixed_timestep(0.01)
            .with_max_steps_per_frame(2)
            .with_degenerate_normal(0.0, 1.0)
            .with_log_level("debug");

        assert_eq!(config.fixed_timestep, 0.01);
        assert_eq!(config.max_steps_per_frame, 2);
        assert_eq!(config.degenerate_normal, [0.0, 1.0]);
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        assert!(SimulationConfig::default().with_fixed_timestep(0.0).validate().is_err());
        assert!(SimulationConfig::default().with_fixed_timestep(f32::NAN).validate().is_err());
        assert!(SimulationConfig::default().with_max_steps_per_frame(0).validate().is_err());
        assert!(SimulationConfig::default().with_degenerate_normal(0.0, 0.0).validate().is_err());
    }

    #[test]
    fn test_fallback_normal_is_unit() {
        let config = SimulationConfig::default().with_degenerate_normal(0.0, -3.0);
        assert_eq!(config.fallback_normal(), Vec2::new(0.0, -1.0));
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: SimulationConfig = toml::from_str("fixed_timestep = 0.02").unwrap();
        assert_eq!(config.fixed_timestep, 0.02);
        assert_eq!(config.max_steps_per_frame, 5);
    }

    #[test]
    fn test_ron_round_trip() {
        let config = SimulationConfig::default().with_log_level("trace");
        let text = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let parsed: SimulationConfig = ron::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = SimulationConfig::load_from_file("settings.ini");
        assert!(matches!(result, Err(ConfigError::Io(_)) | Err(ConfigError::UnsupportedFormat(_))));
    }
}
