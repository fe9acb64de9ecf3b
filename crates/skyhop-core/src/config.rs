//! Scene configuration.

use serde::{Deserialize, Serialize};

use crate::physics::DEFAULT_GRAVITY;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The input was not valid configuration JSON.
    #[error("Invalid scene config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Player texture must not be empty")]
    EmptyTexture,

    /// A world dimension or the gravity was zero, negative or not finite.
    #[error("World {field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
}

/// Visible world size and gravity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub width: f32,
    pub height: f32,
    /// Downward gravity in px/s².
    pub gravity: f32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            gravity: DEFAULT_GRAVITY,
        }
    }
}

/// Top-level scene options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Texture key of the player sprite.
    pub texture: String,
    /// Enables the third jump.
    pub triple_jump: bool,
    pub world: WorldConfig,
    /// Seed for random collectible placement.
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            texture: "star".to_string(),
            triple_jump: false,
            world: WorldConfig::default(),
            seed: 0,
        }
    }
}

impl SceneConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.texture.trim().is_empty() {
            return Err(ConfigError::EmptyTexture);
        }

        for (field, value) in [
            ("width", self.world.width),
            ("height", self.world.height),
            ("gravity", self.world.gravity),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        Ok(())
    }
}
