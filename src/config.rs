//! World construction parameters.

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

fn default_width() -> u32 {
    64
}

fn default_height() -> u32 {
    64
}

fn default_seed() -> u64 {
    7
}

fn default_tick_seconds() -> f64 {
    1.0
}

/// Parameters accepted when a world is created. Species tables are compiled
/// in and deliberately not part of this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// World seconds that elapse per tick.
    #[serde(default = "default_tick_seconds")]
    pub tick_seconds: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            seed: default_seed(),
            tick_seconds: default_tick_seconds(),
        }
    }
}

impl WorldConfig {
    pub fn new(width: u32, height: u32, seed: u64) -> Self {
        Self {
            width,
            height,
            seed,
            ..Self::default()
        }
    }

    pub fn with_tick_seconds(mut self, tick_seconds: f64) -> Self {
        self.tick_seconds = tick_seconds;
        self
    }

    pub fn validate(&self) -> Result<(), WorldError> {
        if self.width == 0 || self.height == 0 {
            return Err(WorldError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if !(self.tick_seconds.is_finite() && self.tick_seconds > 0.0) {
            return Err(WorldError::InvalidTickLength(self.tick_seconds));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = WorldConfig::default();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, 64);
        assert_eq!(config.seed, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let err = WorldConfig::new(0, 10, 1).validate().unwrap_err();
        assert_eq!(
            err,
            WorldError::InvalidDimensions {
                width: 0,
                height: 10
            }
        );
        assert!(WorldConfig::new(10, 0, 1).validate().is_err());
    }

    #[test]
    fn non_positive_tick_length_is_rejected() {
        let config = WorldConfig::default().with_tick_seconds(0.0);
        assert_eq!(
            config.validate().unwrap_err(),
            WorldError::InvalidTickLength(0.0)
        );
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: WorldConfig = serde_yaml::from_str("width: 12\n").unwrap();
        assert_eq!(config.width, 12);
        assert_eq!(config.height, 64);
        assert_eq!(config.tick_seconds, 1.0);
    }
}
