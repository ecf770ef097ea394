//! Seeded multi-octave coherent noise.

use ::noise::{NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

/// Fixed second coordinate used when sampling a 1D slice of the 2D field.
const LINE_OFFSET: f64 = 0.318_309_886;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    pub octaves: u32,
    /// Frequency of the first octave, in cycles per tile.
    pub frequency: f64,
    /// Amplitude multiplier between octaves (0..1).
    pub persistence: f64,
    /// Frequency multiplier between octaves.
    pub lacunarity: f64,
    /// How fast a time-varying field drifts, in noise units per world second.
    pub changeability: f64,
}

impl NoiseConfig {
    pub const fn new(octaves: u32, frequency: f64) -> Self {
        Self {
            octaves,
            frequency,
            persistence: 0.5,
            lacunarity: 2.0,
            changeability: 0.0,
        }
    }

    pub const fn with_changeability(mut self, changeability: f64) -> Self {
        self.changeability = changeability;
        self
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self::new(4, 0.05)
    }
}

/// A deterministic fractal field. Identical seed and coordinates always give
/// the identical value in `[-1, 1]`.
#[derive(Clone)]
pub struct NoiseField {
    source: Perlin,
    config: NoiseConfig,
}

impl NoiseField {
    pub fn new(seed: u32, config: NoiseConfig) -> Self {
        Self {
            source: Perlin::new(seed),
            config,
        }
    }

    pub fn config(&self) -> &NoiseConfig {
        &self.config
    }

    pub fn sample_1d(&self, x: f64) -> f64 {
        self.fbm(|frequency| self.source.get([x * frequency, LINE_OFFSET]))
    }

    pub fn sample_2d(&self, x: f64, y: f64) -> f64 {
        self.fbm(|frequency| self.source.get([x * frequency, y * frequency]))
    }

    pub fn sample_3d(&self, x: f64, y: f64, z: f64) -> f64 {
        self.fbm(|frequency| self.source.get([x * frequency, y * frequency, z * frequency]))
    }

    /// Sample a time-varying 2D field; time is scaled by the changeability
    /// rate and used as the third axis.
    pub fn sample_at_time(&self, x: f64, y: f64, seconds: f64) -> f64 {
        let z = seconds * self.config.changeability;
        self.fbm(|frequency| self.source.get([x * frequency, y * frequency, z]))
    }

    fn fbm(&self, mut octave: impl FnMut(f64) -> f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = self.config.frequency;
        let mut max_value = 0.0;

        for _ in 0..self.config.octaves.max(1) {
            total += amplitude * octave(frequency);
            max_value += amplitude;
            amplitude *= self.config.persistence;
            frequency *= self.config.lacunarity;
        }

        (total / max_value).clamp(-1.0, 1.0)
    }
}
