use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{behavior::BehaviorSettings, config::WorldConfig, world::World};

fn default_ticks() -> u64 {
    2_400
}

fn default_census_interval_ticks() -> u64 {
    100
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub ticks: Option<u64>,
    #[serde(default)]
    pub snapshot_interval_ticks: u64,
    #[serde(default = "default_census_interval_ticks")]
    pub census_interval_ticks: u64,
    #[serde(default)]
    pub behavior: BehaviorSettings,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .world
            .validate()
            .with_context(|| format!("Invalid world in {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    /// Generates the scenario's world through every stage.
    pub fn build_world(&self) -> Result<World> {
        World::generate(self.world.clone())
            .with_context(|| format!("Failed to generate world for scenario '{}'", self.name))
    }

    pub fn ticks(&self, override_ticks: Option<u64>) -> u64 {
        override_ticks.or(self.ticks).unwrap_or_else(default_ticks)
    }
}
