use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::world::World;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes a JSON census of the world every `interval` ticks into
/// `<output_dir>/<scenario>/tick_NNNNNN.json`. An interval of 0 disables it.
pub struct SnapshotWriter {
    output_dir: PathBuf,
    interval: u64,
}

impl SnapshotWriter {
    pub fn new(output_dir: impl AsRef<Path>, interval: u64) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            interval,
        }
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn is_due(&self, tick: u64) -> bool {
        self.interval != 0 && tick % self.interval == 0
    }

    pub fn maybe_write(
        &self,
        world: &World,
        scenario_name: &str,
    ) -> Result<Option<PathBuf>, SnapshotError> {
        let tick = world.tick();
        if !self.is_due(tick) {
            return Ok(None);
        }
        self.write(world, scenario_name).map(Some)
    }

    pub fn write(&self, world: &World, scenario_name: &str) -> Result<PathBuf, SnapshotError> {
        let dir = self.output_dir.join(scenario_name);
        fs::create_dir_all(&dir)?;
        let file_path = dir.join(format!("tick_{:06}.json", world.tick()));
        let json = serde_json::to_string_pretty(&world.snapshot(scenario_name))?;
        fs::write(&file_path, json)?;
        debug!(path = %file_path.display(), "snapshot written");
        Ok(file_path)
    }
}
