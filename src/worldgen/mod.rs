//! World generation: elevation → weather → hydrology → saturation → flora →
//! fauna. Each stage reads only what the earlier stages produced and draws
//! from its own seeded generator, so any stage can be re-run on its own and
//! lands on the same result.

mod hydrology;
mod population;
mod terrain;
mod weather;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::WorldConfig;
use crate::error::WorldError;
use crate::rng::RngManager;
use crate::species::Category;
use crate::world::World;

pub use hydrology::{
    compute_saturation, relax_water, INITIAL_WATER, RELAXATION_PASSES, SATURATION_RADIUS,
};
pub use population::{Habitat, PlacementRule, FAUNA_RULES, FLORA_RULES};
pub use terrain::{generate_elevation, normalize_elevation, MAX_ELEVATION, MIN_ELEVATION};
pub use weather::{cloud_field, update_clouds, CLOUD_NOISE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Elevation,
    Weather,
    Hydrology,
    Saturation,
    Flora,
    Fauna,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Stage::Elevation,
        Stage::Weather,
        Stage::Hydrology,
        Stage::Saturation,
        Stage::Flora,
        Stage::Fauna,
    ];

    /// The stage whose output this one consumes.
    pub fn requires(self) -> Option<Stage> {
        match self {
            Stage::Elevation => None,
            Stage::Weather => Some(Stage::Elevation),
            Stage::Hydrology => Some(Stage::Weather),
            Stage::Saturation => Some(Stage::Hydrology),
            Stage::Flora => Some(Stage::Saturation),
            Stage::Fauna => Some(Stage::Flora),
        }
    }

    pub fn index(self) -> u64 {
        self as u64
    }

    pub fn name(self) -> &'static str {
        match self {
            Stage::Elevation => "elevation",
            Stage::Weather => "weather",
            Stage::Hydrology => "hydrology",
            Stage::Saturation => "saturation",
            Stage::Flora => "flora",
            Stage::Fauna => "fauna",
        }
    }

    /// This stage and every stage after it, in order.
    pub fn onwards(self) -> impl Iterator<Item = Stage> {
        Self::ALL.into_iter().filter(move |s| *s >= self)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl World {
    /// Builds a world and runs every generation stage.
    pub fn generate(config: WorldConfig) -> Result<World, WorldError> {
        let mut world = World::new(config)?;
        world.rebuild_from(Stage::Elevation)?;
        Ok(world)
    }

    /// Re-runs `stage` and everything after it.
    pub fn rebuild_from(&mut self, stage: Stage) -> Result<(), WorldError> {
        for stage in stage.onwards() {
            self.run_stage(stage)?;
        }
        Ok(())
    }

    /// Runs one stage against the current output of the stage before it.
    /// Afterwards the world counts as generated up to `stage` only; later
    /// stages have to be run again.
    pub fn run_stage(&mut self, stage: Stage) -> Result<(), WorldError> {
        if let Some(requires) = stage.requires() {
            let ready = self.completed_stage.is_some_and(|done| done >= requires);
            if !ready {
                return Err(WorldError::StageOrder { stage, requires });
            }
        }

        let mut rng = RngManager::new(self.config().seed).stage_rng(stage.index());
        match stage {
            Stage::Elevation => {
                self.clear_entities();
                generate_elevation(self.grid_mut(), &mut rng);
                normalize_elevation(self.grid_mut());
            }
            Stage::Weather => {
                let field = cloud_field(&mut rng);
                update_clouds(self.grid_mut(), &field, 0.0);
                self.weather = Some(field);
            }
            Stage::Hydrology => {
                self.clear_entities();
                relax_water(self.grid_mut());
            }
            Stage::Saturation => {
                self.clear_entities();
                compute_saturation(self.grid_mut());
            }
            Stage::Flora => {
                self.clear_entities();
                for rule in FLORA_RULES {
                    population::populate(self, rule, &mut rng)?;
                }
            }
            Stage::Fauna => {
                self.clear_category(Category::Creature);
                for rule in FAUNA_RULES {
                    population::populate(self, rule, &mut rng)?;
                }
            }
        }

        self.completed_stage = Some(stage);
        info!(
            stage = %stage,
            entities = self.entity_count(),
            "world generation stage complete"
        );
        Ok(())
    }
}
