use rand_chacha::ChaCha8Rng;

use crate::{
    behavior::{update_creature, BehaviorSettings},
    engine::{System, SystemContext},
    error::WorldError,
    rng::SystemId,
    species::Category,
    world::World,
};

use super::FAUNA_SYSTEM;

/// Runs the behavior engine for every creature alive or dead at the start of
/// the tick, in creation order. Newborns wait until the next tick.
pub struct FaunaSystem {
    settings: BehaviorSettings,
}

impl FaunaSystem {
    pub fn new(settings: BehaviorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &BehaviorSettings {
        &self.settings
    }
}

impl Default for FaunaSystem {
    fn default() -> Self {
        Self::new(BehaviorSettings::default())
    }
}

impl System for FaunaSystem {
    fn name(&self) -> &'static str {
        "fauna"
    }

    fn system_id(&self) -> SystemId {
        FAUNA_SYSTEM
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut ChaCha8Rng,
    ) -> Result<(), WorldError> {
        for id in world.ids_in(Category::Creature) {
            update_creature(world, id, ctx.dt_seconds, &self.settings, rng)?;
        }
        Ok(())
    }
}
