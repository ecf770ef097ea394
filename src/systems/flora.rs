use rand_chacha::ChaCha8Rng;

use crate::{
    engine::{System, SystemContext},
    error::WorldError,
    rng::SystemId,
    world::World,
};

use super::FLORA_SYSTEM;

/// Regrows plant energy toward each species' maximum.
pub struct FloraSystem;

impl FloraSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FloraSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for FloraSystem {
    fn name(&self) -> &'static str {
        "flora"
    }

    fn system_id(&self) -> SystemId {
        FLORA_SYSTEM
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut ChaCha8Rng,
    ) -> Result<(), WorldError> {
        for entity in world.entities.values_mut() {
            entity.regenerate(ctx.dt_seconds);
        }
        Ok(())
    }
}
