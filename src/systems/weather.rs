use rand_chacha::ChaCha8Rng;

use crate::{
    engine::{System, SystemContext},
    error::WorldError,
    rng::SystemId,
    world::World,
};

use super::WEATHER_SYSTEM;

/// Drifts the cloud layer along with world time.
pub struct WeatherSystem;

impl WeatherSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WeatherSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for WeatherSystem {
    fn name(&self) -> &'static str {
        "weather"
    }

    fn system_id(&self) -> SystemId {
        WEATHER_SYSTEM
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut ChaCha8Rng,
    ) -> Result<(), WorldError> {
        world.update_weather(ctx.elapsed_seconds + ctx.dt_seconds);
        Ok(())
    }
}
