use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::{
    engine::{System, SystemContext},
    error::WorldError,
    rng::SystemId,
    species::Species,
    world::{BookkeepingState, Census, World},
};

use super::BOOKKEEPING_SYSTEM;

/// Takes a census every `census_interval` ticks and logs it together with
/// the births, deaths and kills since the previous one.
pub struct BookkeepingSystem {
    census_interval: u64,
    last_totals: BookkeepingState,
    latest: Option<Census>,
}

impl BookkeepingSystem {
    pub fn new(census_interval: u64) -> Self {
        Self {
            census_interval,
            last_totals: BookkeepingState::default(),
            latest: None,
        }
    }

    pub fn latest_census(&self) -> Option<&Census> {
        self.latest.as_ref()
    }
}

impl Default for BookkeepingSystem {
    fn default() -> Self {
        Self::new(100)
    }
}

impl System for BookkeepingSystem {
    fn name(&self) -> &'static str {
        "bookkeeping"
    }

    fn system_id(&self) -> SystemId {
        BOOKKEEPING_SYSTEM
    }

    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        _rng: &mut ChaCha8Rng,
    ) -> Result<(), WorldError> {
        if self.census_interval == 0 || ctx.tick % self.census_interval != 0 {
            return Ok(());
        }

        let census = world.census();
        let totals = world.bookkeeping().clone();
        let flora: u64 = Species::FLORA.iter().map(|s| census.count(*s).total()).sum();
        info!(
            scenario = ctx.scenario_name,
            tick = ctx.tick,
            hour = world.hour_of_day(),
            creatures = world.living_creatures(),
            flora,
            births = totals.births.saturating_sub(self.last_totals.births),
            deaths = totals.deaths.saturating_sub(self.last_totals.deaths),
            kills = totals.kills.saturating_sub(self.last_totals.kills),
            "census"
        );
        for species in Species::CREATURES {
            let count = census.count(species);
            if count.total() > 0 {
                info!(
                    %species,
                    alive = count.alive,
                    dead = count.dead,
                    decomposed = count.decomposed,
                    "species census"
                );
            }
        }

        self.last_totals = totals;
        self.latest = Some(census);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::config::WorldConfig;
    use crate::entity::Sex;
    use crate::spatial::TilePos;

    fn ctx(tick: u64) -> SystemContext<'static> {
        SystemContext {
            tick,
            dt_seconds: 1.0,
            elapsed_seconds: tick as f64,
            scenario_name: "unit",
        }
    }

    #[test]
    fn census_only_on_interval() {
        let mut world = World::new(WorldConfig::new(4, 4, 1)).unwrap();
        world
            .spawn_creature(Species::Deer, TilePos::new(1, 1), Sex::Female)
            .unwrap();
        let mut system = BookkeepingSystem::new(10);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        system.run(&ctx(3), &mut world, &mut rng).unwrap();
        assert!(system.latest_census().is_none());
        system.run(&ctx(10), &mut world, &mut rng).unwrap();
        assert_eq!(system.latest_census().unwrap().alive(Species::Deer), 1);
    }

    #[test]
    fn reused_against_a_fresh_world_does_not_underflow() {
        let mut busy = World::new(WorldConfig::new(4, 4, 1)).unwrap();
        busy.bookkeeping.births = 5;
        busy.bookkeeping.deaths = 3;
        busy.bookkeeping.kills = 2;
        let mut system = BookkeepingSystem::new(10);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        system.run(&ctx(10), &mut busy, &mut rng).unwrap();

        let mut fresh = World::new(WorldConfig::new(4, 4, 1)).unwrap();
        fresh
            .spawn_creature(Species::Fox, TilePos::new(0, 0), Sex::Male)
            .unwrap();
        system.run(&ctx(20), &mut fresh, &mut rng).unwrap();
        assert_eq!(system.latest_census().unwrap().alive(Species::Fox), 1);
    }
}
