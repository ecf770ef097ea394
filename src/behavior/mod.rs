//! Creature behavior: one generic implementation driven by the species
//! tables.
//!
//! Each tick a living creature first pays for the elapsed time
//! ([`needs`]), then re-evaluates its activity, then acts on it
//! ([`actions`]). Corpses only decompose.

pub mod actions;
pub mod movement;
pub mod needs;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::entity::{Activity, EntityId, LifeState};
use crate::error::WorldError;
use crate::spatial::TilePos;
use crate::species::{CreatureTraits, NEED_THRESHOLD};
use crate::world::World;

pub use actions::can_sleep_in;
pub use movement::can_enter;
pub use needs::{die, give_birth, CauseOfDeath};

/// How a hungry creature picks among the food it can see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreySelection {
    /// The candidate with the most body energy; the first seen wins ties.
    #[default]
    HighestEnergy,
    /// The first candidate in spiral order.
    Nearest,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorSettings {
    #[serde(default)]
    pub prey_selection: PreySelection,
    /// Per-tick chance that a wanderer picks a new direction.
    #[serde(default = "default_wander_turn_chance")]
    pub wander_turn_chance: f64,
}

fn default_wander_turn_chance() -> f64 {
    0.05
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            prey_selection: PreySelection::default(),
            wander_turn_chance: default_wander_turn_chance(),
        }
    }
}

impl BehaviorSettings {
    pub(crate) fn turn_chance(&self) -> f64 {
        if self.wander_turn_chance.is_finite() {
            self.wander_turn_chance.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// The activity picked for this tick, and the predator that forced it when
/// fleeing.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Decision {
    activity: Activity,
    predator: Option<TilePos>,
}

impl Decision {
    fn keep(activity: Activity) -> Self {
        Self {
            activity,
            predator: None,
        }
    }
}

fn decide(world: &World, id: EntityId, traits: &CreatureTraits) -> Result<Decision, WorldError> {
    let creature = world.creature(id).ok_or(WorldError::UnknownEntity(id))?;
    let current = creature.activity.unwrap_or(Activity::Wandering);
    let sleeping = current == Activity::Sleeping;

    // Danger wakes a creature only if it sleeps with its eyes open.
    if !sleeping || traits.sleeps_with_eyes_open {
        if let Some(predator) = actions::find_predator(world, id, traits)? {
            return Ok(Decision {
                activity: Activity::FleeingPredator,
                predator: Some(predator),
            });
        }
    }

    if sleeping {
        return Ok(Decision::keep(if creature.tiredness <= 0.0 {
            Activity::Wandering
        } else {
            Activity::Sleeping
        }));
    }

    let activity = if is_sleep_time(world, traits) && creature.is_exhausted() {
        Activity::LookingForSleepingPlace
    } else if creature.nourishment_ratio(traits) < NEED_THRESHOLD {
        Activity::LookingForFood
    } else if creature.hydration_ratio(traits) < NEED_THRESHOLD {
        Activity::LookingForWater
    } else if creature.mating_cooldown <= 0.0
        && creature.age >= traits.puberty_age
        && !creature.is_pregnant()
    {
        Activity::LookingForMate
    } else if current == Activity::FleeingPredator {
        Activity::Wandering
    } else {
        current
    };
    Ok(Decision::keep(activity))
}

/// Advances one creature by one tick.
///
/// Flora ids are ignored. Entities removed earlier in the same tick (eaten
/// to nothing, fully decomposed) are skipped without error so callers can
/// iterate over an id list taken at the start of the tick.
pub fn update_creature<R: Rng + ?Sized>(
    world: &mut World,
    id: EntityId,
    dt: f64,
    settings: &BehaviorSettings,
    rng: &mut R,
) -> Result<(), WorldError> {
    let Some(entity) = world.entity(id) else {
        return Ok(());
    };
    let Some(traits) = entity.species().creature_traits() else {
        return Ok(());
    };
    if entity.life() != Some(LifeState::Alive) {
        needs::decompose(world, id, traits, dt)?;
        return Ok(());
    }

    if let needs::NeedOutcome::Died(_) = needs::update_needs(world, id, traits, dt, rng)? {
        return Ok(());
    }

    let decision = decide(world, id, traits)?;
    if let Some(creature) = world.creature_mut(id) {
        creature.activity = Some(decision.activity);
    }

    match decision.activity {
        Activity::Sleeping => Ok(()),
        Activity::FleeingPredator => match decision.predator {
            Some(predator) => actions::flee(world, id, traits, predator, dt),
            None => Ok(()),
        },
        Activity::LookingForSleepingPlace => {
            actions::seek_sleeping_place(world, id, traits, dt, settings, rng)
        }
        Activity::LookingForFood => actions::seek_food(world, id, traits, dt, settings, rng),
        Activity::LookingForWater => actions::seek_water(world, id, traits, dt, settings, rng),
        Activity::LookingForMate => actions::seek_mate(world, id, traits, dt, settings, rng),
        Activity::Wandering => actions::wander(world, id, traits, dt, settings, rng),
    }
}

/// Whether the species' sleep window covers the world's current hour.
pub fn is_sleep_time(world: &World, traits: &CreatureTraits) -> bool {
    traits.is_sleep_time(world.hour_of_day())
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::config::WorldConfig;
    use crate::entity::Sex;
    use crate::species::Species;

    fn run(world: &mut World, id: EntityId) {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        update_creature(world, id, 1.0, &BehaviorSettings::default(), &mut rng).unwrap();
    }

    #[test]
    fn hunger_outranks_thirst() {
        let mut world = World::new(WorldConfig::new(8, 8, 1)).unwrap();
        let deer = world
            .spawn_creature(Species::Deer, TilePos::new(3, 3), Sex::Male)
            .unwrap();
        let traits = Species::Deer.creature_traits().unwrap();
        {
            let c = world.creature_mut(deer).unwrap();
            c.nourishment = traits.max_nourishment * 0.5;
            c.hydration = traits.max_hydration * 0.5;
        }
        run(&mut world, deer);
        assert_eq!(
            world.entity(deer).unwrap().activity(),
            Some(Activity::LookingForFood)
        );
    }

    #[test]
    fn sated_adults_look_for_a_mate() {
        let mut world = World::new(WorldConfig::new(8, 8, 1)).unwrap();
        let wolf = world
            .spawn_creature(Species::Wolf, TilePos::new(3, 3), Sex::Female)
            .unwrap();
        run(&mut world, wolf);
        assert_eq!(
            world.entity(wolf).unwrap().activity(),
            Some(Activity::LookingForMate)
        );
    }

    #[test]
    fn sleeper_wakes_once_rested() {
        let mut world = World::new(WorldConfig::new(8, 8, 1)).unwrap();
        let deer = world
            .spawn_creature(Species::Deer, TilePos::new(3, 3), Sex::Male)
            .unwrap();
        {
            let c = world.creature_mut(deer).unwrap();
            c.activity = Some(Activity::Sleeping);
            c.tiredness = 0.0001;
        }
        run(&mut world, deer);
        assert_ne!(world.entity(deer).unwrap().activity(), Some(Activity::Sleeping));
    }

    #[test]
    fn exactly_zero_needs_kill_without_moving() {
        let mut world = World::new(WorldConfig::new(8, 8, 1)).unwrap();
        let fox = world
            .spawn_creature(Species::Fox, TilePos::new(3, 3), Sex::Male)
            .unwrap();
        let traits = Species::Fox.creature_traits().unwrap();
        world.creature_mut(fox).unwrap().hydration = traits.hydration_loss;
        let before = world.creature(fox).unwrap().position;

        run(&mut world, fox);
        let entity = world.entity(fox).unwrap();
        assert_eq!(entity.life(), Some(LifeState::Dead));
        assert_eq!(entity.creature().unwrap().position, before);
        assert_eq!(entity.activity(), None);
    }

    #[test]
    fn eyes_open_sleepers_still_flee() {
        let mut world = World::new(WorldConfig::new(8, 8, 1)).unwrap();
        for tile in world.grid_mut().tiles_mut() {
            tile.set_water(1.0);
        }
        let duck = world
            .spawn_creature(Species::Duck, TilePos::new(4, 4), Sex::Female)
            .unwrap();
        world
            .spawn_creature(Species::Fox, TilePos::new(4, 2), Sex::Male)
            .unwrap();
        {
            let c = world.creature_mut(duck).unwrap();
            c.activity = Some(Activity::Sleeping);
            c.tiredness = 1.0;
        }
        run(&mut world, duck);
        assert_eq!(
            world.entity(duck).unwrap().activity(),
            Some(Activity::FleeingPredator)
        );
    }

    #[test]
    fn tired_squirrel_climbs_the_nearest_tree_at_night() {
        let mut world = World::new(WorldConfig::new(10, 10, 1)).unwrap();
        let squirrel = world
            .spawn_creature(Species::Squirrel, TilePos::new(2, 2), Sex::Female)
            .unwrap();
        world.spawn_flora(Species::Tree, TilePos::new(2, 6)).unwrap();
        world.creature_mut(squirrel).unwrap().tiredness = 1.0;
        let traits = Species::Squirrel.creature_traits().unwrap();
        while world.hour_of_day() < 21.0 {
            world.advance_time();
        }
        assert!(is_sleep_time(&world, traits));

        run(&mut world, squirrel);
        world.advance_time();
        let entity = world.entity(squirrel).unwrap();
        assert_eq!(entity.activity(), Some(Activity::LookingForSleepingPlace));
        assert!(entity.creature().unwrap().position.col > 2.5);

        for _ in 0..30 {
            if world.entity(squirrel).unwrap().activity() == Some(Activity::Sleeping) {
                break;
            }
            run(&mut world, squirrel);
            world.advance_time();
        }
        let entity = world.entity(squirrel).unwrap();
        assert_eq!(entity.activity(), Some(Activity::Sleeping));
        assert_eq!(entity.tile(), TilePos::new(2, 6));
        assert!(is_sleep_time(&world, traits));
    }

    #[test]
    fn settings_parse_with_defaults() {
        let settings: BehaviorSettings = serde_yaml::from_str("prey_selection: nearest").unwrap();
        assert_eq!(settings.prey_selection, PreySelection::Nearest);
        assert_eq!(settings.wander_turn_chance, 0.05);
        let wild = BehaviorSettings {
            wander_turn_chance: 4.0,
            ..BehaviorSettings::default()
        };
        assert_eq!(wild.turn_chance(), 1.0);
    }
}
