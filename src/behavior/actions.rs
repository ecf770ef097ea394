//! What a creature does once its activity is chosen.
//!
//! Every seek action follows the same shape: pick a target among the tiles in
//! sight (spiral order), act on it when within reach, otherwise step toward
//! it. No target, or a blocked step, falls back to wandering.

use rand::Rng;
use tracing::debug;

use super::movement::{can_enter, position_of, step, step_toward};
use super::needs::{die, CauseOfDeath};
use super::{BehaviorSettings, PreySelection};
use crate::entity::{Activity, EntityId, LifeState, Sex};
use crate::error::WorldError;
use crate::spatial::TilePos;
use crate::species::{CreatureTraits, SleepPlace, Species, DRY_LAND_WATER};
use crate::world::World;

/// Chebyshev distance at which food, water and partners are within reach.
const REACH: usize = 1;

/// Whether the species can bed down on `pos`.
pub fn can_sleep_in(world: &World, traits: &CreatureTraits, pos: TilePos) -> bool {
    let Some(tile) = world.tile(pos) else {
        return false;
    };
    match traits.sleep_place {
        SleepPlace::DryLand => tile.water() <= DRY_LAND_WATER,
        SleepPlace::Tree => world
            .entities_on(pos)
            .any(|entity| entity.species() == Species::Tree),
        SleepPlace::Water => tile.has_water(),
    }
}

fn tile_of(world: &World, id: EntityId) -> Result<TilePos, WorldError> {
    world
        .entity(id)
        .map(|e| e.tile())
        .ok_or(WorldError::UnknownEntity(id))
}

fn in_sight(world: &World, origin: TilePos, traits: &CreatureTraits) -> Vec<TilePos> {
    world.grid().spiral(origin, traits.sight_range)
}

/// The closest awake, living creature the species is afraid of, with the
/// tile it stands on.
pub(crate) fn find_predator(
    world: &World,
    id: EntityId,
    traits: &CreatureTraits,
) -> Result<Option<TilePos>, WorldError> {
    if traits.flees_from.is_empty() {
        return Ok(None);
    }
    let origin = tile_of(world, id)?;
    let position = position_of(world, id)?;
    let mut closest: Option<(f64, TilePos)> = None;
    for pos in in_sight(world, origin, traits) {
        for entity in world.entities_on(pos) {
            if entity.id() == id || !traits.fears(entity.species()) {
                continue;
            }
            let Some(other) = entity.creature() else {
                continue;
            };
            if !other.is_alive() || other.is_sleeping() {
                continue;
            }
            let distance = position.distance(other.position);
            if closest.map_or(true, |(best, _)| distance < best) {
                closest = Some((distance, pos));
            }
        }
    }
    Ok(closest.map(|(_, pos)| pos))
}

/// Moves to whichever neighboring tile lies farthest from the predator.
pub(crate) fn flee(
    world: &mut World,
    id: EntityId,
    traits: &CreatureTraits,
    predator: TilePos,
    dt: f64,
) -> Result<(), WorldError> {
    let origin = tile_of(world, id)?;
    let mut best: Option<(f64, TilePos)> = None;
    for pos in world.grid().spiral(origin, 1) {
        if !can_enter(world, traits, pos) {
            continue;
        }
        let distance = pos.distance(predator);
        if best.map_or(true, |(far, _)| distance > far) {
            best = Some((distance, pos));
        }
    }
    if let Some((_, target)) = best {
        if target != origin {
            step_toward(world, id, traits, target, dt)?;
        }
    }
    Ok(())
}

pub(crate) fn seek_water<R: Rng + ?Sized>(
    world: &mut World,
    id: EntityId,
    traits: &CreatureTraits,
    dt: f64,
    settings: &BehaviorSettings,
    rng: &mut R,
) -> Result<(), WorldError> {
    let origin = tile_of(world, id)?;
    let target = in_sight(world, origin, traits)
        .into_iter()
        .find(|pos| world.tile(*pos).is_some_and(|t| t.has_water()));
    let Some(target) = target else {
        return wander(world, id, traits, dt, settings, rng);
    };

    if origin.chebyshev(target) <= REACH {
        if let Some(creature) = world.creature_mut(id) {
            creature.hydration = traits.max_hydration;
            creature.activity = Some(Activity::Wandering);
        }
        return Ok(());
    }
    if !step_toward(world, id, traits, target, dt)? {
        wander(world, id, traits, dt, settings, rng)?;
    }
    Ok(())
}

/// Picks a meal among the edible entities in sight.
fn choose_prey(
    world: &World,
    id: EntityId,
    traits: &CreatureTraits,
    selection: PreySelection,
) -> Result<Option<(EntityId, TilePos)>, WorldError> {
    let origin = tile_of(world, id)?;
    let mut chosen: Option<(f64, EntityId, TilePos)> = None;
    for pos in in_sight(world, origin, traits) {
        for entity in world.entities_on(pos) {
            if entity.id() == id || !traits.eats(entity.species()) || !entity.is_edible() {
                continue;
            }
            match selection {
                PreySelection::Nearest => return Ok(Some((entity.id(), pos))),
                PreySelection::HighestEnergy => {
                    if chosen.map_or(true, |(energy, _, _)| entity.energy > energy) {
                        chosen = Some((entity.energy, entity.id(), pos));
                    }
                }
            }
        }
    }
    Ok(chosen.map(|(_, prey, pos)| (prey, pos)))
}

pub(crate) fn seek_food<R: Rng + ?Sized>(
    world: &mut World,
    id: EntityId,
    traits: &CreatureTraits,
    dt: f64,
    settings: &BehaviorSettings,
    rng: &mut R,
) -> Result<(), WorldError> {
    let Some((prey, target)) = choose_prey(world, id, traits, settings.prey_selection)? else {
        return wander(world, id, traits, dt, settings, rng);
    };
    let origin = tile_of(world, id)?;
    if origin.chebyshev(target) <= REACH {
        return eat(world, id, traits, prey);
    }
    if !step_toward(world, id, traits, target, dt)? {
        wander(world, id, traits, dt, settings, rng)?;
    }
    Ok(())
}

/// Kills living prey, then takes as much body energy as the eater still
/// needs. Prey left with no energy disappears from the grid.
pub(crate) fn eat(
    world: &mut World,
    id: EntityId,
    traits: &CreatureTraits,
    prey: EntityId,
) -> Result<(), WorldError> {
    let alive = world
        .entity(prey)
        .ok_or(WorldError::UnknownEntity(prey))?
        .life()
        == Some(LifeState::Alive);
    if alive && die(world, prey, CauseOfDeath::Eaten)? {
        world.bookkeeping.kills += 1;
        debug!(predator = %id, prey = %prey, "kill");
    }

    let hunger = world
        .creature(id)
        .map(|c| (traits.max_nourishment - c.nourishment).max(0.0))
        .ok_or(WorldError::UnknownEntity(id))?;
    let meal = world
        .entity_mut(prey)
        .ok_or(WorldError::UnknownEntity(prey))?;
    let bite = hunger.min(meal.energy);
    meal.energy -= bite;
    let finished = meal.energy <= 0.0;

    if let Some(creature) = world.creature_mut(id) {
        creature.nourishment += bite;
        creature.activity = Some(Activity::Wandering);
    }
    if finished {
        world.remove(prey);
    }
    Ok(())
}

fn ready_to_mate(world: &World, id: EntityId, traits: &CreatureTraits) -> bool {
    world.creature(id).is_some_and(|c| {
        c.is_alive()
            && c.mating_cooldown <= 0.0
            && c.age >= traits.puberty_age
            && !(c.sex == Sex::Female && c.is_pregnant())
    })
}

pub(crate) fn seek_mate<R: Rng + ?Sized>(
    world: &mut World,
    id: EntityId,
    traits: &CreatureTraits,
    dt: f64,
    settings: &BehaviorSettings,
    rng: &mut R,
) -> Result<(), WorldError> {
    let entity = world.entity(id).ok_or(WorldError::UnknownEntity(id))?;
    let species = entity.species();
    let origin = entity.tile();
    let wanted = entity
        .creature()
        .map(|c| c.sex.opposite())
        .ok_or(WorldError::UnknownEntity(id))?;

    let partner = in_sight(world, origin, traits).into_iter().find_map(|pos| {
        world
            .entities_on(pos)
            .find(|other| {
                other.id() != id
                    && other.species() == species
                    && other.creature().is_some_and(|c| c.sex == wanted)
                    && ready_to_mate(world, other.id(), traits)
            })
            .map(|other| (other.id(), pos))
    });
    let Some((partner, target)) = partner else {
        return wander(world, id, traits, dt, settings, rng);
    };

    if origin.chebyshev(target) <= REACH {
        return mate(world, id, partner, traits);
    }
    if !step_toward(world, id, traits, target, dt)? {
        wander(world, id, traits, dt, settings, rng)?;
    }
    Ok(())
}

/// The female of the pair becomes pregnant; both go back to wandering and
/// wait out the cooldown.
pub(crate) fn mate(
    world: &mut World,
    id: EntityId,
    partner: EntityId,
    traits: &CreatureTraits,
) -> Result<(), WorldError> {
    for member in [id, partner] {
        let creature = world
            .creature_mut(member)
            .ok_or(WorldError::UnknownEntity(member))?;
        if creature.sex == Sex::Female {
            creature.pregnancy = Some(traits.pregnancy_duration);
        }
        creature.mating_cooldown = traits.mating_cooldown;
        creature.activity = Some(Activity::Wandering);
    }
    debug!(a = %id, b = %partner, "mated");
    Ok(())
}

pub(crate) fn seek_sleeping_place<R: Rng + ?Sized>(
    world: &mut World,
    id: EntityId,
    traits: &CreatureTraits,
    dt: f64,
    settings: &BehaviorSettings,
    rng: &mut R,
) -> Result<(), WorldError> {
    let origin = tile_of(world, id)?;
    let position = position_of(world, id)?;
    let mut nearest: Option<(f64, TilePos)> = None;
    for pos in in_sight(world, origin, traits) {
        if !can_sleep_in(world, traits, pos) || !can_enter(world, traits, pos) {
            continue;
        }
        let (row, col) = pos.center();
        let distance = (row - position.row).hypot(col - position.col);
        if nearest.map_or(true, |(best, _)| distance < best) {
            nearest = Some((distance, pos));
        }
    }
    let Some((_, target)) = nearest else {
        return wander(world, id, traits, dt, settings, rng);
    };

    if target == origin {
        if let Some(creature) = world.creature_mut(id) {
            creature.activity = Some(Activity::Sleeping);
            creature.heading = None;
        }
        return Ok(());
    }
    if !step_toward(world, id, traits, target, dt)? {
        wander(world, id, traits, dt, settings, rng)?;
    }
    Ok(())
}

/// Keeps the current heading unless it is blocked or a random turn fires;
/// otherwise heads for a random enterable neighbor.
pub(crate) fn wander<R: Rng + ?Sized>(
    world: &mut World,
    id: EntityId,
    traits: &CreatureTraits,
    dt: f64,
    settings: &BehaviorSettings,
    rng: &mut R,
) -> Result<(), WorldError> {
    let heading = world
        .creature(id)
        .ok_or(WorldError::UnknownEntity(id))?
        .heading;
    if let Some(angle) = heading {
        if !rng.gen_bool(settings.turn_chance()) && step(world, id, traits, angle, dt)? {
            return Ok(());
        }
    }

    let origin = tile_of(world, id)?;
    let options: Vec<TilePos> = world
        .grid()
        .ring(origin, 1)
        .into_iter()
        .filter(|pos| can_enter(world, traits, *pos))
        .collect();
    if options.is_empty() {
        if let Some(creature) = world.creature_mut(id) {
            creature.heading = None;
        }
        return Ok(());
    }

    let target = options[rng.gen_range(0..options.len())];
    let angle = position_of(world, id)?.angle_to(target);
    if let Some(creature) = world.creature_mut(id) {
        creature.heading = Some(angle);
    }
    step(world, id, traits, angle, dt)?;
    Ok(())
}
