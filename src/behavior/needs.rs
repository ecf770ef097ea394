//! Need decay, death, decomposition and birth.

use rand::Rng;
use tracing::debug;

use crate::entity::{Activity, EntityId, LifeState, Sex};
use crate::error::WorldError;
use crate::species::{CreatureTraits, DECOMPOSED_FRACTION, MAX_TIREDNESS};
use crate::world::World;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CauseOfDeath {
    Starvation,
    Thirst,
    OldAge,
    Eaten,
}

impl CauseOfDeath {
    fn label(self) -> &'static str {
        match self {
            CauseOfDeath::Starvation => "starvation",
            CauseOfDeath::Thirst => "thirst",
            CauseOfDeath::OldAge => "old age",
            CauseOfDeath::Eaten => "eaten",
        }
    }
}

/// What the need update left for the rest of the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NeedOutcome {
    Alive,
    Died(CauseOfDeath),
}

/// Applies one tick of need decay to a living creature.
///
/// Hydration and nourishment drain first and kill on reaching zero. Tiredness
/// recovers while asleep and builds otherwise; the mating cooldown only runs
/// while awake. Pregnancy counts down regardless and ends in a birth.
pub(crate) fn update_needs<R: Rng + ?Sized>(
    world: &mut World,
    id: EntityId,
    traits: &CreatureTraits,
    dt: f64,
    rng: &mut R,
) -> Result<NeedOutcome, WorldError> {
    let creature = world
        .creature_mut(id)
        .ok_or(WorldError::UnknownEntity(id))?;

    creature.hydration -= traits.hydration_loss * dt;
    creature.nourishment -= traits.nourishment_loss * dt;
    let cause = if creature.nourishment <= 0.0 {
        Some(CauseOfDeath::Starvation)
    } else if creature.hydration <= 0.0 {
        Some(CauseOfDeath::Thirst)
    } else {
        creature.age += dt;
        (creature.age > traits.lifespan).then_some(CauseOfDeath::OldAge)
    };
    if let Some(cause) = cause {
        die(world, id, cause)?;
        return Ok(NeedOutcome::Died(cause));
    }

    if creature.is_sleeping() {
        creature.tiredness = (creature.tiredness - traits.tiredness_recovery * dt).max(0.0);
    } else {
        creature.tiredness = (creature.tiredness + traits.tiredness_gain * dt).min(MAX_TIREDNESS);
        creature.mating_cooldown = (creature.mating_cooldown - dt).max(0.0);
    }

    let mut due = false;
    if let Some(remaining) = creature.pregnancy {
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            creature.pregnancy = None;
            creature.activity = Some(Activity::Wandering);
            due = true;
        } else {
            creature.pregnancy = Some(remaining);
        }
    }
    if due {
        give_birth(world, id, traits, rng)?;
    }
    Ok(NeedOutcome::Alive)
}

/// Spawns one newborn of the parent's species on the parent's tile.
pub fn give_birth<R: Rng + ?Sized>(
    world: &mut World,
    parent: EntityId,
    traits: &CreatureTraits,
    rng: &mut R,
) -> Result<EntityId, WorldError> {
    let entity = world.entity(parent).ok_or(WorldError::UnknownEntity(parent))?;
    let species = entity.species();
    let tile = entity.tile();
    let position = entity
        .creature()
        .map(|c| c.position)
        .ok_or(WorldError::UnknownEntity(parent))?;

    let sex = if rng.gen_bool(traits.male_probability) {
        Sex::Male
    } else {
        Sex::Female
    };
    let child = world.spawn_creature_aged(species, tile, sex, 0.0)?;
    if let Some(creature) = world.creature_mut(child) {
        creature.position = position;
    }
    world.bookkeeping.births += 1;
    debug!(parent = %parent, child = %child, %species, %tile, "birth");
    Ok(child)
}

/// Kills a living creature. Leftover nourishment becomes body energy so the
/// corpse stays edible. No effect on a creature that is already dead.
pub fn die(world: &mut World, id: EntityId, cause: CauseOfDeath) -> Result<bool, WorldError> {
    let entity = world
        .entity_mut(id)
        .ok_or(WorldError::UnknownEntity(id))?;
    let species = entity.species();
    let Some(creature) = entity.creature_mut() else {
        return Ok(false);
    };
    if !creature.advance_life(LifeState::Dead) {
        return Ok(false);
    }
    let leftover = creature.nourishment.max(0.0);
    creature.nourishment = 0.0;
    creature.activity = None;
    creature.heading = None;
    creature.pregnancy = None;
    entity.energy += leftover;

    world.bookkeeping.deaths += 1;
    debug!(entity = %id, %species, cause = cause.label(), "death");
    Ok(true)
}

/// One tick of decay for a corpse. Returns `true` when the corpse was used up
/// and removed from the grid.
pub(crate) fn decompose(
    world: &mut World,
    id: EntityId,
    traits: &CreatureTraits,
    dt: f64,
) -> Result<bool, WorldError> {
    let entity = world
        .entity_mut(id)
        .ok_or(WorldError::UnknownEntity(id))?;
    let loss = traits.decomposition_rate * dt;
    entity.energy = (entity.energy - loss).max(0.0);
    let exhausted = entity.energy <= 0.0;
    if let Some(creature) = entity.creature_mut() {
        creature.decomposition += loss / traits.max_energy;
        if creature.decomposition > DECOMPOSED_FRACTION {
            creature.advance_life(LifeState::Decomposed);
        }
    }
    if exhausted {
        world.remove(id);
    }
    Ok(exhausted)
}
