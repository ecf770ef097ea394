//! Continuous-position stepping with tile re-parenting.

use crate::entity::{EntityId, Position};
use crate::error::WorldError;
use crate::spatial::TilePos;
use crate::species::CreatureTraits;
use crate::world::World;

/// Whether the species may stand on `pos`: in bounds and the tile's water is
/// inside the species' band.
pub fn can_enter(world: &World, traits: &CreatureTraits, pos: TilePos) -> bool {
    world
        .tile(pos)
        .is_some_and(|tile| traits.can_enter_water(tile.water()))
}

pub(crate) fn position_of(world: &World, id: EntityId) -> Result<Position, WorldError> {
    world
        .creature(id)
        .map(|c| c.position)
        .ok_or(WorldError::UnknownEntity(id))
}

/// Advances `speed * dt` along `angle`. Fails without side effects when the
/// destination tile cannot be entered.
pub(crate) fn step(
    world: &mut World,
    id: EntityId,
    traits: &CreatureTraits,
    angle: f64,
    dt: f64,
) -> Result<bool, WorldError> {
    let next = position_of(world, id)?.advanced(angle, traits.speed * dt);
    let Some(tile) = next.tile() else {
        return Ok(false);
    };
    if !can_enter(world, traits, tile) {
        return Ok(false);
    }
    if let Some(creature) = world.creature_mut(id) {
        creature.position = next;
    }
    world.relocate(id, tile)?;
    Ok(true)
}

/// Greedy step toward the center of `target`.
pub(crate) fn step_toward(
    world: &mut World,
    id: EntityId,
    traits: &CreatureTraits,
    target: TilePos,
    dt: f64,
) -> Result<bool, WorldError> {
    let angle = position_of(world, id)?.angle_to(target);
    step(world, id, traits, angle, dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::entity::Sex;
    use crate::species::Species;

    fn world() -> World {
        World::new(WorldConfig::new(6, 6, 1)).unwrap()
    }

    #[test]
    fn crossing_a_boundary_reparents() {
        let mut world = world();
        let start = TilePos::new(2, 2);
        let id = world.spawn_creature(Species::Wolf, start, Sex::Male).unwrap();
        let traits = Species::Wolf.creature_traits().unwrap();
        let mut moved_to = start;
        for _ in 0..3 {
            assert!(step_toward(&mut world, id, traits, TilePos::new(2, 5), 1.0).unwrap());
            moved_to = world.entity(id).unwrap().tile();
        }
        assert_ne!(moved_to, start);
        assert!(!world.tile(start).unwrap().contains(id));
        assert!(world.tile(moved_to).unwrap().contains(id));
        let position = world.creature(id).unwrap().position;
        assert_eq!(position.tile(), Some(moved_to));
    }

    #[test]
    fn blocked_step_leaves_creature_in_place() {
        let mut world = world();
        world.tile_mut(TilePos::new(2, 3)).unwrap().set_water(3.0);
        let id = world
            .spawn_creature(Species::Rabbit, TilePos::new(2, 2), Sex::Female)
            .unwrap();
        let traits = Species::Rabbit.creature_traits().unwrap();
        if let Some(c) = world.creature_mut(id) {
            c.position = Position::new(2.5, 2.9);
        }
        let before = world.creature(id).unwrap().position;
        assert!(!step(&mut world, id, traits, 0.0, 1.0).unwrap());
        assert_eq!(world.creature(id).unwrap().position, before);
        assert_eq!(world.entity(id).unwrap().tile(), TilePos::new(2, 2));
    }

    #[test]
    fn edge_of_the_grid_blocks() {
        let mut world = world();
        let id = world
            .spawn_creature(Species::Fox, TilePos::new(0, 0), Sex::Male)
            .unwrap();
        let traits = Species::Fox.creature_traits().unwrap();
        if let Some(c) = world.creature_mut(id) {
            c.position = Position::new(0.1, 0.1);
        }
        let west = std::f64::consts::PI;
        assert!(!step(&mut world, id, traits, west, 1.0).unwrap());
    }
}
