use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::config::WorldConfig;
use crate::entity::{Creature, Entity, EntityId, LifeState, Position, Sex};
use crate::error::WorldError;
use crate::noise_field::NoiseField;
use crate::spatial::{Tile, TileGrid, TilePos};
use crate::species::{Category, Species, DAY_LENGTH_SECONDS, HOURS_PER_DAY};
use crate::worldgen::{update_clouds, Stage};

/// Running totals kept by the behavior engine and read by bookkeeping.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct BookkeepingState {
    pub births: u64,
    pub deaths: u64,
    pub kills: u64,
    pub removals: u64,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpeciesCount {
    pub alive: u64,
    pub dead: u64,
    pub decomposed: u64,
}

impl SpeciesCount {
    pub fn total(&self) -> u64 {
        self.alive + self.dead + self.decomposed
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Census {
    pub species: BTreeMap<Species, SpeciesCount>,
}

impl Census {
    pub fn count(&self, species: Species) -> SpeciesCount {
        self.species.get(&species).copied().unwrap_or_default()
    }

    pub fn alive(&self, species: Species) -> u64 {
        self.count(species).alive
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorldSnapshot {
    pub scenario: String,
    pub tick: u64,
    pub elapsed_seconds: f64,
    pub width: usize,
    pub height: usize,
    pub entity_count: usize,
    pub census: Census,
    pub bookkeeping: BookkeepingState,
}

/// The grid, the entity arena and the world clock.
///
/// Entities live in the arena keyed by [`EntityId`]; a tile only stores
/// handles and an entity only stores its tile's coordinates.
pub struct World {
    config: WorldConfig,
    grid: TileGrid,
    next_entity: u64,
    tick: u64,
    elapsed_seconds: f64,
    pub(crate) entities: HashMap<EntityId, Entity>,
    pub(crate) completed_stage: Option<Stage>,
    pub(crate) weather: Option<NoiseField>,
    pub(crate) bookkeeping: BookkeepingState,
}

impl World {
    /// An empty world: flat grid, no water, no entities, no stages run.
    pub fn new(config: WorldConfig) -> Result<Self, WorldError> {
        config.validate()?;
        let grid = TileGrid::new(config.width as usize, config.height as usize);
        Ok(Self {
            config,
            grid,
            next_entity: 0,
            tick: 0,
            elapsed_seconds: 0.0,
            entities: HashMap::new(),
            completed_stage: None,
            weather: None,
            bookkeeping: BookkeepingState::default(),
        })
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub(crate) fn grid_mut(&mut self) -> &mut TileGrid {
        &mut self.grid
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn tile(&self, pos: TilePos) -> Option<&Tile> {
        self.grid.get(pos)
    }

    pub fn tile_at(&self, row: i64, col: i64) -> Option<&Tile> {
        self.grid.at(row, col)
    }

    /// Direct access to a tile's physical attributes, for hand-built
    /// scenarios. Entity membership stays owned by the world.
    pub fn tile_mut(&mut self, pos: TilePos) -> Option<&mut Tile> {
        self.grid.get_mut(pos)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.grid.tiles()
    }

    /// The highest generation stage that has completed, if any.
    pub fn completed_stage(&self) -> Option<Stage> {
        self.completed_stage
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn dt_seconds(&self) -> f64 {
        self.config.tick_seconds
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Hour of the simulated day, in `[0, 24)`.
    pub fn hour_of_day(&self) -> f64 {
        (self.elapsed_seconds % DAY_LENGTH_SECONDS) / DAY_LENGTH_SECONDS * HOURS_PER_DAY
    }

    pub fn advance_time(&mut self) {
        self.tick += 1;
        self.elapsed_seconds += self.config.tick_seconds;
    }

    /// Moves the cloud layer to world time `seconds`. No effect before the
    /// weather stage has run.
    pub fn update_weather(&mut self, seconds: f64) -> bool {
        match &self.weather {
            Some(field) => {
                update_clouds(&mut self.grid, field, seconds);
                true
            }
            None => false,
        }
    }

    pub fn bookkeeping(&self) -> &BookkeepingState {
        &self.bookkeeping
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn creature(&self, id: EntityId) -> Option<&Creature> {
        self.entities.get(&id).and_then(Entity::creature)
    }

    pub fn creature_mut(&mut self, id: EntityId) -> Option<&mut Creature> {
        self.entities.get_mut(&id).and_then(Entity::creature_mut)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// All entity handles, in creation order.
    pub fn entity_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.entities.keys().copied().collect();
        ids.sort();
        ids
    }

    pub fn ids_in(&self, category: Category) -> Vec<EntityId> {
        let mut ids: Vec<_> = self
            .entities
            .values()
            .filter(|e| e.species().category() == category)
            .map(Entity::id)
            .collect();
        ids.sort();
        ids
    }

    pub fn ids_of(&self, species: Species) -> Vec<EntityId> {
        let mut ids: Vec<_> = self
            .entities
            .values()
            .filter(|e| e.species() == species)
            .map(Entity::id)
            .collect();
        ids.sort();
        ids
    }

    pub fn entities_on(&self, pos: TilePos) -> impl Iterator<Item = &Entity> {
        self.grid
            .get(pos)
            .map(Tile::entities)
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.entities.get(id))
    }

    /// Places a fully grown plant on a tile.
    pub fn spawn_flora(&mut self, species: Species, pos: TilePos) -> Result<EntityId, WorldError> {
        if !species.is_flora() {
            return Err(WorldError::WrongCategory {
                species,
                expected: "flora",
            });
        }
        self.ensure_in_bounds(pos)?;
        let id = self.allocate();
        self.insert(Entity::new_flora(id, species, pos));
        Ok(id)
    }

    /// Places an adult creature at the center of a tile.
    pub fn spawn_creature(
        &mut self,
        species: Species,
        pos: TilePos,
        sex: Sex,
    ) -> Result<EntityId, WorldError> {
        let traits = species
            .creature_traits()
            .ok_or(WorldError::WrongCategory {
                species,
                expected: "a creature",
            })?;
        self.spawn_creature_aged(species, pos, sex, traits.puberty_age)
    }

    pub(crate) fn spawn_creature_aged(
        &mut self,
        species: Species,
        pos: TilePos,
        sex: Sex,
        age: f64,
    ) -> Result<EntityId, WorldError> {
        let traits = species
            .creature_traits()
            .ok_or(WorldError::WrongCategory {
                species,
                expected: "a creature",
            })?;
        self.ensure_in_bounds(pos)?;
        let id = self.allocate();
        let creature = Creature::new(traits, sex, age, Position::center_of(pos));
        self.insert(Entity::new_creature(id, species, pos, creature));
        Ok(id)
    }

    /// Re-parents an entity: off the old tile, onto the new one, and the
    /// entity's own reference updated, in one step.
    pub(crate) fn relocate(&mut self, id: EntityId, to: TilePos) -> Result<(), WorldError> {
        self.ensure_in_bounds(to)?;
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(WorldError::UnknownEntity(id))?;
        let from = entity.tile();
        if from == to {
            return Ok(());
        }
        entity.set_tile(to);
        if let Some(tile) = self.grid.get_mut(from) {
            tile.remove(id);
        }
        if let Some(tile) = self.grid.get_mut(to) {
            tile.insert(id);
        }
        Ok(())
    }

    /// Drops an entity from the arena and from its tile.
    pub(crate) fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        if let Some(tile) = self.grid.get_mut(entity.tile()) {
            tile.remove(id);
        }
        self.bookkeeping.removals += 1;
        debug!(entity = %id, species = %entity.species(), "entity removed");
        Some(entity)
    }

    /// Removes every entity of a category; used when a population stage is
    /// rebuilt.
    pub(crate) fn clear_category(&mut self, category: Category) {
        for id in self.ids_in(category) {
            if let Some(entity) = self.entities.remove(&id) {
                if let Some(tile) = self.grid.get_mut(entity.tile()) {
                    tile.remove(id);
                }
            }
        }
    }

    pub(crate) fn clear_entities(&mut self) {
        self.entities.clear();
        for tile in self.grid.tiles_mut() {
            tile.clear_entities();
        }
    }

    pub fn census(&self) -> Census {
        let mut census = Census::default();
        for entity in self.entities.values() {
            let count = census.species.entry(entity.species()).or_default();
            match entity.life() {
                None | Some(LifeState::Alive) => count.alive += 1,
                Some(LifeState::Dead) => count.dead += 1,
                Some(LifeState::Decomposed) => count.decomposed += 1,
            }
        }
        census
    }

    pub fn living_creatures(&self) -> u64 {
        self.entities
            .values()
            .filter(|e| e.life() == Some(LifeState::Alive))
            .count() as u64
    }

    pub fn snapshot(&self, scenario: &str) -> WorldSnapshot {
        WorldSnapshot {
            scenario: scenario.to_string(),
            tick: self.tick,
            elapsed_seconds: self.elapsed_seconds,
            width: self.width(),
            height: self.height(),
            entity_count: self.entities.len(),
            census: self.census(),
            bookkeeping: self.bookkeeping.clone(),
        }
    }

    fn ensure_in_bounds(&self, pos: TilePos) -> Result<(), WorldError> {
        if self.grid.get(pos).is_some() {
            Ok(())
        } else {
            Err(WorldError::OutOfBounds(pos))
        }
    }

    fn insert(&mut self, entity: Entity) {
        let id = entity.id();
        if let Some(tile) = self.grid.get_mut(entity.tile()) {
            tile.insert(id);
        }
        self.entities.insert(id, entity);
    }

    fn allocate(&mut self) -> EntityId {
        let id = EntityId::from_raw(self.next_entity);
        self.next_entity += 1;
        id
    }
}
