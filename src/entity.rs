//! Entities: flora and creatures sharing an identity, a tile and body energy.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::spatial::TilePos;
use crate::species::{CreatureTraits, Species, MAX_TIREDNESS};

/// Stable arena handle. Never reused within a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn opposite(self) -> Sex {
        match self {
            Sex::Male => Sex::Female,
            Sex::Female => Sex::Male,
        }
    }
}

/// Ordered so that `a < b` means `b` comes later in the life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LifeState {
    Alive,
    Dead,
    Decomposed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Activity {
    Wandering,
    LookingForFood,
    LookingForWater,
    LookingForMate,
    LookingForSleepingPlace,
    Sleeping,
    FleeingPredator,
}

/// Continuous position in tile units; the containing tile is the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub row: f64,
    pub col: f64,
}

impl Position {
    pub fn new(row: f64, col: f64) -> Self {
        Self { row, col }
    }

    pub fn center_of(tile: TilePos) -> Self {
        let (row, col) = tile.center();
        Self { row, col }
    }

    /// Containing tile, or `None` when the position has left the grid on the
    /// negative side.
    pub fn tile(self) -> Option<TilePos> {
        if self.row < 0.0 || self.col < 0.0 || !self.row.is_finite() || !self.col.is_finite() {
            return None;
        }
        Some(TilePos::new(self.row.floor() as usize, self.col.floor() as usize))
    }

    pub fn distance(self, other: Position) -> f64 {
        let dr = self.row - other.row;
        let dc = self.col - other.col;
        (dr * dr + dc * dc).sqrt()
    }

    /// Angle toward a tile's center, via atan2 of the row/col delta.
    pub fn angle_to(self, tile: TilePos) -> f64 {
        let (row, col) = tile.center();
        (row - self.row).atan2(col - self.col)
    }

    pub fn advanced(self, angle: f64, length: f64) -> Position {
        Position {
            row: self.row + angle.sin() * length,
            col: self.col + angle.cos() * length,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub sex: Sex,
    life: LifeState,
    /// `None` once dead.
    pub activity: Option<Activity>,
    pub hydration: f64,
    pub nourishment: f64,
    pub tiredness: f64,
    /// Fraction of the body decayed since death.
    pub decomposition: f64,
    /// Seconds until birth, when pregnant.
    pub pregnancy: Option<f64>,
    /// Seconds until mating is possible again.
    pub mating_cooldown: f64,
    pub age: f64,
    pub position: Position,
    /// Current wandering direction in radians.
    pub heading: Option<f64>,
}

impl Creature {
    /// A fresh, fully satisfied individual.
    pub fn new(traits: &CreatureTraits, sex: Sex, age: f64, position: Position) -> Self {
        Self {
            sex,
            life: LifeState::Alive,
            activity: Some(Activity::Wandering),
            hydration: traits.max_hydration,
            nourishment: traits.max_nourishment,
            tiredness: 0.0,
            decomposition: 0.0,
            pregnancy: None,
            mating_cooldown: 0.0,
            age,
            position,
            heading: None,
        }
    }

    pub fn life(&self) -> LifeState {
        self.life
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    pub fn is_sleeping(&self) -> bool {
        self.activity == Some(Activity::Sleeping)
    }

    pub fn is_pregnant(&self) -> bool {
        self.pregnancy.is_some()
    }

    pub fn nourishment_ratio(&self, traits: &CreatureTraits) -> f64 {
        self.nourishment / traits.max_nourishment
    }

    pub fn hydration_ratio(&self, traits: &CreatureTraits) -> f64 {
        self.hydration / traits.max_hydration
    }

    pub fn is_exhausted(&self) -> bool {
        self.tiredness >= MAX_TIREDNESS
    }

    /// Moves the life cycle forward. Requests to go backwards are ignored.
    pub(crate) fn advance_life(&mut self, next: LifeState) -> bool {
        if next > self.life {
            self.life = next;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Body {
    Flora,
    Creature(Creature),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    species: Species,
    tile: TilePos,
    /// Nutritional value yielded when eaten.
    pub energy: f64,
    pub body: Body,
}

impl Entity {
    pub(crate) fn new_flora(id: EntityId, species: Species, tile: TilePos) -> Self {
        Self {
            id,
            species,
            tile,
            energy: species.max_energy(),
            body: Body::Flora,
        }
    }

    pub(crate) fn new_creature(
        id: EntityId,
        species: Species,
        tile: TilePos,
        creature: Creature,
    ) -> Self {
        Self {
            id,
            species,
            tile,
            energy: species.max_energy(),
            body: Body::Creature(creature),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn species(&self) -> Species {
        self.species
    }

    pub fn tile(&self) -> TilePos {
        self.tile
    }

    pub(crate) fn set_tile(&mut self, tile: TilePos) {
        self.tile = tile;
    }

    pub fn max_energy(&self) -> f64 {
        self.species.max_energy()
    }

    pub fn creature(&self) -> Option<&Creature> {
        match &self.body {
            Body::Creature(creature) => Some(creature),
            Body::Flora => None,
        }
    }

    pub fn creature_mut(&mut self) -> Option<&mut Creature> {
        match &mut self.body {
            Body::Creature(creature) => Some(creature),
            Body::Flora => None,
        }
    }

    pub fn life(&self) -> Option<LifeState> {
        self.creature().map(Creature::life)
    }

    pub fn activity(&self) -> Option<Activity> {
        self.creature().and_then(|c| c.activity)
    }

    /// Whether a consumer may pick this entity as a meal: flora, living
    /// creatures and fresh corpses with energy left.
    pub fn is_edible(&self) -> bool {
        self.energy > 0.0
            && match &self.body {
                Body::Flora => true,
                Body::Creature(creature) => creature.life() != LifeState::Decomposed,
            }
    }

    /// Flora regrowth. Returns `false` for creatures, which never regrow.
    pub fn regenerate(&mut self, dt: f64) -> bool {
        let Some(traits) = self.species.flora_traits() else {
            return false;
        };
        self.energy = (self.energy + traits.regen_rate * dt).min(traits.max_energy);
        true
    }
}
