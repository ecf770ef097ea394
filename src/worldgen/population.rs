use rand::Rng;

use crate::entity::Sex;
use crate::error::WorldError;
use crate::noise_field::{NoiseConfig, NoiseField};
use crate::rng::noise_seed;
use crate::spatial::{Tile, TilePos};
use crate::species::{Species, DRY_LAND_WATER, SWIMMING_WATER};
use crate::world::World;

const OFFSET_NOISE: NoiseConfig = NoiseConfig::new(2, 0.1);
const OFFSET_STRENGTH: f64 = 2.0;

/// Water a tile must (or must not) hold for a species to be placed there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Habitat {
    DryLand,
    /// Any standing water at all.
    Wetland,
    OpenWater,
}

impl Habitat {
    pub fn admits(self, tile: &Tile) -> bool {
        match self {
            Habitat::DryLand => tile.water <= DRY_LAND_WATER,
            Habitat::Wetland => tile.has_water(),
            Habitat::OpenWater => tile.water >= SWIMMING_WATER,
        }
    }
}

/// Placement for one species: a tile is populated when
/// `noise + saturation_weight * saturation` exceeds `threshold` and the
/// habitat admits it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementRule {
    pub species: Species,
    pub noise: NoiseConfig,
    pub threshold: f64,
    pub saturation_weight: f64,
    pub habitat: Habitat,
}

const fn rule(
    species: Species,
    noise: NoiseConfig,
    threshold: f64,
    saturation_weight: f64,
    habitat: Habitat,
) -> PlacementRule {
    PlacementRule {
        species,
        noise,
        threshold,
        saturation_weight,
        habitat,
    }
}

pub const FLORA_RULES: [PlacementRule; 4] = [
    rule(Species::Grass, NoiseConfig::new(3, 0.1), 0.0, 0.6, Habitat::DryLand),
    rule(Species::Bush, NoiseConfig::new(3, 0.08), 0.25, 0.4, Habitat::DryLand),
    rule(Species::Tree, NoiseConfig::new(4, 0.05), 0.35, 0.5, Habitat::DryLand),
    rule(Species::Seaweed, NoiseConfig::new(2, 0.15), -0.2, 0.0, Habitat::OpenWater),
];

pub const FAUNA_RULES: [PlacementRule; 7] = [
    rule(Species::Rabbit, NoiseConfig::new(2, 0.2), 0.5, 0.3, Habitat::DryLand),
    rule(Species::Squirrel, NoiseConfig::new(2, 0.2), 0.55, 0.2, Habitat::DryLand),
    rule(Species::Deer, NoiseConfig::new(2, 0.15), 0.6, 0.2, Habitat::DryLand),
    rule(Species::Fox, NoiseConfig::new(2, 0.15), 0.65, 0.1, Habitat::DryLand),
    rule(Species::Wolf, NoiseConfig::new(2, 0.12), 0.75, 0.0, Habitat::DryLand),
    rule(Species::Duck, NoiseConfig::new(2, 0.2), 0.45, 0.0, Habitat::Wetland),
    rule(Species::Fish, NoiseConfig::new(2, 0.25), 0.4, 0.0, Habitat::OpenWater),
];

/// Runs one placement rule over the whole grid, in row-major order.
pub(crate) fn populate<R: Rng + ?Sized>(
    world: &mut World,
    rule: PlacementRule,
    rng: &mut R,
) -> Result<usize, WorldError> {
    let field = NoiseField::new(noise_seed(rng), rule.noise);
    let offset_row = NoiseField::new(noise_seed(rng), OFFSET_NOISE);
    let offset_col = NoiseField::new(noise_seed(rng), OFFSET_NOISE);

    let chosen: Vec<TilePos> = world
        .tiles()
        .filter(|tile| rule.habitat.admits(tile))
        .filter(|tile| {
            let pos = tile.pos();
            let (x, y) = (pos.col as f64, pos.row as f64);
            let wx = x + OFFSET_STRENGTH * offset_col.sample_2d(x, y);
            let wy = y + OFFSET_STRENGTH * offset_row.sample_2d(x, y);
            let value = field.sample_2d(wx, wy) + rule.saturation_weight * tile.saturation;
            value > rule.threshold
        })
        .map(Tile::pos)
        .collect();

    match rule.species.creature_traits() {
        Some(traits) => {
            for &pos in &chosen {
                let sex = if rng.gen_bool(traits.male_probability) {
                    Sex::Male
                } else {
                    Sex::Female
                };
                world.spawn_creature(rule.species, pos, sex)?;
            }
        }
        None => {
            for &pos in &chosen {
                world.spawn_flora(rule.species, pos)?;
            }
        }
    }
    Ok(chosen.len())
}
