//! Closed set of species and their compiled-in constant tables.
//!
//! Behavior is implemented once, generically; everything that differs between
//! species lives in [`FloraTraits`] and [`CreatureTraits`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// World seconds in one day. The clock is compressed so that daily rhythms
/// show up within a few thousand ticks.
pub const DAY_LENGTH_SECONDS: f64 = 1200.0;
pub const HOURS_PER_DAY: f64 = 24.0;

/// A tile counts as dry land at or below this much standing water.
pub const DRY_LAND_WATER: f64 = 0.05;
/// Water deep enough to swim in.
pub const SWIMMING_WATER: f64 = 0.5;

/// Shared by every creature: tiredness runs from 0 (rested) to 1 (exhausted).
pub const MAX_TIREDNESS: f64 = 1.0;
/// Need ratio below which a creature goes looking for food or water.
pub const NEED_THRESHOLD: f64 = 0.7;
/// Fraction of decomposition after which a corpse no longer counts as prey.
pub const DECOMPOSED_FRACTION: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Flora,
    Creature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Species {
    Grass,
    Bush,
    Tree,
    Seaweed,
    Rabbit,
    Squirrel,
    Deer,
    Fox,
    Wolf,
    Duck,
    Fish,
}

impl Species {
    pub const FLORA: [Species; 4] = [
        Species::Grass,
        Species::Bush,
        Species::Tree,
        Species::Seaweed,
    ];

    pub const CREATURES: [Species; 7] = [
        Species::Rabbit,
        Species::Squirrel,
        Species::Deer,
        Species::Fox,
        Species::Wolf,
        Species::Duck,
        Species::Fish,
    ];

    pub fn all() -> impl Iterator<Item = Species> {
        Self::FLORA.into_iter().chain(Self::CREATURES)
    }

    pub fn category(self) -> Category {
        match self {
            Species::Grass | Species::Bush | Species::Tree | Species::Seaweed => Category::Flora,
            _ => Category::Creature,
        }
    }

    pub fn is_flora(self) -> bool {
        self.category() == Category::Flora
    }

    pub fn is_creature(self) -> bool {
        self.category() == Category::Creature
    }

    pub fn name(self) -> &'static str {
        match self {
            Species::Grass => "grass",
            Species::Bush => "bush",
            Species::Tree => "tree",
            Species::Seaweed => "seaweed",
            Species::Rabbit => "rabbit",
            Species::Squirrel => "squirrel",
            Species::Deer => "deer",
            Species::Fox => "fox",
            Species::Wolf => "wolf",
            Species::Duck => "duck",
            Species::Fish => "fish",
        }
    }

    pub fn flora_traits(self) -> Option<&'static FloraTraits> {
        match self {
            Species::Grass => Some(&GRASS),
            Species::Bush => Some(&BUSH),
            Species::Tree => Some(&TREE),
            Species::Seaweed => Some(&SEAWEED),
            _ => None,
        }
    }

    pub fn creature_traits(self) -> Option<&'static CreatureTraits> {
        match self {
            Species::Rabbit => Some(&RABBIT),
            Species::Squirrel => Some(&SQUIRREL),
            Species::Deer => Some(&DEER),
            Species::Fox => Some(&FOX),
            Species::Wolf => Some(&WOLF),
            Species::Duck => Some(&DUCK),
            Species::Fish => Some(&FISH),
            _ => None,
        }
    }

    /// Body energy a fresh individual carries.
    pub fn max_energy(self) -> f64 {
        match (self.flora_traits(), self.creature_traits()) {
            (Some(flora), _) => flora.max_energy,
            (_, Some(creature)) => creature.max_energy,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloraTraits {
    pub max_energy: f64,
    /// Energy regained per world second.
    pub regen_rate: f64,
}

/// Where a species is willing to bed down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SleepPlace {
    DryLand,
    Tree,
    Water,
}

/// Hours of the day `[start, end)` a species sleeps; may wrap past midnight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepWindow {
    pub start_hour: f64,
    pub end_hour: f64,
}

impl SleepWindow {
    pub const fn new(start_hour: f64, end_hour: f64) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    pub fn contains(&self, hour: f64) -> bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CreatureTraits {
    /// Visibility radius in tiles.
    pub sight_range: usize,
    /// Tiles per world second.
    pub speed: f64,
    pub max_nourishment: f64,
    pub nourishment_loss: f64,
    pub max_hydration: f64,
    pub hydration_loss: f64,
    /// Tiredness gained per second awake.
    pub tiredness_gain: f64,
    /// Tiredness shed per second asleep.
    pub tiredness_recovery: f64,
    /// Enterable tiles hold water within `[min_water, max_water]`.
    pub min_water: f64,
    pub max_water: f64,
    pub sleep_place: SleepPlace,
    pub sleep_window: SleepWindow,
    pub sleeps_with_eyes_open: bool,
    pub food: &'static [Species],
    pub flees_from: &'static [Species],
    pub mating_cooldown: f64,
    pub pregnancy_duration: f64,
    pub male_probability: f64,
    pub max_energy: f64,
    /// Corpse energy lost per second.
    pub decomposition_rate: f64,
    pub lifespan: f64,
    pub puberty_age: f64,
}

impl CreatureTraits {
    pub fn can_enter_water(&self, water: f64) -> bool {
        water >= self.min_water && water <= self.max_water
    }

    pub fn eats(&self, species: Species) -> bool {
        self.food.contains(&species)
    }

    pub fn fears(&self, species: Species) -> bool {
        self.flees_from.contains(&species)
    }

    pub fn is_sleep_time(&self, hour: f64) -> bool {
        self.sleep_window.contains(hour)
    }
}

const GRASS: FloraTraits = FloraTraits {
    max_energy: 10.0,
    regen_rate: 0.01,
};

const BUSH: FloraTraits = FloraTraits {
    max_energy: 25.0,
    regen_rate: 0.01,
};

const TREE: FloraTraits = FloraTraits {
    max_energy: 120.0,
    regen_rate: 0.02,
};

const SEAWEED: FloraTraits = FloraTraits {
    max_energy: 8.0,
    regen_rate: 0.01,
};

const LAND_MAX_WATER: f64 = SWIMMING_WATER;

const RABBIT: CreatureTraits = CreatureTraits {
    sight_range: 5,
    speed: 0.4,
    max_nourishment: 60.0,
    nourishment_loss: 60.0 / 3600.0,
    max_hydration: 40.0,
    hydration_loss: 40.0 / 2400.0,
    tiredness_gain: 1.0 / 800.0,
    tiredness_recovery: 1.0 / 400.0,
    min_water: 0.0,
    max_water: LAND_MAX_WATER,
    sleep_place: SleepPlace::DryLand,
    sleep_window: SleepWindow::new(21.0, 5.0),
    sleeps_with_eyes_open: false,
    food: &[Species::Grass, Species::Bush],
    flees_from: &[Species::Fox, Species::Wolf],
    mating_cooldown: 1800.0,
    pregnancy_duration: 1200.0,
    male_probability: 0.5,
    max_energy: 40.0,
    decomposition_rate: 0.05,
    lifespan: 72_000.0,
    puberty_age: 6_000.0,
};

const SQUIRREL: CreatureTraits = CreatureTraits {
    sight_range: 4,
    speed: 0.35,
    max_nourishment: 30.0,
    nourishment_loss: 30.0 / 3000.0,
    max_hydration: 20.0,
    hydration_loss: 20.0 / 2400.0,
    tiredness_gain: 1.0 / 800.0,
    tiredness_recovery: 1.0 / 400.0,
    min_water: 0.0,
    max_water: LAND_MAX_WATER,
    sleep_place: SleepPlace::Tree,
    sleep_window: SleepWindow::new(20.0, 6.0),
    sleeps_with_eyes_open: false,
    food: &[Species::Tree, Species::Bush],
    flees_from: &[Species::Fox],
    mating_cooldown: 2400.0,
    pregnancy_duration: 1500.0,
    male_probability: 0.5,
    max_energy: 20.0,
    decomposition_rate: 0.03,
    lifespan: 90_000.0,
    puberty_age: 7_200.0,
};

const DEER: CreatureTraits = CreatureTraits {
    sight_range: 6,
    speed: 0.45,
    max_nourishment: 150.0,
    nourishment_loss: 150.0 / 4800.0,
    max_hydration: 100.0,
    hydration_loss: 100.0 / 3000.0,
    tiredness_gain: 1.0 / 900.0,
    tiredness_recovery: 1.0 / 450.0,
    min_water: 0.0,
    max_water: LAND_MAX_WATER,
    sleep_place: SleepPlace::DryLand,
    sleep_window: SleepWindow::new(22.0, 4.0),
    sleeps_with_eyes_open: false,
    food: &[Species::Grass, Species::Bush, Species::Tree],
    flees_from: &[Species::Wolf],
    mating_cooldown: 3600.0,
    pregnancy_duration: 2400.0,
    male_probability: 0.5,
    max_energy: 150.0,
    decomposition_rate: 0.1,
    lifespan: 144_000.0,
    puberty_age: 12_000.0,
};

const FOX: CreatureTraits = CreatureTraits {
    sight_range: 7,
    speed: 0.5,
    max_nourishment: 80.0,
    nourishment_loss: 80.0 / 4800.0,
    max_hydration: 50.0,
    hydration_loss: 50.0 / 3000.0,
    tiredness_gain: 1.0 / 800.0,
    tiredness_recovery: 1.0 / 400.0,
    min_water: 0.0,
    max_water: LAND_MAX_WATER,
    sleep_place: SleepPlace::DryLand,
    sleep_window: SleepWindow::new(8.0, 16.0),
    sleeps_with_eyes_open: false,
    food: &[Species::Rabbit, Species::Squirrel, Species::Duck],
    flees_from: &[Species::Wolf],
    mating_cooldown: 3000.0,
    pregnancy_duration: 1800.0,
    male_probability: 0.5,
    max_energy: 70.0,
    decomposition_rate: 0.06,
    lifespan: 108_000.0,
    puberty_age: 9_600.0,
};

const WOLF: CreatureTraits = CreatureTraits {
    sight_range: 8,
    speed: 0.55,
    max_nourishment: 140.0,
    nourishment_loss: 140.0 / 6000.0,
    max_hydration: 80.0,
    hydration_loss: 80.0 / 3600.0,
    tiredness_gain: 1.0 / 900.0,
    tiredness_recovery: 1.0 / 450.0,
    min_water: 0.0,
    max_water: LAND_MAX_WATER,
    sleep_place: SleepPlace::DryLand,
    sleep_window: SleepWindow::new(9.0, 15.0),
    sleeps_with_eyes_open: false,
    food: &[Species::Deer, Species::Rabbit, Species::Fox],
    flees_from: &[],
    mating_cooldown: 4800.0,
    pregnancy_duration: 2400.0,
    male_probability: 0.5,
    max_energy: 120.0,
    decomposition_rate: 0.08,
    lifespan: 144_000.0,
    puberty_age: 14_400.0,
};

const DUCK: CreatureTraits = CreatureTraits {
    sight_range: 6,
    speed: 0.4,
    max_nourishment: 40.0,
    nourishment_loss: 40.0 / 3600.0,
    max_hydration: 30.0,
    hydration_loss: 30.0 / 2400.0,
    tiredness_gain: 1.0 / 800.0,
    tiredness_recovery: 1.0 / 400.0,
    min_water: 0.0,
    max_water: f64::INFINITY,
    sleep_place: SleepPlace::Water,
    sleep_window: SleepWindow::new(21.0, 5.0),
    sleeps_with_eyes_open: true,
    food: &[Species::Seaweed, Species::Grass, Species::Fish],
    flees_from: &[Species::Fox],
    mating_cooldown: 2400.0,
    pregnancy_duration: 1200.0,
    male_probability: 0.5,
    max_energy: 30.0,
    decomposition_rate: 0.04,
    lifespan: 72_000.0,
    puberty_age: 6_000.0,
};

const FISH: CreatureTraits = CreatureTraits {
    sight_range: 4,
    speed: 0.3,
    max_nourishment: 25.0,
    nourishment_loss: 25.0 / 4800.0,
    max_hydration: 20.0,
    hydration_loss: 20.0 / 4800.0,
    tiredness_gain: 1.0 / 1000.0,
    tiredness_recovery: 1.0 / 500.0,
    min_water: SWIMMING_WATER,
    max_water: f64::INFINITY,
    sleep_place: SleepPlace::Water,
    sleep_window: SleepWindow::new(0.0, 6.0),
    sleeps_with_eyes_open: true,
    food: &[Species::Seaweed],
    flees_from: &[Species::Duck],
    mating_cooldown: 1800.0,
    pregnancy_duration: 900.0,
    male_probability: 0.5,
    max_energy: 15.0,
    decomposition_rate: 0.02,
    lifespan: 36_000.0,
    puberty_age: 3_600.0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_species_has_exactly_one_table() {
        for species in Species::all() {
            let flora = species.flora_traits().is_some();
            let creature = species.creature_traits().is_some();
            assert!(flora ^ creature, "{species} must have one table");
            assert_eq!(flora, species.is_flora());
            assert!(species.max_energy() > 0.0);
        }
    }

    #[test]
    fn flee_sets_mirror_food_sets() {
        for prey in Species::CREATURES {
            let traits = prey.creature_traits().unwrap();
            for predator in traits.flees_from {
                let hunter = predator.creature_traits().unwrap();
                assert!(hunter.eats(prey), "{predator} should eat {prey}");
            }
        }
        for predator in Species::CREATURES {
            let traits = predator.creature_traits().unwrap();
            for prey in traits.food.iter().filter(|s| s.is_creature()) {
                assert!(prey.creature_traits().unwrap().fears(predator));
            }
        }
    }

    #[test]
    fn creatures_starve_before_old_age() {
        for species in Species::CREATURES {
            let t = species.creature_traits().unwrap();
            let starvation = t.max_nourishment / t.nourishment_loss;
            assert!(starvation < t.lifespan, "{species}");
            assert!(t.puberty_age < t.lifespan, "{species}");
        }
    }

    #[test]
    fn steps_stay_below_one_tile_per_second() {
        for species in Species::CREATURES {
            assert!(species.creature_traits().unwrap().speed < 1.0);
        }
    }

    #[test]
    fn sleep_window_wraps_midnight() {
        let night = SleepWindow::new(21.0, 5.0);
        assert!(night.contains(23.0));
        assert!(night.contains(2.0));
        assert!(!night.contains(12.0));
        let day = SleepWindow::new(8.0, 16.0);
        assert!(day.contains(8.0));
        assert!(!day.contains(16.0));
    }

    #[test]
    fn water_bands() {
        let fish = Species::Fish.creature_traits().unwrap();
        assert!(!fish.can_enter_water(0.0));
        assert!(fish.can_enter_water(3.0));
        let rabbit = Species::Rabbit.creature_traits().unwrap();
        assert!(rabbit.can_enter_water(0.0));
        assert!(!rabbit.can_enter_water(3.0));
    }
}
