//! Agent-based ecosystem simulation on a tile grid.
//!
//! A [`World`] is generated in stages (terrain, weather, water, plants,
//! animals) from a single seed, then advanced one tick at a time by an
//! [`Engine`] running its systems in order.

pub mod behavior;
pub mod config;
pub mod engine;
pub mod entity;
pub mod error;
pub mod noise_field;
pub mod rng;
pub mod scenario;
pub mod snapshot;
pub mod spatial;
pub mod species;
pub mod systems;
pub mod world;
pub mod worldgen;

pub use behavior::{BehaviorSettings, PreySelection};
pub use config::WorldConfig;
pub use engine::{Engine, EngineBuilder, EngineError, EngineSettings, TickSummary};
pub use entity::{Activity, EntityId, LifeState, Sex};
pub use error::WorldError;
pub use scenario::{Scenario, ScenarioLoader};
pub use spatial::{Tile, TilePos};
pub use species::Species;
pub use world::{Census, World};
pub use worldgen::Stage;
