use thiserror::Error;

use crate::entity::EntityId;
use crate::spatial::TilePos;
use crate::species::Species;
use crate::worldgen::Stage;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WorldError {
    #[error("grid dimensions must be positive (got {width}x{height})")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("tick length must be a positive number of seconds (got {0})")]
    InvalidTickLength(f64),
    #[error("cannot run the {stage} stage before the {requires} stage has completed")]
    StageOrder { stage: Stage, requires: Stage },
    #[error("entity {0} does not exist")]
    UnknownEntity(EntityId),
    #[error("tile {0} is outside the grid")]
    OutOfBounds(TilePos),
    #[error("{species} cannot be spawned as {expected}")]
    WrongCategory {
        species: Species,
        expected: &'static str,
    },
}
