mod bookkeeping;
mod fauna;
mod flora;
mod weather;

pub use bookkeeping::BookkeepingSystem;
pub use fauna::FaunaSystem;
pub use flora::FloraSystem;
pub use weather::WeatherSystem;

use crate::rng::SystemId;

pub const WEATHER_SYSTEM: SystemId = 1;
pub const FLORA_SYSTEM: SystemId = 2;
pub const FAUNA_SYSTEM: SystemId = 3;
pub const BOOKKEEPING_SYSTEM: SystemId = 4;
