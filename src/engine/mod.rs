use std::path::PathBuf;
use std::time::Instant;

use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::trace;

use crate::{
    behavior::BehaviorSettings,
    error::WorldError,
    rng::{RngManager, SystemId},
    snapshot::{SnapshotError, SnapshotWriter},
    systems::{BookkeepingSystem, FaunaSystem, FloraSystem, WeatherSystem},
    world::World,
};

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}

#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub scenario_name: String,
    pub seed: u64,
    /// 0 disables snapshots.
    pub snapshot_interval_ticks: u64,
    pub snapshot_dir: PathBuf,
    /// Ticks between census log lines; 0 disables them.
    pub census_interval_ticks: u64,
    pub behavior: BehaviorSettings,
}

impl EngineSettings {
    pub fn new(scenario_name: impl Into<String>, seed: u64) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            seed,
            snapshot_interval_ticks: 0,
            snapshot_dir: PathBuf::from("snapshots"),
            census_interval_ticks: 100,
            behavior: BehaviorSettings::default(),
        }
    }
}

pub struct EngineBuilder {
    settings: EngineSettings,
    systems: Vec<Box<dyn System>>,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            systems: Vec::new(),
        }
    }

    pub fn with_system(mut self, system: impl System + 'static) -> Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            rng: RngManager::new(self.settings.seed),
            systems: self.systems,
            snapshot_writer: SnapshotWriter::new(
                &self.settings.snapshot_dir,
                self.settings.snapshot_interval_ticks,
            ),
            settings: self.settings,
        }
    }
}

pub struct Engine {
    rng: RngManager,
    systems: Vec<Box<dyn System>>,
    snapshot_writer: SnapshotWriter,
    settings: EngineSettings,
}

impl Engine {
    /// Weather, flora, fauna and bookkeeping, in that order.
    pub fn with_default_systems(settings: EngineSettings) -> Self {
        let behavior = settings.behavior.clone();
        let census_interval = settings.census_interval_ticks;
        EngineBuilder::new(settings)
            .with_system(WeatherSystem::new())
            .with_system(FloraSystem::new())
            .with_system(FaunaSystem::new(behavior))
            .with_system(BookkeepingSystem::new(census_interval))
            .build()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn system_names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    /// Advances the world by exactly one tick.
    pub fn step(&mut self, world: &mut World) -> Result<TickSummary, EngineError> {
        self.rng.advance_tick();
        let ctx = SystemContext {
            tick: world.tick(),
            dt_seconds: world.dt_seconds(),
            elapsed_seconds: world.elapsed_seconds(),
            scenario_name: &self.settings.scenario_name,
        };

        let mut system_reports = Vec::with_capacity(self.systems.len());
        for system in &mut self.systems {
            let start = Instant::now();
            let rng = self.rng.system_rng(system.system_id());
            system.run(&ctx, world, rng)?;
            let duration_ms = start.elapsed().as_secs_f64() * 1_000.0;
            trace!(tick = ctx.tick, system = system.name(), duration_ms, "system ran");
            system_reports.push(SystemRunReport {
                name: system.name(),
                duration_ms,
            });
        }

        world.advance_time();
        let snapshot_path = self
            .snapshot_writer
            .maybe_write(world, &self.settings.scenario_name)?;

        Ok(TickSummary {
            tick: world.tick(),
            elapsed_seconds: world.elapsed_seconds(),
            living_creatures: world.living_creatures(),
            entity_count: world.entity_count(),
            system_reports,
            snapshot_path,
        })
    }

    /// Runs `ticks` steps and returns the summary of the last one.
    pub fn run(
        &mut self,
        world: &mut World,
        ticks: u64,
    ) -> Result<Option<TickSummary>, EngineError> {
        let mut last = None;
        for _ in 0..ticks {
            last = Some(self.step(world)?);
        }
        Ok(last)
    }
}

#[derive(Clone, Debug)]
pub struct SystemRunReport {
    pub name: &'static str,
    pub duration_ms: f64,
}

/// State after a tick has been applied.
#[derive(Clone, Debug)]
pub struct TickSummary {
    pub tick: u64,
    pub elapsed_seconds: f64,
    pub living_creatures: u64,
    pub entity_count: usize,
    pub system_reports: Vec<SystemRunReport>,
    pub snapshot_path: Option<PathBuf>,
}

/// Read-only view of the tick being processed. `tick` and `elapsed_seconds`
/// are the values before the clock advances.
pub struct SystemContext<'a> {
    pub tick: u64,
    pub dt_seconds: f64,
    pub elapsed_seconds: f64,
    pub scenario_name: &'a str,
}

pub trait System {
    fn name(&self) -> &'static str;
    /// Selects this system's random stream; must be unique within an engine.
    fn system_id(&self) -> SystemId;
    fn run(
        &mut self,
        ctx: &SystemContext,
        world: &mut World,
        rng: &mut ChaCha8Rng,
    ) -> Result<(), WorldError>;
}
