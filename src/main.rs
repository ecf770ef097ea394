use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use biotope::{
    engine::{Engine, EngineSettings},
    scenario::ScenarioLoader,
};

#[derive(Debug, Parser)]
#[command(author, version, about = "biotope ecosystem simulation runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/default.yaml")]
    scenario: PathBuf,

    /// Override tick count (uses scenario default when omitted)
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the world seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the grid width in tiles
    #[arg(long)]
    width: Option<u32>,

    /// Override the grid height in tiles
    #[arg(long)]
    height: Option<u32>,

    /// Override snapshot interval in ticks (0 disables snapshots)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Directory for snapshots
    #[arg(long)]
    snapshot_dir: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("Invalid log filter '{default_filter}'"))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to install tracing subscriber: {err}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;

    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if let Some(seed) = cli.seed {
        scenario.world.seed = seed;
    }
    if let Some(width) = cli.width {
        scenario.world.width = width;
    }
    if let Some(height) = cli.height {
        scenario.world.height = height;
    }

    let mut world = scenario.build_world()?;
    let ticks = scenario.ticks(cli.ticks);
    let settings = EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.world.seed,
        snapshot_interval_ticks: cli
            .snapshot_interval
            .unwrap_or(scenario.snapshot_interval_ticks),
        snapshot_dir: cli
            .snapshot_dir
            .unwrap_or_else(|| PathBuf::from("snapshots")),
        census_interval_ticks: scenario.census_interval_ticks,
        behavior: scenario.behavior.clone(),
    };

    info!(
        scenario = %scenario.name,
        width = world.width(),
        height = world.height(),
        seed = scenario.world.seed,
        entities = world.entity_count(),
        ticks,
        "starting simulation"
    );
    let mut engine = Engine::with_default_systems(settings);
    engine.run(&mut world, ticks)?;

    let census = world.census();
    println!(
        "Scenario '{}' completed for {} ticks. Living creatures: {}, births: {}, deaths: {}",
        scenario.name,
        ticks,
        world.living_creatures(),
        world.bookkeeping().births,
        world.bookkeeping().deaths,
    );
    for (species, count) in &census.species {
        println!(
            "  {:<9} alive {:>5}  dead {:>4}  decomposed {:>4}",
            species.name(),
            count.alive,
            count.dead,
            count.decomposed
        );
    }
    Ok(())
}
