use std::path::PathBuf;

use biotope::{
    engine::{Engine, EngineBuilder, EngineSettings},
    scenario::{Scenario, ScenarioLoader},
    species::Category,
    systems::{BookkeepingSystem, FloraSystem, WeatherSystem},
    World,
};
use tempfile::tempdir;

fn scenario_loader() -> ScenarioLoader {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
}

fn scenario() -> Scenario {
    scenario_loader()
        .load("scenarios/small_pond.yaml")
        .expect("scenario parses")
}

fn settings(scenario: &Scenario, snapshot_dir: PathBuf, snapshot_interval: u64) -> EngineSettings {
    EngineSettings {
        scenario_name: scenario.name.clone(),
        seed: scenario.world.seed,
        snapshot_interval_ticks: snapshot_interval,
        snapshot_dir,
        census_interval_ticks: scenario.census_interval_ticks,
        behavior: scenario.behavior.clone(),
    }
}

fn fingerprint(world: &World) -> Vec<(u64, usize, usize, String)> {
    world
        .entity_ids()
        .into_iter()
        .filter_map(|id| world.entity(id))
        .map(|e| {
            let activity = e.activity().map(|a| format!("{a:?}")).unwrap_or_default();
            (e.id().raw(), e.tile().row, e.tile().col, activity)
        })
        .collect()
}

#[test]
fn scenario_fixtures_parse() {
    let small = scenario();
    assert_eq!(small.name, "small_pond");
    assert_eq!(small.world.width, 24);
    assert_eq!(small.world.seed, 42);

    let default = scenario_loader().load("scenarios/default.yaml").unwrap();
    assert_eq!(default.world.width, 64);
    assert_eq!(default.snapshot_interval_ticks, 600);
}

#[test]
fn engine_runs_deterministically() {
    let scenario = scenario();
    let temp = tempdir().unwrap();
    let ticks = 120;

    let mut world_a = scenario.build_world().unwrap();
    let mut engine_a = Engine::with_default_systems(settings(&scenario, temp.path().into(), 0));
    engine_a.run(&mut world_a, ticks).unwrap();

    let mut world_b = scenario.build_world().unwrap();
    let mut engine_b = Engine::with_default_systems(settings(&scenario, temp.path().into(), 0));
    engine_b.run(&mut world_b, ticks).unwrap();

    assert_eq!(world_a.tick(), ticks);
    assert_eq!(fingerprint(&world_a), fingerprint(&world_b));
    assert_eq!(world_a.census(), world_b.census());
    assert_eq!(world_a.bookkeeping(), world_b.bookkeeping());
}

#[test]
fn snapshots_land_in_scenario_directory() {
    let scenario = scenario();
    let temp = tempdir().unwrap();
    let mut world = scenario.build_world().unwrap();
    let mut engine = Engine::with_default_systems(settings(&scenario, temp.path().into(), 10));

    let mut written = Vec::new();
    for _ in 0..25 {
        let summary = engine.step(&mut world).unwrap();
        if let Some(path) = summary.snapshot_path {
            written.push(path);
        }
    }

    let dir = temp.path().join("small_pond");
    assert_eq!(
        written,
        vec![dir.join("tick_000010.json"), dir.join("tick_000020.json")]
    );
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&written[1]).unwrap()).unwrap();
    assert_eq!(json["scenario"], "small_pond");
    assert_eq!(json["tick"], 20);
}

#[test]
fn custom_system_list_runs_in_insertion_order() {
    let scenario = scenario();
    let temp = tempdir().unwrap();
    let mut world = scenario.build_world().unwrap();
    let mut engine = EngineBuilder::new(settings(&scenario, temp.path().into(), 0))
        .with_system(FloraSystem::new())
        .with_system(BookkeepingSystem::new(1))
        .build();

    let summary = engine.step(&mut world).unwrap();
    let names: Vec<_> = summary.system_reports.iter().map(|r| r.name).collect();
    assert_eq!(names, vec!["flora", "bookkeeping"]);
    assert_eq!(summary.tick, 1);
    assert_eq!(summary.entity_count, world.entity_count());
}

#[test]
fn clouds_drift_but_nothing_else_depends_on_them() {
    let scenario = scenario();
    let temp = tempdir().unwrap();
    let mut world = scenario.build_world().unwrap();
    let before: Vec<f64> = world.tiles().map(|t| t.cloud_cover()).collect();
    let water: Vec<f64> = world.tiles().map(|t| t.water()).collect();

    let mut engine = EngineBuilder::new(settings(&scenario, temp.path().into(), 0))
        .with_system(WeatherSystem::new())
        .build();
    engine.run(&mut world, 300).unwrap();

    let after: Vec<f64> = world.tiles().map(|t| t.cloud_cover()).collect();
    assert_ne!(before, after);
    assert_eq!(water, world.tiles().map(|t| t.water()).collect::<Vec<_>>());
}

#[test]
fn flora_system_regrows_grazed_plants() {
    let scenario = scenario();
    let temp = tempdir().unwrap();
    let mut world = scenario.build_world().unwrap();
    let plant = world
        .ids_in(Category::Flora)
        .into_iter()
        .next()
        .expect("generated world has flora");
    world.entity_mut(plant).unwrap().energy = 1.0;
    let rate = world.entity(plant).unwrap().species().flora_traits().unwrap().regen_rate;

    let mut engine = EngineBuilder::new(settings(&scenario, temp.path().into(), 0))
        .with_system(FloraSystem::new())
        .build();
    engine.run(&mut world, 10).unwrap();
    let energy = world.entity(plant).unwrap().energy;
    assert!((energy - (1.0 + rate * 10.0)).abs() < 1e-9);
}
