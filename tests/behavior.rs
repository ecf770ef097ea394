use biotope::{
    behavior::{update_creature, BehaviorSettings},
    species::Category,
    Activity, EntityId, LifeState, Sex, Species, TilePos, World, WorldConfig,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn flat_world(width: u32, height: u32, water: f64) -> World {
    let mut world = World::new(WorldConfig::new(width, height, 1)).unwrap();
    let positions: Vec<TilePos> = world.tiles().map(|t| t.pos()).collect();
    for pos in positions {
        world.tile_mut(pos).unwrap().set_water(water);
    }
    world
}

/// One fauna tick: every creature present at the start, in creation order.
fn tick(world: &mut World, rng: &mut ChaCha8Rng) {
    let settings = BehaviorSettings::default();
    let dt = world.dt_seconds();
    for id in world.ids_in(Category::Creature) {
        update_creature(world, id, dt, &settings, rng).unwrap();
    }
    world.advance_time();
}

fn distance(world: &World, a: EntityId, b: EntityId) -> f64 {
    let a = world.creature(a).unwrap().position;
    let b = world.creature(b).unwrap().position;
    a.distance(b)
}

#[test]
fn lone_fish_starves_before_old_age() {
    let mut world = flat_world(10, 10, 5.0);
    let fish = world
        .spawn_creature(Species::Fish, TilePos::new(5, 5), Sex::Female)
        .unwrap();
    let lifespan = Species::Fish.creature_traits().unwrap().lifespan;
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let mut died_at = None;
    for _ in 0..1_000_000 {
        tick(&mut world, &mut rng);
        if world.entity(fish).and_then(|e| e.life()) != Some(LifeState::Alive) {
            died_at = Some(world.elapsed_seconds());
            break;
        }
    }
    let died_at = died_at.expect("fish never died");
    assert!(died_at < lifespan);
    let entity = world.entity(fish).unwrap();
    assert_eq!(entity.life(), Some(LifeState::Dead));
    assert_eq!(entity.activity(), None);
}

#[test]
fn mating_pair_produces_exactly_one_offspring_on_the_mothers_tile() {
    let mut world = flat_world(10, 10, 0.0);
    world
        .spawn_creature(Species::Rabbit, TilePos::new(4, 4), Sex::Male)
        .unwrap();
    let mother = world
        .spawn_creature(Species::Rabbit, TilePos::new(4, 5), Sex::Female)
        .unwrap();
    let pregnancy = Species::Rabbit.creature_traits().unwrap().pregnancy_duration;
    let mut rng = ChaCha8Rng::seed_from_u64(2);

    tick(&mut world, &mut rng);
    assert!(world.creature(mother).unwrap().is_pregnant());

    let mut born = false;
    for _ in 0..(pregnancy as usize + 10) {
        let mother_tile = world.entity(mother).unwrap().tile();
        tick(&mut world, &mut rng);
        let rabbits = world.ids_of(Species::Rabbit);
        if rabbits.len() > 2 {
            assert_eq!(rabbits.len(), 3);
            let child = *rabbits.last().unwrap();
            assert_eq!(world.entity(child).unwrap().tile(), mother_tile);
            assert_eq!(world.creature(child).unwrap().age, 0.0);
            assert!(!world.creature(mother).unwrap().is_pregnant());
            born = true;
            break;
        }
    }
    assert!(born, "no birth within the pregnancy duration");
    assert_eq!(world.bookkeeping().births, 1);
}

#[test]
fn predator_closes_in_and_kills_sleeping_prey() {
    let mut world = flat_world(10, 10, 0.0);
    let fox = world
        .spawn_creature(Species::Fox, TilePos::new(2, 2), Sex::Male)
        .unwrap();
    let rabbit = world
        .spawn_creature(Species::Rabbit, TilePos::new(2, 7), Sex::Female)
        .unwrap();
    {
        let prey = world.creature_mut(rabbit).unwrap();
        prey.activity = Some(Activity::Sleeping);
        prey.tiredness = 1.0;
    }
    world.creature_mut(fox).unwrap().nourishment = 40.0;
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let mut killed = false;
    for _ in 0..50 {
        let before = distance(&world, fox, rabbit);
        tick(&mut world, &mut rng);
        if world.entity(rabbit).unwrap().life() == Some(LifeState::Dead) {
            killed = true;
            break;
        }
        assert_eq!(
            world.entity(fox).unwrap().activity(),
            Some(Activity::LookingForFood)
        );
        assert!(distance(&world, fox, rabbit) < before);
    }
    assert!(killed, "fox never reached the rabbit");
    assert!(world.creature(fox).unwrap().nourishment > 40.0);
    assert_eq!(world.bookkeeping().kills, 1);
}

#[test]
fn awake_prey_runs_from_a_predator() {
    let mut world = flat_world(12, 12, 0.0);
    world
        .spawn_creature(Species::Wolf, TilePos::new(6, 2), Sex::Male)
        .unwrap();
    let deer = world
        .spawn_creature(Species::Deer, TilePos::new(6, 6), Sex::Female)
        .unwrap();
    let start = world.creature(deer).unwrap().position;
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    tick(&mut world, &mut rng);
    assert_eq!(
        world.entity(deer).unwrap().activity(),
        Some(Activity::FleeingPredator)
    );
    assert!(world.creature(deer).unwrap().position.col > start.col);
}

#[test]
fn thirsty_creature_drinks_from_nearby_water() {
    let mut world = flat_world(10, 10, 0.0);
    world.tile_mut(TilePos::new(3, 5)).unwrap().set_water(1.0);
    let deer = world
        .spawn_creature(Species::Deer, TilePos::new(3, 3), Sex::Male)
        .unwrap();
    let traits = Species::Deer.creature_traits().unwrap();
    world.creature_mut(deer).unwrap().hydration = traits.max_hydration * 0.5;
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let mut drank = false;
    for _ in 0..20 {
        tick(&mut world, &mut rng);
        if world.creature(deer).unwrap().hydration == traits.max_hydration {
            drank = true;
            break;
        }
    }
    assert!(drank);
    assert_eq!(world.entity(deer).unwrap().activity(), Some(Activity::Wandering));
    // Water tiles beyond the band stay off limits.
    assert!(world.entity(deer).unwrap().tile() != TilePos::new(3, 5));
}

#[test]
fn tile_membership_holds_while_creatures_move() {
    let mut world = World::generate(WorldConfig::new(24, 24, 12)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(6);
    for _ in 0..200 {
        tick(&mut world, &mut rng);
    }
    for id in world.entity_ids() {
        let entity = world.entity(id).unwrap();
        let home = world.tile(entity.tile()).unwrap();
        assert!(home.contains(id));
        if let Some(creature) = entity.creature() {
            assert_eq!(creature.position.tile(), Some(entity.tile()));
        }
    }
    for tile in world.tiles() {
        for id in tile.entities() {
            assert_eq!(world.entity(*id).map(|e| e.tile()), Some(tile.pos()));
        }
    }
}
