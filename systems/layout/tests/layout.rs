use arena_core::{ArenaRng, LayoutConfig, Room};
use arena_system_layout::LayoutPlanner;
use arena_world::{navigation::ReachabilityField, GridDims, RoomPlan, WallField};
use proptest::prelude::*;

fn plan_with(seed: u64, dims: GridDims, config: LayoutConfig) -> (RoomPlan, WallField) {
    let mut walls = WallField::new(dims.width(), dims.depth());
    let mut rng = ArenaRng::new(seed);
    let plan = LayoutPlanner::new(config).plan(dims, &mut walls, &mut rng);
    (plan, walls)
}

fn default_plan(seed: u64) -> (RoomPlan, WallField) {
    plan_with(seed, GridDims::new(96, 96, 4.0), LayoutConfig::default())
}

#[test]
fn reference_seed_reaches_room_target() {
    let (plan, _) = default_plan(12345);

    assert!(
        plan.len() >= 14,
        "expected at least 14 rooms, placed {}",
        plan.len()
    );
    let spawn = plan.spawn_room().expect("spawn room present");
    let center = spawn.center();
    assert!(
        center.x().abs_diff(48) <= u32::try_from(spawn.width()).unwrap_or(0),
        "spawn room should sit near the grid centre, found {center:?}",
    );
    assert!(center.z().abs_diff(48) <= u32::try_from(spawn.depth()).unwrap_or(0));
}

#[test]
fn every_room_is_carved_open() {
    let (plan, walls) = default_plan(77);

    for room in plan.rooms() {
        assert!(
            room.cells().all(|cell| walls.is_open(cell)),
            "room {room:?} still contains solid cells",
        );
    }
}

#[test]
fn crowded_grid_degrades_without_failing() {
    let config = LayoutConfig {
        desired_room_count: 36,
        min_room_size: 20,
        max_room_size: 32,
        ..LayoutConfig::default()
    };

    let (plan, walls) = plan_with(3, GridDims::new(24, 24, 4.0), config);

    assert!(!plan.is_empty(), "spawn room must always exist");
    assert!(plan.len() < 36);
    assert!(walls.is_solid(arena_core::CellCoord::new(0, 0)));
}

#[test]
fn fallback_rooms_follow_primary_rooms() {
    let config = LayoutConfig {
        desired_room_count: 36,
        ..LayoutConfig::default()
    };

    let (plan, _) = plan_with(11, GridDims::new(64, 64, 4.0), config);

    assert!(plan.primary_count() <= plan.len());
    for (index, room) in plan.rooms().iter().enumerate().skip(plan.primary_count()) {
        let earlier: &[Room] = &plan.rooms()[..index];
        assert!(
            earlier.iter().all(|other| !other.intersects(room, 0)),
            "fallback room {index} overlaps an earlier room",
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn primary_rooms_never_touch(seed in any::<u64>()) {
        let (plan, _) = default_plan(seed);
        let primary = plan.primary_rooms();

        for (index, room) in primary.iter().enumerate() {
            for other in &primary[index + 1..] {
                prop_assert!(!room.intersects(other, 1));
            }
        }
    }

    #[test]
    fn border_ring_stays_solid(seed in any::<u64>(), width in 24u32..80, depth in 24u32..80) {
        let dims = GridDims::new(width, depth, 4.0);
        let (_, walls) = plan_with(seed, dims, LayoutConfig::default());

        for cell in dims.cells().filter(|cell| dims.is_border(*cell)) {
            prop_assert!(walls.is_solid(cell));
        }
    }

    #[test]
    fn every_room_is_reachable_from_spawn(seed in any::<u64>()) {
        let (plan, walls) = default_plan(seed);
        let spawn = plan.spawn_room().map(Room::center);
        let field = ReachabilityField::flood(&walls, &spawn.into_iter().collect::<Vec<_>>());

        for room in plan.rooms() {
            prop_assert!(field.is_reached(room.center()));
        }
    }

    #[test]
    fn planning_is_deterministic(seed in any::<u64>()) {
        let first = default_plan(seed);
        let second = default_plan(seed);

        prop_assert_eq!(first, second);
    }
}
