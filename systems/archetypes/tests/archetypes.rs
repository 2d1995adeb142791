use arena_core::{ArenaRng, LayoutConfig, RoomArchetype, RoomId};
use arena_system_archetypes::ArchetypePlanner;
use arena_system_layout::LayoutPlanner;
use arena_world::{ArchetypeMap, GridDims, RoomPlan, WallField};
use proptest::prelude::*;

fn generate(seed: u64) -> (RoomPlan, ArchetypeMap) {
    let dims = GridDims::new(96, 96, 4.0);
    let mut walls = WallField::new(dims.width(), dims.depth());
    let mut rng = ArenaRng::new(seed);
    let plan = LayoutPlanner::new(LayoutConfig::default()).plan(dims, &mut walls, &mut rng);
    let map = ArchetypePlanner::new(4).assign(&plan, &mut rng);
    (plan, map)
}

#[test]
fn reference_seed_has_a_staircase() {
    let (_, map) = generate(12345);

    assert!(
        map.count(RoomArchetype::Staircase) >= 1,
        "the reference layout should host at least one staircase room",
    );
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_non_spawn_room_gets_exactly_one_archetype(seed in any::<u64>()) {
        let (plan, map) = generate(seed);

        prop_assert_eq!(map.len(), plan.len() - 1);
        prop_assert_eq!(map.get(RoomId::SPAWN), None);
        for (id, _) in plan.iter().skip(1) {
            prop_assert!(map.get(id).is_some());
        }
    }

    #[test]
    fn special_selections_respect_their_caps(seed in any::<u64>()) {
        let (plan, map) = generate(seed);
        let others = plan.len() - 1;

        prop_assert!(map.count(RoomArchetype::Staircase) <= 4);
        prop_assert!(map.count(RoomArchetype::HallwayParkour) <= (others / 8).clamp(1, 3));
        prop_assert!(map.count(RoomArchetype::VerticalParkour) <= (others / 10).clamp(1, 2));
    }

    #[test]
    fn parkour_rooms_are_always_large(seed in any::<u64>()) {
        let (plan, map) = generate(seed);

        for (id, archetype) in map.iter() {
            let room = plan.room(id).expect("assigned room exists");
            match archetype {
                RoomArchetype::HallwayParkour
                | RoomArchetype::VerticalParkour
                | RoomArchetype::LargeEmpty
                | RoomArchetype::LargeEncounter => prop_assert!(room.is_large()),
                RoomArchetype::SmallEmpty | RoomArchetype::SmallEncounter => {
                    prop_assert!(!room.is_large())
                }
                RoomArchetype::Staircase => {}
            }
        }
    }
}
