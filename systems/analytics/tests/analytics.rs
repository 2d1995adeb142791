use arena_core::{ArenaConfig, RoomArchetype};
use arena_system_analytics::LayoutReport;
use arena_system_bootstrap::Bootstrap;
use proptest::prelude::*;

#[test]
fn reference_report_counts_every_room() {
    let arena = Bootstrap.generate(&ArenaConfig::default());

    let report = LayoutReport::from_arena(&arena);

    assert_eq!(report.seed(), 12345);
    assert_eq!(report.room_count(), arena.rooms().len());
    assert_eq!(
        report.reachable_room_count(),
        report.room_count(),
        "every room must be reachable from spawn"
    );
    let archetyped: usize = report.archetypes().values().sum();
    assert_eq!(archetyped + 1, report.room_count(), "spawn room has no archetype");
    assert!(report.archetypes()[&RoomArchetype::Staircase] >= 1);
    assert_eq!(report.tiles_per_floor().len(), 2);
    assert_eq!(report.ramp_count(), arena.geometry().ramps.len());
}

#[test]
fn disabled_encounters_report_no_enemies() {
    let mut config = ArenaConfig::default();
    config.encounters.enabled = false;

    let report = LayoutReport::from_arena(&Bootstrap.generate(&config));

    assert_eq!(report.encounter_count(), 0);
    assert_eq!(report.enemy_count(), 0);
    assert_eq!(report.barrier_count(), 0);
}

#[test]
fn rendered_report_names_the_seed() {
    let report = LayoutReport::from_arena(&Bootstrap.generate(&ArenaConfig::default()));

    let text = report.to_string();

    assert!(text.starts_with("seed            12345"));
    assert!(text.contains("Staircase"));
    assert!(text.contains("floor 1 tiles"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn barrier_count_matches_encounter_doorways(seed in any::<u64>()) {
        let config = ArenaConfig { seed, ..ArenaConfig::default() };
        let arena = Bootstrap.generate(&config);

        let report = LayoutReport::from_arena(&arena);

        let expected: usize = arena
            .encounters()
            .iter()
            .map(|plan| arena.doorways(plan.room).len())
            .sum();
        prop_assert_eq!(report.barrier_count(), expected);
        prop_assert!(report.reachable_room_count() == report.room_count());
        prop_assert!(report.tallest_tier() >= 0);
    }
}
