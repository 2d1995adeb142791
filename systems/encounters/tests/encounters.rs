use std::collections::BTreeMap;

use arena_core::{ArenaConfig, Body, CellCoord, Command, Direction, Doorway, Room, RoomId};
use arena_system_encounters::{EncounterState, Encounters};
use arena_world::{
    apply, query, Arena, ArenaParts, ArchetypeMap, BarrierSpec, EncounterPlan, EnemySpawn,
    Geometry, Grid, GridDims, RoomPlan, World,
};
use glam::Vec3;
use proptest::prelude::*;

const ROOM: RoomId = RoomId::new(1);

fn enemy(slot: i32) -> EnemySpawn {
    EnemySpawn {
        room: ROOM,
        cell: CellCoord::new(12 + slot, 6),
        position: Vec3::ZERO,
        variant: 0,
        scale: 1.0,
        health: 100.0,
    }
}

fn barrier(x: i32) -> BarrierSpec {
    BarrierSpec {
        room: ROOM,
        doorway: Doorway::new(CellCoord::new(x, 10), Direction::North),
        center: Vec3::ZERO,
        size: Vec3::ONE,
    }
}

fn world_with_encounter(lock_on_enter: bool) -> World {
    let dims = GridDims::new(32, 32, 4.0);
    let rooms = RoomPlan::new(
        vec![Room::from_origin(1, 1, 8, 8), Room::from_origin(10, 3, 10, 8)],
        2,
    );
    let arena = Arena::new(ArenaParts {
        seed: 1,
        config: ArenaConfig::default(),
        grid: Grid::new(dims),
        rooms,
        archetypes: ArchetypeMap::default(),
        geometry: Geometry::new(32, 32),
        doorways: BTreeMap::new(),
        encounters: vec![EncounterPlan {
            room: ROOM,
            lock_on_enter,
            barriers: vec![barrier(12), barrier(16)],
            enemies: vec![enemy(0), enemy(1), enemy(2)],
        }],
        spawn_point: Vec3::ZERO,
    });
    World::new(arena)
}

/// Applies commands until the encounter system stops producing new ones.
fn pump(world: &mut World, encounters: &mut Encounters, commands: Vec<Command>) {
    let mut pending = commands;
    while !pending.is_empty() {
        let mut events = Vec::new();
        for command in pending.drain(..) {
            apply(world, command, &mut events);
        }
        let snapshot: &World = world;
        encounters.handle(&events, |entity| query::is_alive(snapshot, entity), &mut pending);
    }
}

fn tick() -> Command {
    Command::Tick {
        dt: std::time::Duration::from_millis(16),
    }
}

#[test]
fn encounter_completes_only_after_last_enemy_dies() {
    let mut world = world_with_encounter(true);
    let mut encounters = Encounters::new(query::encounter_rosters(&world));
    let roster = query::encounter_rosters(&world)[0].clone();

    pump(
        &mut world,
        &mut encounters,
        vec![Command::EnterTrigger {
            room: ROOM,
            body: Body::Player,
        }],
    );
    assert_eq!(encounters.state(ROOM), Some(EncounterState::Activated));
    assert!(roster.enemies().iter().all(|enemy| query::is_enabled(&world, *enemy)));
    assert!(roster.barriers().iter().all(|gate| query::is_enabled(&world, *gate)));

    let kills = roster.enemies()[..2]
        .iter()
        .map(|entity| Command::DestroyEntity { entity: *entity })
        .chain(std::iter::once(tick()))
        .collect();
    pump(&mut world, &mut encounters, kills);
    assert_eq!(encounters.state(ROOM), Some(EncounterState::Activated));
    assert!(roster.barriers().iter().all(|gate| query::is_alive(&world, *gate)));

    pump(
        &mut world,
        &mut encounters,
        vec![
            Command::DamageEntity {
                entity: roster.enemies()[2],
                amount: 250.0,
            },
            tick(),
        ],
    );
    assert_eq!(encounters.state(ROOM), Some(EncounterState::Completed));
    assert!(roster.barriers().iter().all(|gate| !query::is_alive(&world, *gate)));
    assert!(encounters.rooms()[0].barriers().is_empty());
}

#[test]
fn repeated_triggers_are_ignored() {
    let mut world = world_with_encounter(true);
    let mut encounters = Encounters::new(query::encounter_rosters(&world));
    let enter = || Command::EnterTrigger {
        room: ROOM,
        body: Body::Player,
    };

    pump(&mut world, &mut encounters, vec![enter()]);

    let mut events = Vec::new();
    apply(&mut world, enter(), &mut events);
    let mut out = Vec::new();
    encounters.handle(&events, |entity| query::is_alive(&world, entity), &mut out);
    assert!(out.is_empty(), "second entry must not re-enable anything");

    let roster = query::encounter_rosters(&world)[0].clone();
    let finish = roster
        .enemies()
        .iter()
        .map(|entity| Command::DestroyEntity { entity: *entity })
        .collect();
    pump(&mut world, &mut encounters, finish);
    assert_eq!(encounters.state(ROOM), Some(EncounterState::Completed));

    let mut events = Vec::new();
    apply(&mut world, enter(), &mut events);
    apply(&mut world, tick(), &mut events);
    let mut out = Vec::new();
    encounters.handle(&events, |entity| query::is_alive(&world, entity), &mut out);
    assert!(out.is_empty(), "completed encounter must stay silent");
}

#[test]
fn other_bodies_leave_encounter_idle() {
    let mut world = world_with_encounter(true);
    let mut encounters = Encounters::new(query::encounter_rosters(&world));

    pump(
        &mut world,
        &mut encounters,
        vec![
            Command::EnterTrigger {
                room: ROOM,
                body: Body::Other,
            },
            tick(),
        ],
    );

    assert_eq!(encounters.state(ROOM), Some(EncounterState::Idle));
    let roster = &query::encounter_rosters(&world)[0];
    assert!(roster.enemies().iter().all(|enemy| !query::is_enabled(&world, *enemy)));
}

#[test]
fn unlocked_encounter_keeps_barriers_disabled() {
    let mut world = world_with_encounter(false);
    let mut encounters = Encounters::new(query::encounter_rosters(&world));

    pump(
        &mut world,
        &mut encounters,
        vec![Command::EnterTrigger {
            room: ROOM,
            body: Body::Player,
        }],
    );

    let roster = &query::encounter_rosters(&world)[0];
    assert!(roster.barriers().iter().all(|gate| !query::is_enabled(&world, *gate)));
    assert!(roster.enemies().iter().all(|enemy| query::is_enabled(&world, *enemy)));
}

proptest! {
    #[test]
    fn barriers_fall_only_with_the_last_enemy(order in Just(vec![0usize, 1, 2]).prop_shuffle()) {
        let mut world = world_with_encounter(true);
        let mut encounters = Encounters::new(query::encounter_rosters(&world));
        let roster = query::encounter_rosters(&world)[0].clone();
        pump(
            &mut world,
            &mut encounters,
            vec![Command::EnterTrigger { room: ROOM, body: Body::Player }],
        );

        for (killed, index) in order.iter().enumerate() {
            let entity = roster.enemies()[*index];
            pump(&mut world, &mut encounters, vec![Command::DestroyEntity { entity }, tick()]);

            let expected = if killed == order.len() - 1 {
                EncounterState::Completed
            } else {
                EncounterState::Activated
            };
            prop_assert_eq!(encounters.state(ROOM), Some(expected));
            let gates_alive = roster.barriers().iter().all(|gate| query::is_alive(&world, *gate));
            prop_assert_eq!(gates_alive, expected == EncounterState::Activated);
        }
    }
}
