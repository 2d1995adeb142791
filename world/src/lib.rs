#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Arena storage and authoritative runtime state.
//!
//! Generation stages write into the [`Grid`] and [`Geometry`] containers
//! defined here and the bootstrap system assembles the results into an
//! [`Arena`]. At runtime a [`World`] wraps the arena together with the entity
//! table holding enemies and barriers; it is mutated only through [`apply`]
//! and read through [`query`].

mod entities;
mod geometry;
mod grid;
pub mod navigation;
mod plan;

use std::collections::BTreeMap;

use arena_core::{ArenaConfig, Body, Command, Doorway, EntityHandle, Event, RoomId};
use glam::Vec3;

use entities::{DamageOutcome, EntityTable};

pub use geometry::{
    CeilingPanel, ConnectorHeights, Geometry, PlatformTile, Ramp, ShaftSet, SupportPanel,
    TileKind, WallExtension,
};
pub use grid::{CellField, Grid, GridDims, HeightField, WallField};
pub use plan::{ArchetypeMap, BarrierSpec, EncounterPlan, EnemySpawn, RoomPlan};

/// Inputs required to assemble an [`Arena`].
#[derive(Clone, Debug)]
pub struct ArenaParts {
    /// Seed the build actually used.
    pub seed: u64,
    /// Sanitised configuration of the build.
    pub config: ArenaConfig,
    /// Carved grid with the relaxed height field.
    pub grid: Grid,
    /// Placed rooms.
    pub rooms: RoomPlan,
    /// Archetype per non-spawn room.
    pub archetypes: ArchetypeMap,
    /// Tiles, ramps, ceilings and shafts.
    pub geometry: Geometry,
    /// Deduplicated doorways per room.
    pub doorways: BTreeMap<RoomId, Vec<Doorway>>,
    /// Gated rooms.
    pub encounters: Vec<EncounterPlan>,
    /// Where the player should be placed.
    pub spawn_point: Vec3,
}

/// Complete output of one generation run.
#[derive(Clone, Debug, PartialEq)]
pub struct Arena {
    seed: u64,
    config: ArenaConfig,
    grid: Grid,
    rooms: RoomPlan,
    archetypes: ArchetypeMap,
    geometry: Geometry,
    doorways: BTreeMap<RoomId, Vec<Doorway>>,
    encounters: Vec<EncounterPlan>,
    spawn_point: Vec3,
}

impl Arena {
    /// Assembles an arena from the outputs of every generation stage.
    #[must_use]
    pub fn new(parts: ArenaParts) -> Self {
        Self {
            seed: parts.seed,
            config: parts.config,
            grid: parts.grid,
            rooms: parts.rooms,
            archetypes: parts.archetypes,
            geometry: parts.geometry,
            doorways: parts.doorways,
            encounters: parts.encounters,
            spawn_point: parts.spawn_point,
        }
    }

    /// Seed the build used.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Sanitised configuration of the build.
    #[must_use]
    pub const fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Carved grid with the relaxed height field.
    #[must_use]
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Placed rooms.
    #[must_use]
    pub const fn rooms(&self) -> &RoomPlan {
        &self.rooms
    }

    /// Archetype per non-spawn room.
    #[must_use]
    pub const fn archetypes(&self) -> &ArchetypeMap {
        &self.archetypes
    }

    /// Tiles, ramps, ceilings and shafts.
    #[must_use]
    pub const fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Deduplicated doorways of the room.
    #[must_use]
    pub fn doorways(&self, room: RoomId) -> &[Doorway] {
        self.doorways.get(&room).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of doorways across every room.
    #[must_use]
    pub fn doorway_count(&self) -> usize {
        self.doorways.values().map(Vec::len).sum()
    }

    /// Gated rooms.
    #[must_use]
    pub fn encounters(&self) -> &[EncounterPlan] {
        &self.encounters
    }

    /// Where the player should be placed.
    #[must_use]
    pub const fn spawn_point(&self) -> Vec3 {
        self.spawn_point
    }
}

/// What a runtime entity represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Enemy waiting in an encounter room.
    Enemy {
        /// Room the enemy belongs to.
        room: RoomId,
        /// Index into the configured variant roster.
        variant: usize,
    },
    /// Gate panel sealing one doorway.
    Barrier {
        /// Room the barrier seals.
        room: RoomId,
    },
}

/// Entity handles that belong to one encounter room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncounterRoster {
    room: RoomId,
    lock_on_enter: bool,
    enemies: Vec<EntityHandle>,
    barriers: Vec<EntityHandle>,
}

impl EncounterRoster {
    /// Room hosting the encounter.
    #[must_use]
    pub const fn room(&self) -> RoomId {
        self.room
    }

    /// Whether entering the room raises the barriers.
    #[must_use]
    pub const fn lock_on_enter(&self) -> bool {
        self.lock_on_enter
    }

    /// Enemy handles in spawn order.
    #[must_use]
    pub fn enemies(&self) -> &[EntityHandle] {
        &self.enemies
    }

    /// Barrier handles in doorway order.
    #[must_use]
    pub fn barriers(&self) -> &[EntityHandle] {
        &self.barriers
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Player {
    position: Option<Vec3>,
}

/// Represents the authoritative arena state at runtime.
#[derive(Debug)]
pub struct World {
    arena: Arena,
    entities: EntityTable,
    rosters: Vec<EncounterRoster>,
    player: Option<Player>,
    tick_index: u64,
}

impl World {
    /// Creates a world from a generated arena, registering one disabled
    /// entity per planned enemy and barrier.
    #[must_use]
    pub fn new(arena: Arena) -> Self {
        let mut entities = EntityTable::new();
        let mut rosters = Vec::with_capacity(arena.encounters().len());

        for plan in arena.encounters() {
            let mut enemies = Vec::with_capacity(plan.enemies.len());
            for enemy in &plan.enemies {
                let kind = EntityKind::Enemy {
                    room: enemy.room,
                    variant: enemy.variant,
                };
                enemies.push(entities.insert(kind, enemy.health, enemy.position));
            }

            let mut barriers = Vec::with_capacity(plan.barriers.len());
            for barrier in &plan.barriers {
                let kind = EntityKind::Barrier { room: barrier.room };
                barriers.push(entities.insert(kind, f32::INFINITY, barrier.center));
            }

            rosters.push(EncounterRoster {
                room: plan.room,
                lock_on_enter: plan.lock_on_enter,
                enemies,
                barriers,
            });
        }

        Self {
            arena,
            entities,
            rosters,
            player: None,
            tick_index: 0,
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
        }
        Command::EnterTrigger { room, body } => {
            if world.arena.rooms().room(room).is_none() {
                log::debug!("ignoring trigger for unknown room {}", room.get());
                return;
            }
            if let Body::Entity(entity) = body {
                if !world.entities.is_alive(entity) {
                    return;
                }
            }
            out_events.push(Event::TriggerEntered { room, body });
        }
        Command::SetEntityEnabled { entity, enabled } => {
            if world.entities.set_enabled(entity, enabled) {
                out_events.push(Event::EntityToggled { entity, enabled });
            }
        }
        Command::DamageEntity { entity, amount } => match world.entities.damage(entity, amount) {
            Some(DamageOutcome::Survived { remaining }) => {
                out_events.push(Event::EntityDamaged { entity, remaining });
            }
            Some(DamageOutcome::Destroyed) => {
                out_events.push(Event::EntityDestroyed { entity });
            }
            None => {}
        },
        Command::DestroyEntity { entity } => {
            if world.entities.remove(entity).is_some() {
                out_events.push(Event::EntityDestroyed { entity });
            }
        }
        Command::RegisterPlayer => {
            if world.player.is_none() {
                world.player = Some(Player { position: None });
                out_events.push(Event::PlayerRegistered);
            }
        }
        Command::PlacePlayer { position } => {
            if let Some(player) = world.player.as_mut() {
                player.position = Some(position);
                out_events.push(Event::PlayerPlaced { position });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use arena_core::EntityHandle;
    use glam::Vec3;

    use super::{Arena, EncounterRoster, EntityKind, World};

    /// Provides read-only access to the generated arena.
    #[must_use]
    pub fn arena(world: &World) -> &Arena {
        &world.arena
    }

    /// Whether the handle still refers to a live entity.
    #[must_use]
    pub fn is_alive(world: &World, entity: EntityHandle) -> bool {
        world.entities.is_alive(entity)
    }

    /// Whether the entity is live and enabled.
    #[must_use]
    pub fn is_enabled(world: &World, entity: EntityHandle) -> bool {
        world
            .entities
            .get(entity)
            .is_some_and(|record| record.enabled)
    }

    /// Captures the state of a live entity.
    #[must_use]
    pub fn entity(world: &World, entity: EntityHandle) -> Option<EntitySnapshot> {
        world.entities.get(entity).map(|record| EntitySnapshot {
            handle: entity,
            kind: record.kind,
            enabled: record.enabled,
            health: record.health,
            position: record.position,
        })
    }

    /// Number of live entities.
    #[must_use]
    pub fn live_entity_count(world: &World) -> usize {
        world.entities.len()
    }

    /// Entity handles grouped per encounter room.
    #[must_use]
    pub fn encounter_rosters(world: &World) -> &[EncounterRoster] {
        &world.rosters
    }

    /// Whether the host has registered the player entity.
    #[must_use]
    pub fn player_registered(world: &World) -> bool {
        world.player.is_some()
    }

    /// Last position the player was placed at.
    #[must_use]
    pub fn player_position(world: &World) -> Option<Vec3> {
        world.player.and_then(|player| player.position)
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Read-only copy of a live entity.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub struct EntitySnapshot {
        /// Handle the snapshot was taken from.
        pub handle: EntityHandle,
        /// What the entity represents.
        pub kind: EntityKind,
        /// Whether the entity is active.
        pub enabled: bool,
        /// Remaining health.
        pub health: f32,
        /// World-space position.
        pub position: Vec3,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use arena_core::{CellCoord, Room};

    use super::*;

    fn world() -> World {
        let enemy = EnemySpawn {
            room: RoomId::new(1),
            cell: CellCoord::new(12, 5),
            position: Vec3::new(48.0, 0.0, 20.0),
            variant: 1,
            scale: 1.0,
            health: 50.0,
        };
        World::new(Arena::new(ArenaParts {
            seed: 3,
            config: ArenaConfig::default(),
            grid: Grid::new(GridDims::new(32, 32, 4.0)),
            rooms: RoomPlan::new(
                vec![Room::from_origin(1, 1, 8, 8), Room::from_origin(10, 2, 8, 8)],
                2,
            ),
            archetypes: ArchetypeMap::default(),
            geometry: Geometry::new(32, 32),
            doorways: BTreeMap::new(),
            encounters: vec![EncounterPlan {
                room: RoomId::new(1),
                lock_on_enter: true,
                barriers: Vec::new(),
                enemies: vec![enemy],
            }],
            spawn_point: Vec3::ZERO,
        }))
    }

    fn first_enemy(world: &World) -> EntityHandle {
        query::encounter_rosters(world)[0].enemies()[0]
    }

    #[test]
    fn planned_enemies_start_disabled() {
        let world = world();
        let enemy = first_enemy(&world);

        assert!(query::is_alive(&world, enemy));
        assert!(!query::is_enabled(&world, enemy));
        let snapshot = query::entity(&world, enemy).expect("enemy is live");
        assert_eq!(
            snapshot.kind,
            EntityKind::Enemy {
                room: RoomId::new(1),
                variant: 1
            }
        );
    }

    #[test]
    fn damage_past_health_destroys_the_entity() {
        let mut world = world();
        let enemy = first_enemy(&world);
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::DamageEntity {
                entity: enemy,
                amount: 20.0,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::DamageEntity {
                entity: enemy,
                amount: 40.0,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::EntityDamaged {
                    entity: enemy,
                    remaining: 30.0
                },
                Event::EntityDestroyed { entity: enemy },
            ]
        );
        assert!(!query::is_alive(&world, enemy));
        assert_eq!(query::live_entity_count(&world), 0);
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut world = world();
        let enemy = first_enemy(&world);
        let mut events = Vec::new();
        apply(&mut world, Command::DestroyEntity { entity: enemy }, &mut events);
        events.clear();

        apply(
            &mut world,
            Command::SetEntityEnabled {
                entity: enemy,
                enabled: true,
            },
            &mut events,
        );
        apply(&mut world, Command::DestroyEntity { entity: enemy }, &mut events);
        apply(
            &mut world,
            Command::EnterTrigger {
                room: RoomId::new(1),
                body: Body::Entity(enemy),
            },
            &mut events,
        );

        assert!(events.is_empty());
    }

    #[test]
    fn unknown_room_triggers_are_ignored() {
        let mut world = world();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::EnterTrigger {
                room: RoomId::new(9),
                body: Body::Player,
            },
            &mut events,
        );

        assert!(events.is_empty());
    }

    #[test]
    fn player_must_be_registered_before_placement() {
        let mut world = world();
        let mut events = Vec::new();
        let target = Vec3::new(1.0, 2.0, 3.0);

        apply(&mut world, Command::PlacePlayer { position: target }, &mut events);
        assert!(events.is_empty());

        apply(&mut world, Command::RegisterPlayer, &mut events);
        apply(&mut world, Command::RegisterPlayer, &mut events);
        apply(&mut world, Command::PlacePlayer { position: target }, &mut events);
        apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::PlayerRegistered,
                Event::PlayerPlaced { position: target },
                Event::TimeAdvanced {
                    dt: Duration::from_millis(16)
                },
            ]
        );
        assert_eq!(query::player_position(&world), Some(target));
        assert_eq!(query::tick_index(&world), 1);
    }
}
