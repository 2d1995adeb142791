#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Summary statistics describing a generated arena.

mod metrics;

use std::{collections::BTreeMap, fmt};

use arena_core::RoomArchetype;
use arena_world::Arena;
use serde::Serialize;

pub use metrics::{
    archetype_histogram, barrier_count, enemy_count, reachable_room_count, tallest_tier,
    tiles_per_floor,
};

/// Counts gathered from a finished arena.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct LayoutReport {
    seed: u64,
    room_count: usize,
    primary_room_count: usize,
    reachable_room_count: usize,
    open_cell_count: usize,
    archetypes: BTreeMap<RoomArchetype, usize>,
    tallest_tier: i32,
    tiles_per_floor: Vec<usize>,
    ramp_count: usize,
    ceiling_count: usize,
    shaft_count: usize,
    wall_extension_count: usize,
    doorway_count: usize,
    encounter_count: usize,
    enemy_count: usize,
    barrier_count: usize,
}

impl LayoutReport {
    /// Measures every statistic of the arena.
    #[must_use]
    pub fn from_arena(arena: &Arena) -> Self {
        let rooms = arena.rooms();
        let walls = arena.grid().walls();
        let geometry = arena.geometry();
        let floors = arena.config().geometry.stacked_floor_count;

        Self {
            seed: arena.seed(),
            room_count: rooms.len(),
            primary_room_count: rooms.primary_count(),
            reachable_room_count: reachable_room_count(rooms, walls),
            open_cell_count: walls.open_count(),
            archetypes: archetype_histogram(arena.archetypes()),
            tallest_tier: tallest_tier(arena.grid().heights()),
            tiles_per_floor: tiles_per_floor(geometry, floors),
            ramp_count: geometry.ramps.len(),
            ceiling_count: geometry.ceilings.len(),
            shaft_count: geometry.shafts.len(),
            wall_extension_count: geometry.extensions.len(),
            doorway_count: arena.doorway_count(),
            encounter_count: arena.encounters().len(),
            enemy_count: enemy_count(arena.encounters()),
            barrier_count: barrier_count(arena.encounters()),
        }
    }

    /// Seed the arena was generated from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Rooms placed, spawn room included.
    #[must_use]
    pub const fn room_count(&self) -> usize {
        self.room_count
    }

    /// Rooms placed by the padded primary pass.
    #[must_use]
    pub const fn primary_room_count(&self) -> usize {
        self.primary_room_count
    }

    /// Rooms whose centre is walkable from the spawn room.
    #[must_use]
    pub const fn reachable_room_count(&self) -> usize {
        self.reachable_room_count
    }

    /// Carved cells in the wall field.
    #[must_use]
    pub const fn open_cell_count(&self) -> usize {
        self.open_cell_count
    }

    /// Rooms per archetype.
    #[must_use]
    pub fn archetypes(&self) -> &BTreeMap<RoomArchetype, usize> {
        &self.archetypes
    }

    /// Highest settled tier.
    #[must_use]
    pub const fn tallest_tier(&self) -> i32 {
        self.tallest_tier
    }

    /// Platform tiles per storey, ground storey first.
    #[must_use]
    pub fn tiles_per_floor(&self) -> &[usize] {
        &self.tiles_per_floor
    }

    /// Ramps built.
    #[must_use]
    pub const fn ramp_count(&self) -> usize {
        self.ramp_count
    }

    /// Ceiling panels emitted.
    #[must_use]
    pub const fn ceiling_count(&self) -> usize {
        self.ceiling_count
    }

    /// Cells kept open for stairwells.
    #[must_use]
    pub const fn shaft_count(&self) -> usize {
        self.shaft_count
    }

    /// Extra wall segments around parkour rooms.
    #[must_use]
    pub const fn wall_extension_count(&self) -> usize {
        self.wall_extension_count
    }

    /// Doorways across every room.
    #[must_use]
    pub const fn doorway_count(&self) -> usize {
        self.doorway_count
    }

    /// Gated rooms.
    #[must_use]
    pub const fn encounter_count(&self) -> usize {
        self.encounter_count
    }

    /// Enemies waiting across all encounters.
    #[must_use]
    pub const fn enemy_count(&self) -> usize {
        self.enemy_count
    }

    /// Barrier panels across all encounters.
    #[must_use]
    pub const fn barrier_count(&self) -> usize {
        self.barrier_count
    }
}

impl fmt::Display for LayoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seed            {}", self.seed)?;
        writeln!(
            f,
            "rooms           {} ({} primary, {} reachable)",
            self.room_count, self.primary_room_count, self.reachable_room_count
        )?;
        writeln!(f, "open cells      {}", self.open_cell_count)?;
        for (archetype, count) in &self.archetypes {
            writeln!(f, "  {:<16} {count}", format!("{archetype:?}"))?;
        }
        writeln!(f, "tallest tier    {}", self.tallest_tier)?;
        for (floor, tiles) in self.tiles_per_floor.iter().enumerate() {
            writeln!(f, "floor {floor} tiles   {tiles}")?;
        }
        writeln!(
            f,
            "ramps {} / ceilings {} / shafts {} / extensions {}",
            self.ramp_count, self.ceiling_count, self.shaft_count, self.wall_extension_count
        )?;
        writeln!(f, "doorways        {}", self.doorway_count)?;
        write!(
            f,
            "encounters      {} ({} enemies, {} barriers)",
            self.encounter_count, self.enemy_count, self.barrier_count
        )
    }
}
