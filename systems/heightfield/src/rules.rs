//! Height-population rules, one per room archetype.
//!
//! Every rule writes only the interior of its room. Boundary and corridor
//! cells keep the tier 0 they were seeded with.

use std::collections::BTreeSet;

use arena_core::{ArenaRng, Axis, CellCoord, Room, RoomArchetype};
use arena_world::HeightField;

const SCATTER_ATTEMPTS: u32 = 40;
const RING_WIDTH: u32 = 4;

/// Tier limits shared by the rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RuleTuning {
    /// Highest tier any rule may assign.
    pub max_tier: i32,
    /// Highest tier the vertical spiral climbs to.
    pub spiral_top: i32,
    /// Upper bound on platforms in a scattered hallway.
    pub scatter_max: i32,
}

/// Runs the archetype's rule over the room's interior.
pub fn apply_rule(
    archetype: RoomArchetype,
    room: &Room,
    heights: &mut HeightField,
    tuning: &RuleTuning,
    rng: &mut ArenaRng,
) {
    match archetype {
        RoomArchetype::SmallEmpty | RoomArchetype::Staircase => flat(room, heights),
        RoomArchetype::SmallEncounter => centre_bump(room, heights, tuning),
        RoomArchetype::LargeEmpty => concentric_rings(room, heights, tuning),
        RoomArchetype::LargeEncounter => firing_line(room, heights, tuning),
        RoomArchetype::HallwayParkour => {
            if rng.coin() {
                weaving_lanes(room, heights, tuning);
            } else {
                scattered_steps(room, heights, tuning, rng);
            }
        }
        RoomArchetype::VerticalParkour => rising_spiral(room, heights, tuning),
    }
}

fn fill_interior(room: &Room, heights: &mut HeightField, tier: i32) {
    for cell in room.interior_cells() {
        heights.set_tier(cell, tier);
    }
}

fn flat(room: &Room, heights: &mut HeightField) {
    fill_interior(room, heights, 0);
}

fn centre_bump(room: &Room, heights: &mut HeightField, tuning: &RuleTuning) {
    flat(room, heights);
    let center = room.center();
    if room.is_interior(center) {
        heights.set_tier(center, (tuning.max_tier / 2).clamp(1, tuning.max_tier));
    }
}

fn concentric_rings(room: &Room, heights: &mut HeightField, tuning: &RuleTuning) {
    let max_step = (tuning.max_tier / 2).clamp(1, tuning.max_tier);
    let center = room.center();
    for cell in room.interior_cells() {
        let ring = i32::try_from(cell.manhattan_distance(center) / RING_WIDTH)
            .unwrap_or(i32::MAX)
            .clamp(0, max_step);
        heights.set_tier(cell, max_step - ring);
    }
}

fn firing_line(room: &Room, heights: &mut HeightField, tuning: &RuleTuning) {
    flat(room, heights);
    let line = (tuning.max_tier - 1).clamp(1, tuning.max_tier);
    let row = room.center().z();
    for x in room.min_x() + 1..room.max_x() {
        let cell = CellCoord::new(x, row);
        if x % 3 == 0 && room.is_interior(cell) {
            heights.set_tier(cell, line);
        }
    }
}

/// Interior extent along the long axis and across it, as inclusive ranges
/// `(along_from, along_to, across_from, across_to)`.
fn interior_axes(room: &Room) -> (i32, i32, i32, i32) {
    match room.long_axis() {
        Axis::X => (
            room.min_x() + 1,
            room.max_x() - 1,
            room.min_z() + 1,
            room.max_z() - 1,
        ),
        Axis::Z => (
            room.min_z() + 1,
            room.max_z() - 1,
            room.min_x() + 1,
            room.max_x() - 1,
        ),
    }
}

fn along_cell(room: &Room, along: i32, across: i32) -> CellCoord {
    match room.long_axis() {
        Axis::X => CellCoord::new(along, across),
        Axis::Z => CellCoord::new(across, along),
    }
}

fn weaving_lanes(room: &Room, heights: &mut HeightField, tuning: &RuleTuning) {
    fill_interior(room, heights, HeightField::VOID);
    let high = (tuning.max_tier / 2 + 1).clamp(1, tuning.max_tier);
    let (from, to, across_from, across_to) = interior_axes(room);
    let center = room.center();
    let lane_a = match room.long_axis() {
        Axis::X => center.z(),
        Axis::Z => center.x(),
    };
    let lane_b = (lane_a + 1).clamp(across_from, across_to.max(across_from));

    for step in from..=to {
        let raised = step.rem_euclid(2) == 0;
        heights.set_tier(along_cell(room, step, lane_a), if raised { high } else { 0 });
        heights.set_tier(along_cell(room, step, lane_b), if raised { 0 } else { high });
    }
}

fn scattered_steps(
    room: &Room,
    heights: &mut HeightField,
    tuning: &RuleTuning,
    rng: &mut ArenaRng,
) {
    fill_interior(room, heights, HeightField::VOID);
    let (from, to, across_from, across_to) = interior_axes(room);
    let count = rng.range_inclusive(3, tuning.scatter_max.max(3));
    let spacing_steps = (count - 1).max(1);
    let mut used = BTreeSet::new();

    for index in 0..count {
        let base = from + (to - from) * index / spacing_steps;
        let tier = (index + 1).clamp(1, tuning.max_tier);
        for _ in 0..SCATTER_ATTEMPTS {
            let along = (base + rng.range_inclusive(-1, 1)).clamp(from, to);
            let across = rng.range_inclusive(across_from, across_to);
            let cell = along_cell(room, along, across);
            if used.insert(cell) {
                heights.set_tier(cell, tier);
                break;
            }
        }
    }
}

fn rising_spiral(room: &Room, heights: &mut HeightField, tuning: &RuleTuning) {
    fill_interior(room, heights, HeightField::VOID);
    let center = room.center();
    let top = tuning.spiral_top;

    for index in 0..top + 2 {
        let reach = index / 2;
        let (offset_x, offset_z) = if index % 2 == 0 {
            (-reach, reach)
        } else {
            (reach, -reach)
        };
        let x = (center.x() + offset_x).clamp(room.min_x() + 1, room.max_x() - 1);
        let z = (center.z() + offset_z).clamp(room.min_z() + 1, room.max_z() - 1);
        let level = index.clamp(0, top);
        heights.set_tier(CellCoord::new(x, z), level);

        if x + 1 < room.max_x() {
            heights.set_tier(CellCoord::new(x + 1, z), (level - 1).max(0));
        }
    }

    if room.is_interior(center) {
        heights.set_tier(center, 1);
    }
}
