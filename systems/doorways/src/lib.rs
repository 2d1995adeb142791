#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Doorway detection and barrier placement.
//!
//! A doorway is a room boundary cell whose outward neighbour is carved open.
//! Adjacent candidates facing the same way collapse into one doorway so a
//! corridor wider than a cell still receives a single gate.

use std::collections::BTreeMap;

use arena_core::{Axis, CellCoord, Direction, Doorway, Room, RoomId};
use arena_world::{BarrierSpec, GridDims, RoomPlan, WallField};
use glam::Vec3;

/// Finds the openings of every room.
#[derive(Clone, Copy, Debug)]
pub struct DoorwayScanner {
    corridor_width: u32,
}

impl DoorwayScanner {
    /// Creates a scanner merging same-facing candidates within
    /// `corridor_width` cells of each other.
    #[must_use]
    pub const fn new(corridor_width: u32) -> Self {
        Self { corridor_width }
    }

    /// Walks the north and south edges along x, then the east and west edges
    /// along z, keeping every opening that survives deduplication.
    #[must_use]
    pub fn scan(&self, room: &Room, walls: &WallField) -> Vec<Doorway> {
        let mut doorways = Vec::new();

        for x in room.min_x()..=room.max_x() {
            self.consider(&mut doorways, walls, x, room.max_z(), Direction::North);
            self.consider(&mut doorways, walls, x, room.min_z(), Direction::South);
        }
        for z in room.min_z()..=room.max_z() {
            self.consider(&mut doorways, walls, room.max_x(), z, Direction::East);
            self.consider(&mut doorways, walls, room.min_x(), z, Direction::West);
        }

        doorways
    }

    /// Scans every room of the plan.
    #[must_use]
    pub fn scan_all(
        &self,
        plan: &RoomPlan,
        walls: &WallField,
    ) -> BTreeMap<RoomId, Vec<Doorway>> {
        let doorways: BTreeMap<RoomId, Vec<Doorway>> = plan
            .iter()
            .map(|(id, room)| (id, self.scan(room, walls)))
            .collect();
        log::debug!(
            "found {} doorways across {} rooms",
            doorways.values().map(Vec::len).sum::<usize>(),
            doorways.len()
        );
        doorways
    }

    fn consider(
        &self,
        doorways: &mut Vec<Doorway>,
        walls: &WallField,
        x: i32,
        z: i32,
        direction: Direction,
    ) {
        let cell = CellCoord::new(x, z);
        if walls.is_open(cell) && walls.is_open(cell.step(direction)) {
            let _ = try_add_doorway(doorways, Doorway::new(cell, direction), self.corridor_width);
        }
    }
}

/// Appends `candidate` unless a doorway facing the same way already lies
/// within `corridor_width` cells. Returns whether the candidate was kept.
pub fn try_add_doorway(
    doorways: &mut Vec<Doorway>,
    candidate: Doorway,
    corridor_width: u32,
) -> bool {
    let duplicate = doorways.iter().any(|existing| {
        existing.direction() == candidate.direction()
            && existing.cell().manhattan_distance(candidate.cell()) <= corridor_width
    });
    if duplicate {
        return false;
    }
    doorways.push(candidate);
    true
}

/// Builds the gate panel covering a doorway.
///
/// The panel stands half a cell outward from the boundary cell, spans one
/// cell across the opening and the full wall height, and is
/// `barrier_thickness` deep along the doorway's direction.
#[must_use]
pub fn barrier_for(
    room: RoomId,
    doorway: Doorway,
    dims: &GridDims,
    wall_height: f32,
    barrier_thickness: f32,
) -> BarrierSpec {
    let cell_size = dims.cell_size();
    let (dx, dz) = doorway.direction().offset();
    let outward = Vec3::new(dx as f32, 0.0, dz as f32) * (cell_size * 0.5);
    let center = dims.cell_to_world(doorway.cell(), wall_height * 0.5) + outward;
    let size = match doorway.direction().axis() {
        Axis::Z => Vec3::new(cell_size, wall_height, barrier_thickness),
        Axis::X => Vec3::new(barrier_thickness, wall_height, cell_size),
    };
    BarrierSpec {
        room,
        doorway,
        center,
        size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_north_candidates_merge() {
        let mut doorways = Vec::new();

        let first = try_add_doorway(
            &mut doorways,
            Doorway::new(CellCoord::new(10, 20), Direction::North),
            2,
        );
        let second = try_add_doorway(
            &mut doorways,
            Doorway::new(CellCoord::new(11, 20), Direction::North),
            2,
        );

        assert!(first);
        assert!(!second);
        assert_eq!(doorways.len(), 1);
        assert_eq!(doorways[0].cell(), CellCoord::new(10, 20));
    }

    #[test]
    fn opposite_directions_never_merge() {
        let mut doorways = vec![Doorway::new(CellCoord::new(4, 4), Direction::North)];

        let kept = try_add_doorway(
            &mut doorways,
            Doorway::new(CellCoord::new(4, 4), Direction::South),
            3,
        );

        assert!(kept);
        assert_eq!(doorways.len(), 2);
    }

    #[test]
    fn distant_openings_stay_separate() {
        let mut doorways = vec![Doorway::new(CellCoord::new(2, 9), Direction::East)];

        let kept = try_add_doorway(
            &mut doorways,
            Doorway::new(CellCoord::new(2, 12), Direction::East),
            2,
        );

        assert!(kept);
    }

    #[test]
    fn barrier_faces_the_doorway() {
        let dims = GridDims::new(11, 11, 4.0);
        let north = barrier_for(
            RoomId::new(1),
            Doorway::new(CellCoord::new(5, 5), Direction::North),
            &dims,
            18.0,
            0.45,
        );
        let west = barrier_for(
            RoomId::new(1),
            Doorway::new(CellCoord::new(5, 5), Direction::West),
            &dims,
            18.0,
            0.45,
        );

        assert_eq!(north.center, Vec3::new(0.0, 9.0, 2.0));
        assert_eq!(north.size, Vec3::new(4.0, 18.0, 0.45));
        assert_eq!(west.center, Vec3::new(-2.0, 9.0, 0.0));
        assert_eq!(west.size, Vec3::new(0.45, 18.0, 4.0));
    }
}
