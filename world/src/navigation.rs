//! Breadth-first reachability over the carved wall field.

use std::collections::VecDeque;

use arena_core::CellCoord;

use crate::grid::{CellField, WallField};

/// Step distance from the nearest source to every open cell.
///
/// Distances stay `u32::MAX` for cells the flood never reached, which makes
/// the field double as a connectivity check for the carved layout.
#[derive(Clone, Debug)]
pub struct ReachabilityField {
    distances: CellField<u32>,
}

impl ReachabilityField {
    /// Floods outward from `sources` through open cells of `walls`.
    #[must_use]
    pub fn flood(walls: &WallField, sources: &[CellCoord]) -> Self {
        let field = walls.field();
        let mut distances = CellField::new(field.width(), field.depth(), u32::MAX);
        let mut queue = VecDeque::new();

        for &source in sources {
            if walls.is_solid(source) {
                continue;
            }
            if distances.get(source).copied() == Some(0) {
                continue;
            }
            distances.set(source, 0);
            queue.push_back(source);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current) = distances.get(cell).copied() else {
                continue;
            };
            let next = current.saturating_add(1);

            for neighbor in cell.orthogonal_neighbors() {
                if walls.is_solid(neighbor) {
                    continue;
                }
                match distances.get(neighbor).copied() {
                    Some(known) if known > next => {
                        distances.set(neighbor, next);
                        queue.push_back(neighbor);
                    }
                    _ => {}
                }
            }
        }

        Self { distances }
    }

    /// Step distance to the cell, `None` when unreachable or out of range.
    #[must_use]
    pub fn distance(&self, cell: CellCoord) -> Option<u32> {
        self.distances
            .get(cell)
            .copied()
            .filter(|distance| *distance != u32::MAX)
    }

    /// Whether the flood reached the cell.
    #[must_use]
    pub fn is_reached(&self, cell: CellCoord) -> bool {
        self.distance(cell).is_some()
    }

    /// Number of cells the flood reached.
    #[must_use]
    pub fn reached_count(&self) -> usize {
        self.distances
            .values()
            .iter()
            .filter(|distance| **distance != u32::MAX)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_all(width: u32, depth: u32) -> WallField {
        let mut walls = WallField::new(width, depth);
        for z in 0..i32::try_from(depth).unwrap_or(0) {
            for x in 0..i32::try_from(width).unwrap_or(0) {
                walls.carve(CellCoord::new(x, z));
            }
        }
        walls
    }

    #[test]
    fn flood_sets_source_cells_to_zero() {
        let walls = open_all(3, 4);

        let field = ReachabilityField::flood(&walls, &[CellCoord::new(1, 2)]);

        assert_eq!(field.distance(CellCoord::new(1, 2)), Some(0));
        assert_eq!(field.distance(CellCoord::new(1, 1)), Some(1));
        assert_eq!(field.distance(CellCoord::new(1, 0)), Some(2));
        assert_eq!(field.distance(CellCoord::new(0, 0)), Some(3));
    }

    #[test]
    fn flood_respects_walls() {
        let mut walls = WallField::new(3, 4);
        for cell in [(1, 2), (1, 0), (0, 0), (0, 1), (0, 2)] {
            walls.carve(CellCoord::new(cell.0, cell.1));
        }

        let field = ReachabilityField::flood(&walls, &[CellCoord::new(1, 2)]);

        assert_eq!(field.distance(CellCoord::new(1, 1)), None);
        assert_eq!(field.distance(CellCoord::new(1, 0)), Some(4));
        assert_eq!(field.distance(CellCoord::new(0, 1)), Some(2));
        assert_eq!(field.reached_count(), 5);
    }

    #[test]
    fn solid_sources_are_ignored() {
        let walls = WallField::new(3, 3);

        let field = ReachabilityField::flood(&walls, &[CellCoord::new(1, 1)]);

        assert_eq!(field.reached_count(), 0);
    }
}
