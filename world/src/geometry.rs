//! Physical pieces emitted from the height field and staircase builder.
//!
//! Nothing here is rendered; hosts instantiate meshes and colliders from these
//! records.

use std::collections::{BTreeMap, BTreeSet};

use arena_core::{CellCoord, RoomId};
use glam::Vec3;
use serde::Serialize;

use crate::grid::{CellField, GridDims};

/// Role of a platform tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TileKind {
    /// Regular floor or stepped platform.
    Floor,
    /// Randomly sized platform inside a parkour room.
    Parkour,
    /// Flat landing at either end of a ramp.
    Landing,
    /// Forced tile under the player spawn.
    SpawnPad,
}

/// One slab standing on a `(cell, floor)` pair.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlatformTile {
    /// Cell the tile stands on.
    pub cell: CellCoord,
    /// Storey index.
    pub floor: u32,
    /// Height-field tier, zero for landings.
    pub tier: i32,
    /// World height of the walkable top surface.
    pub top: f32,
    /// Edge length of the square footprint.
    pub footprint: f32,
    /// Slab thickness.
    pub thickness: f32,
    /// Role of the tile.
    pub kind: TileKind,
}

impl PlatformTile {
    /// World-space centre of the slab.
    #[must_use]
    pub fn center(&self, dims: &GridDims) -> Vec3 {
        dims.cell_to_world(self.cell, self.top - self.thickness / 2.0)
    }
}

/// Sloped connector between two storeys.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ramp {
    /// Staircase room hosting the ramp.
    pub room: RoomId,
    /// Lower storey of the transition.
    pub story: u32,
    /// Cell at the bottom of the ramp.
    pub start: CellCoord,
    /// Cell at the top of the ramp.
    pub end: CellCoord,
    /// World point at the bottom landing.
    pub start_point: Vec3,
    /// World point at the top landing.
    pub end_point: Vec3,
    /// Incline around the ramp's local x axis in radians.
    pub pitch: f32,
    /// Heading around the world y axis in radians.
    pub yaw: f32,
    /// Length of the sloped surface.
    pub length: f32,
    /// Number of visual steps cut into the slope.
    pub steps: u32,
    /// Panel closing the space under a ramp that starts on the ground storey.
    pub support: Option<SupportPanel>,
}

impl Ramp {
    /// Midpoint of the sloped surface.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.start_point.lerp(self.end_point, 0.5)
    }
}

/// Vertical panel underneath a ramp.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SupportPanel {
    /// World-space centre.
    pub center: Vec3,
    /// Extents along each world axis.
    pub size: Vec3,
}

/// Slab closing the top of a storey over one cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CeilingPanel {
    /// Cell covered by the panel.
    pub cell: CellCoord,
    /// Storey the panel closes.
    pub floor: u32,
    /// World height of the panel's underside.
    pub height: f32,
    /// Slab thickness.
    pub thickness: f32,
}

/// Extra wall mass stacked on a parkour room's boundary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WallExtension {
    /// Room whose boundary is extended.
    pub room: RoomId,
    /// Solid boundary cell being extended.
    pub cell: CellCoord,
    /// World height where the extension starts.
    pub base: f32,
    /// Vertical size of the extension.
    pub height: f32,
}

/// Cells exempt from upper-storey floors and intermediate ceilings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ShaftSet {
    cells: BTreeSet<CellCoord>,
}

impl ShaftSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the cell as part of a stairwell.
    pub fn insert(&mut self, cell: CellCoord) {
        let _ = self.cells.insert(cell);
    }

    /// Marks the 3×3 block centred on `cell`.
    pub fn insert_block(&mut self, cell: CellCoord) {
        for dz in -1..=1 {
            for dx in -1..=1 {
                self.insert(cell.offset(dx, dz));
            }
        }
    }

    /// Whether the cell is part of a stairwell.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Number of shaft cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no shaft has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates shaft cells in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }
}

/// Ramp surface heights registered at sampled cells. The highest sample wins.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ConnectorHeights {
    heights: BTreeMap<CellCoord, f32>,
}

impl ConnectorHeights {
    /// Creates an empty lookup.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a sampled height, keeping the larger of repeated samples.
    pub fn register(&mut self, cell: CellCoord, height: f32) {
        let entry = self.heights.entry(cell).or_insert(height);
        if height > *entry {
            *entry = height;
        }
    }

    /// Registered height for the cell.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<f32> {
        self.heights.get(&cell).copied()
    }

    /// Number of registered cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }
}

/// Everything the height-field and staircase stages emit.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    /// Platform tiles across every storey.
    pub tiles: Vec<PlatformTile>,
    /// Ramps between storeys.
    pub ramps: Vec<Ramp>,
    /// Ceiling panels across every storey.
    pub ceilings: Vec<CeilingPanel>,
    /// Parkour wall extensions.
    pub extensions: Vec<WallExtension>,
    /// Stairwell cells.
    pub shafts: ShaftSet,
    /// Ramp heights at sampled cells.
    pub connectors: ConnectorHeights,
    /// Top height of the ground-storey tile per cell.
    pub floor_tops: CellField<Option<f32>>,
}

impl Geometry {
    /// Creates an empty container sized for the grid.
    #[must_use]
    pub fn new(width: u32, depth: u32) -> Self {
        Self {
            tiles: Vec::new(),
            ramps: Vec::new(),
            ceilings: Vec::new(),
            extensions: Vec::new(),
            shafts: ShaftSet::new(),
            connectors: ConnectorHeights::new(),
            floor_tops: CellField::new(width, depth, None),
        }
    }

    /// Walkable height at the cell on the ground storey, taking ramps into
    /// account.
    #[must_use]
    pub fn top_height(&self, cell: CellCoord) -> Option<f32> {
        let floor = self.floor_tops.get(cell).copied().flatten();
        match (floor, self.connectors.get(cell)) {
            (Some(floor), Some(ramp)) => Some(floor.max(ramp)),
            (floor, ramp) => floor.or(ramp),
        }
    }

    /// Number of tiles standing on the provided storey.
    #[must_use]
    pub fn tiles_on_floor(&self, floor: u32) -> usize {
        self.tiles.iter().filter(|tile| tile.floor == floor).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connector_keeps_highest_sample() {
        let mut connectors = ConnectorHeights::new();
        let cell = CellCoord::new(4, 4);

        connectors.register(cell, 3.0);
        connectors.register(cell, 1.0);
        connectors.register(cell, 5.5);

        assert_eq!(connectors.get(cell), Some(5.5));
        assert_eq!(connectors.len(), 1);
    }

    #[test]
    fn shaft_block_covers_neighbourhood() {
        let mut shafts = ShaftSet::new();

        shafts.insert_block(CellCoord::new(5, 5));
        shafts.insert_block(CellCoord::new(6, 5));

        assert_eq!(shafts.len(), 12);
        assert!(shafts.contains(CellCoord::new(4, 4)));
        assert!(shafts.contains(CellCoord::new(7, 6)));
        assert!(!shafts.contains(CellCoord::new(8, 5)));
    }

    #[test]
    fn top_height_prefers_higher_ramp_sample() {
        let mut geometry = Geometry::new(8, 8);
        let cell = CellCoord::new(2, 3);
        geometry.floor_tops.set(cell, Some(1.5));

        assert_eq!(geometry.top_height(cell), Some(1.5));

        geometry.connectors.register(cell, 6.0);
        assert_eq!(geometry.top_height(cell), Some(6.0));
        assert_eq!(geometry.top_height(CellCoord::new(0, 0)), None);
    }
}
