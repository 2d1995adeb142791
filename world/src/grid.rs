//! Flat per-cell storage shared by every generation stage.

use arena_core::CellCoord;
use glam::Vec3;
use serde::Serialize;

/// Dimensions of the cell grid and its mapping into world space.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GridDims {
    width: u32,
    depth: u32,
    cell_size: f32,
}

impl GridDims {
    /// Creates a new grid description.
    #[must_use]
    pub const fn new(width: u32, depth: u32, cell_size: f32) -> Self {
        Self {
            width,
            depth,
            cell_size,
        }
    }

    /// Number of cells along the x axis.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cells along the z axis.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Edge length of a cell in world units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Width as a signed extent for coordinate arithmetic.
    #[must_use]
    pub fn width_i32(&self) -> i32 {
        i32::try_from(self.width).unwrap_or(i32::MAX)
    }

    /// Depth as a signed extent for coordinate arithmetic.
    #[must_use]
    pub fn depth_i32(&self) -> i32 {
        i32::try_from(self.depth).unwrap_or(i32::MAX)
    }

    /// Total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        let width = usize::try_from(self.width).unwrap_or(0);
        let depth = usize::try_from(self.depth).unwrap_or(0);
        width.saturating_mul(depth)
    }

    /// Whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Whether the cell belongs to the outermost ring.
    #[must_use]
    pub fn is_border(&self, cell: CellCoord) -> bool {
        self.contains(cell)
            && (cell.x() == 0
                || cell.z() == 0
                || cell.x() == self.width_i32() - 1
                || cell.z() == self.depth_i32() - 1)
    }

    /// Row-major offset of the cell, or `None` when out of range.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        let column = u32::try_from(cell.x()).ok()?;
        let row = u32::try_from(cell.z()).ok()?;
        if column >= self.width || row >= self.depth {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let row = usize::try_from(row).ok()?;
        let column = usize::try_from(column).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Iterates every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let (width, depth) = (self.width_i32(), self.depth_i32());
        (0..depth).flat_map(move |z| (0..width).map(move |x| CellCoord::new(x, z)))
    }

    /// World-space position of the cell centre at height `y`.
    ///
    /// The grid is centred on the origin.
    #[must_use]
    pub fn cell_to_world(&self, cell: CellCoord, y: f32) -> Vec3 {
        let x_start = -((self.width as f32 - 1.0) * self.cell_size) / 2.0;
        let z_start = -((self.depth as f32 - 1.0) * self.cell_size) / 2.0;
        Vec3::new(
            x_start + cell.x() as f32 * self.cell_size,
            y,
            z_start + cell.z() as f32 * self.cell_size,
        )
    }
}

/// Dense row-major buffer holding one value per cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CellField<T> {
    width: u32,
    depth: u32,
    cells: Vec<T>,
}

impl<T: Clone> CellField<T> {
    /// Creates a field with every cell set to `fill`.
    #[must_use]
    pub fn new(width: u32, depth: u32, fill: T) -> Self {
        let dims = GridDims::new(width, depth, 1.0);
        Self {
            width,
            depth,
            cells: vec![fill; dims.cell_count()],
        }
    }

    /// Overwrites every cell with `value`.
    pub fn fill(&mut self, value: T) {
        self.cells.fill(value);
    }
}

impl<T> CellField<T> {
    fn dims(&self) -> GridDims {
        GridDims::new(self.width, self.depth, 1.0)
    }

    /// Number of cells along the x axis.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of cells along the z axis.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Value stored for the cell, or `None` when out of range.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&T> {
        self.dims()
            .index(cell)
            .and_then(|index| self.cells.get(index))
    }

    /// Mutable value stored for the cell, or `None` when out of range.
    pub fn get_mut(&mut self, cell: CellCoord) -> Option<&mut T> {
        let index = self.dims().index(cell)?;
        self.cells.get_mut(index)
    }

    /// Stores `value` for the cell. Out-of-range writes are ignored.
    pub fn set(&mut self, cell: CellCoord, value: T) {
        if let Some(slot) = self.get_mut(cell) {
            *slot = value;
        }
    }

    /// Raw values in row-major order.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.cells
    }

    /// Iterates every cell together with its value in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &T)> {
        self.dims().cells().zip(self.cells.iter())
    }
}

/// Solid/open occupancy per cell. `true` means solid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WallField {
    field: CellField<bool>,
}

impl WallField {
    /// Creates a fully solid field.
    #[must_use]
    pub fn new(width: u32, depth: u32) -> Self {
        Self {
            field: CellField::new(width, depth, true),
        }
    }

    /// Whether the cell is solid. Cells outside the grid read as solid.
    #[must_use]
    pub fn is_solid(&self, cell: CellCoord) -> bool {
        self.field.get(cell).copied().unwrap_or(true)
    }

    /// Whether the cell has been carved open.
    #[must_use]
    pub fn is_open(&self, cell: CellCoord) -> bool {
        !self.is_solid(cell)
    }

    /// Clears the cell to open space.
    pub fn carve(&mut self, cell: CellCoord) {
        self.field.set(cell, false);
    }

    /// Forces the outermost ring of cells back to solid.
    pub fn seal_border(&mut self) {
        let dims = self.field.dims();
        for cell in dims.cells().filter(|cell| dims.is_border(*cell)) {
            self.field.set(cell, true);
        }
    }

    /// Number of open cells.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.field.values().iter().filter(|solid| !**solid).count()
    }

    /// Iterates every open cell in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.field
            .iter()
            .filter(|(_, solid)| !**solid)
            .map(|(cell, _)| cell)
    }

    /// Underlying boolean field.
    #[must_use]
    pub fn field(&self) -> &CellField<bool> {
        &self.field
    }
}

/// Platform tier per cell. [`HeightField::VOID`] marks cells without a platform.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HeightField {
    field: CellField<i32>,
}

impl HeightField {
    /// Tier value of a cell without any platform.
    pub const VOID: i32 = -1;

    /// Creates a field with every cell void.
    #[must_use]
    pub fn new(width: u32, depth: u32) -> Self {
        Self {
            field: CellField::new(width, depth, Self::VOID),
        }
    }

    /// Resets open cells to tier 0 and solid cells to void.
    pub fn seed_from_walls(&mut self, walls: &WallField) {
        for (cell, solid) in walls.field().iter() {
            self.field
                .set(cell, if *solid { Self::VOID } else { 0 });
        }
    }

    /// Tier of the cell. Cells outside the grid read as void.
    #[must_use]
    pub fn tier(&self, cell: CellCoord) -> i32 {
        self.field.get(cell).copied().unwrap_or(Self::VOID)
    }

    /// Whether the cell carries a platform.
    #[must_use]
    pub fn is_filled(&self, cell: CellCoord) -> bool {
        self.tier(cell) >= 0
    }

    /// Stores a tier for the cell. Out-of-range writes are ignored.
    pub fn set_tier(&mut self, cell: CellCoord, tier: i32) {
        self.field.set(cell, tier.max(Self::VOID));
    }

    /// Iterates every filled cell with its tier in row-major order.
    pub fn filled_cells(&self) -> impl Iterator<Item = (CellCoord, i32)> + '_ {
        self.field
            .iter()
            .filter(|(_, tier)| **tier >= 0)
            .map(|(cell, tier)| (cell, *tier))
    }

    /// Underlying integer field.
    #[must_use]
    pub fn field(&self) -> &CellField<i32> {
        &self.field
    }
}

/// Grid dimensions plus the wall and height fields every stage shares.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid {
    dims: GridDims,
    walls: WallField,
    heights: HeightField,
}

impl Grid {
    /// Creates a fully solid grid with a void height field.
    #[must_use]
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            walls: WallField::new(dims.width(), dims.depth()),
            heights: HeightField::new(dims.width(), dims.depth()),
        }
    }

    /// Grid dimensions.
    #[must_use]
    pub const fn dims(&self) -> GridDims {
        self.dims
    }

    /// Wall occupancy.
    #[must_use]
    pub const fn walls(&self) -> &WallField {
        &self.walls
    }

    /// Mutable wall occupancy.
    pub fn walls_mut(&mut self) -> &mut WallField {
        &mut self.walls
    }

    /// Platform tiers.
    #[must_use]
    pub const fn heights(&self) -> &HeightField {
        &self.heights
    }

    /// Read-only walls alongside mutable heights, for stages shaping the
    /// height field around the carved layout.
    pub fn split_heights_mut(&mut self) -> (&WallField, &mut HeightField) {
        (&self.walls, &mut self.heights)
    }
}
