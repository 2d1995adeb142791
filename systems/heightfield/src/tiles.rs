use std::collections::BTreeMap;

use arena_core::{ArenaRng, CellCoord, Room};
use arena_world::{
    ArchetypeMap, CeilingPanel, CellField, Geometry, GridDims, HeightField, PlatformTile,
    RoomPlan, TileKind, WallExtension, WallField,
};

use crate::HeightFieldGenerator;

const SPAWN_PAD_RADIUS: i32 = 1;

impl HeightFieldGenerator {
    /// Emits one tile per filled cell and storey.
    ///
    /// Upper storeys skip stairwell cells, and no storey doubles a cell that
    /// already carries a stair landing. Cells of parkour rooms get a random
    /// footprint and the thinner parkour slab; every other tile covers the
    /// whole cell. Ground-storey tops are recorded for spawn placement.
    pub fn emit_tiles(
        &self,
        dims: GridDims,
        plan: &RoomPlan,
        archetypes: &ArchetypeMap,
        heights: &HeightField,
        geometry: &mut Geometry,
        rng: &mut ArenaRng,
    ) {
        let parkour = parkour_cells(dims, plan, archetypes);
        let footprint_min = self.geometry.platform_footprint_min * self.cell_size;
        let footprint_max = self.geometry.platform_footprint_max * self.cell_size;
        let landings: BTreeMap<(CellCoord, u32), f32> = geometry
            .tiles
            .iter()
            .filter(|tile| tile.kind == TileKind::Landing)
            .map(|tile| ((tile.cell, tile.floor), tile.top))
            .collect();

        for floor in 0..self.geometry.stacked_floor_count {
            let base = floor as f32 * self.geometry.wall_height;
            for (cell, tier) in heights.filled_cells() {
                if floor > 0 && geometry.shafts.contains(cell) {
                    continue;
                }
                if let Some(&landing_top) = landings.get(&(cell, floor)) {
                    if floor == 0 {
                        geometry.floor_tops.set(cell, Some(landing_top));
                    }
                    continue;
                }
                let top = base + tier as f32 * self.geometry.platform_level_height;
                let in_parkour = parkour.get(cell).copied().unwrap_or(false);
                let tile = if in_parkour {
                    PlatformTile {
                        cell,
                        floor,
                        tier,
                        top,
                        footprint: rng.range_f32(footprint_min, footprint_max),
                        thickness: self.features.parkour_step_height,
                        kind: TileKind::Parkour,
                    }
                } else {
                    PlatformTile {
                        cell,
                        floor,
                        tier,
                        top,
                        footprint: self.cell_size,
                        thickness: self.geometry.floor_thickness,
                        kind: TileKind::Floor,
                    }
                };
                if floor == 0 {
                    geometry.floor_tops.set(cell, Some(top));
                }
                geometry.tiles.push(tile);
            }
        }
    }

    /// Forces a ground-storey tile under every cell of the 3×3 block centred
    /// on `center` that lacks one. Returns the number of tiles added.
    pub fn ensure_spawn_platform(
        &self,
        center: CellCoord,
        heights: &mut HeightField,
        geometry: &mut Geometry,
    ) -> usize {
        let mut added = 0;
        for dz in -SPAWN_PAD_RADIUS..=SPAWN_PAD_RADIUS {
            for dx in -SPAWN_PAD_RADIUS..=SPAWN_PAD_RADIUS {
                let cell = center.offset(dx, dz);
                match geometry.floor_tops.get(cell) {
                    Some(None) => {}
                    Some(Some(_)) | None => continue,
                }
                heights.set_tier(cell, 0);
                geometry.floor_tops.set(cell, Some(0.0));
                geometry.tiles.push(PlatformTile {
                    cell,
                    floor: 0,
                    tier: 0,
                    top: 0.0,
                    footprint: self.cell_size,
                    thickness: self.geometry.floor_thickness,
                    kind: TileKind::SpawnPad,
                });
                added += 1;
            }
        }
        added
    }

    /// Closes every storey with one panel per open cell.
    ///
    /// Stairwell cells stay open on every storey except the topmost, so a ramp
    /// is never capped by the floor it leads to.
    pub fn tile_ceilings(&self, walls: &WallField, geometry: &mut Geometry) {
        let floors = self.geometry.stacked_floor_count;
        for floor in 0..floors {
            let height = (floor + 1) as f32 * self.geometry.wall_height;
            let topmost = floor + 1 == floors;
            for cell in walls.open_cells() {
                if !topmost && geometry.shafts.contains(cell) {
                    continue;
                }
                geometry.ceilings.push(CeilingPanel {
                    cell,
                    floor,
                    height,
                    thickness: self.geometry.ceiling_thickness,
                });
            }
        }
    }

    /// Raises the wall ring around every parkour room above the storey stack.
    pub fn extend_parkour_walls(
        &self,
        plan: &RoomPlan,
        archetypes: &ArchetypeMap,
        walls: &WallField,
        geometry: &mut Geometry,
    ) {
        if !self.features.extend_parkour_walls {
            return;
        }
        let base = self.geometry.stacked_floor_count as f32 * self.geometry.wall_height;
        let height = self.geometry.wall_height * 2.0;

        for (id, archetype) in archetypes.iter() {
            if !archetype.is_parkour() {
                continue;
            }
            let Some(room) = plan.room(id) else {
                continue;
            };
            let ring = Room::from_bounds(
                room.min_x() - 1,
                room.min_z() - 1,
                room.max_x() + 1,
                room.max_z() + 1,
            );
            for cell in ring.cells().filter(|cell| !room.contains(*cell)) {
                let inside_grid = walls.field().get(cell).is_some();
                if inside_grid && walls.is_solid(cell) {
                    geometry.extensions.push(WallExtension {
                        room: id,
                        cell,
                        base,
                        height,
                    });
                }
            }
        }
    }
}

fn parkour_cells(dims: GridDims, plan: &RoomPlan, archetypes: &ArchetypeMap) -> CellField<bool> {
    let mut cells = CellField::new(dims.width(), dims.depth(), false);
    let parkour = archetypes
        .iter()
        .filter(|(_, archetype)| archetype.is_parkour())
        .filter_map(|(id, _)| plan.room(id));
    for room in parkour {
        for cell in room.cells() {
            cells.set(cell, true);
        }
    }
    cells
}
