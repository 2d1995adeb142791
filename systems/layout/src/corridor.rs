//! Corridor carving between room centres.

use arena_core::{ArenaRng, CellCoord};
use arena_world::WallField;

/// Carves a walkable path between two cells.
///
/// With probability `long_chance` the path detours through a random row or
/// column in three segments; otherwise it is a two-segment L whose axis order
/// is a coin flip. Every step stamps a square of half-width `radius`.
pub fn carve_corridor(
    walls: &mut WallField,
    from: CellCoord,
    to: CellCoord,
    radius: i32,
    long_chance: f32,
    rng: &mut ArenaRng,
) {
    let width = i32::try_from(walls.field().width()).unwrap_or(i32::MAX);
    let depth = i32::try_from(walls.field().depth()).unwrap_or(i32::MAX);

    if rng.chance(long_chance) {
        if rng.coin() {
            let mid_z = rng.range(2, depth - 2);
            let first = CellCoord::new(from.x(), mid_z);
            let second = CellCoord::new(to.x(), mid_z);
            carve_line(walls, from, first, radius);
            carve_line(walls, first, second, radius);
            carve_line(walls, second, to, radius);
        } else {
            let mid_x = rng.range(2, width - 2);
            let first = CellCoord::new(mid_x, from.z());
            let second = CellCoord::new(mid_x, to.z());
            carve_line(walls, from, first, radius);
            carve_line(walls, first, second, radius);
            carve_line(walls, second, to, radius);
        }
        return;
    }

    let corner = if rng.coin() {
        CellCoord::new(to.x(), from.z())
    } else {
        CellCoord::new(from.x(), to.z())
    };
    carve_line(walls, from, corner, radius);
    carve_line(walls, corner, to, radius);
}

/// Walks from `from` to `to` along x first, then z, stamping a square at every
/// visited cell including both ends.
pub fn carve_line(walls: &mut WallField, from: CellCoord, to: CellCoord, radius: i32) {
    let mut x = from.x();
    let mut z = from.z();

    while x != to.x() {
        carve_square(walls, CellCoord::new(x, z), radius);
        x += (to.x() - x).signum();
    }
    while z != to.z() {
        carve_square(walls, CellCoord::new(x, z), radius);
        z += (to.z() - z).signum();
    }
    carve_square(walls, CellCoord::new(x, z), radius);
}

/// Clears the square block of half-width `radius` around `center`, never
/// touching the outermost ring.
pub fn carve_square(walls: &mut WallField, center: CellCoord, radius: i32) {
    let width = i32::try_from(walls.field().width()).unwrap_or(i32::MAX);
    let depth = i32::try_from(walls.field().depth()).unwrap_or(i32::MAX);
    let radius = radius.max(0);

    for dz in -radius..=radius {
        for dx in -radius..=radius {
            let cell = center.offset(dx, dz);
            if cell.x() < 1 || cell.z() < 1 || cell.x() > width - 2 || cell.z() > depth - 2 {
                continue;
            }
            walls.carve(cell);
        }
    }
}
