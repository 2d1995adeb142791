use std::collections::BTreeSet;

use arena_core::CellCoord;
use arena_world::Arena;

/// Draws a top-down map of the arena, north row first.
///
/// `#` wall, `.` ground tier, `1`-`9` raised tiers, `+` anything higher,
/// blank for voided floor, `=` stairwell, `e` enemy, `@` spawn.
pub(crate) fn render(arena: &Arena) -> String {
    let dims = arena.grid().dims();
    let walls = arena.grid().walls();
    let heights = arena.grid().heights();
    let shafts = &arena.geometry().shafts;
    let spawn = arena.rooms().spawn_room().map(|room| room.center());
    let enemies: BTreeSet<CellCoord> = arena
        .encounters()
        .iter()
        .flat_map(|plan| plan.enemies.iter().map(|enemy| enemy.cell))
        .collect();

    let mut out = String::with_capacity(dims.cell_count() + dims.cell_count() / 8);
    for z in (0..dims.depth_i32()).rev() {
        for x in 0..dims.width_i32() {
            let cell = CellCoord::new(x, z);
            let glyph = if walls.is_solid(cell) {
                '#'
            } else if Some(cell) == spawn {
                '@'
            } else if enemies.contains(&cell) {
                'e'
            } else if shafts.contains(cell) {
                '='
            } else {
                tier_glyph(heights.tier(cell))
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn tier_glyph(tier: i32) -> char {
    match tier {
        t if t < 0 => ' ',
        0 => '.',
        t => u32::try_from(t)
            .ok()
            .and_then(|digit| char::from_digit(digit, 10))
            .unwrap_or('+'),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::ArenaConfig;
    use arena_system_bootstrap::Bootstrap;

    #[test]
    fn map_has_one_row_per_grid_row() {
        let arena = Bootstrap.generate(&ArenaConfig::default());

        let map = render(&arena);

        let rows: Vec<_> = map.lines().collect();
        assert_eq!(rows.len(), 96);
        assert!(rows.iter().all(|row| row.chars().count() == 96));
        assert!(rows[0].chars().all(|glyph| glyph == '#'));
        assert_eq!(map.matches('@').count(), 1);
    }

    #[test]
    fn tiers_map_to_digits() {
        assert_eq!(tier_glyph(-1), ' ');
        assert_eq!(tier_glyph(0), '.');
        assert_eq!(tier_glyph(3), '3');
        assert_eq!(tier_glyph(12), '+');
    }
}
