use std::collections::BTreeMap;

use arena_core::{Room, RoomArchetype};
use arena_world::{
    navigation::ReachabilityField, ArchetypeMap, EncounterPlan, Geometry, HeightField, RoomPlan,
    WallField,
};

/// Counts rooms per archetype, listing every archetype even when unused.
#[must_use]
pub fn archetype_histogram(archetypes: &ArchetypeMap) -> BTreeMap<RoomArchetype, usize> {
    RoomArchetype::ALL
        .iter()
        .map(|archetype| (*archetype, archetypes.count(*archetype)))
        .collect()
}

/// Counts rooms whose centre can be walked to from the spawn room's centre.
///
/// Returns zero when the plan has no spawn room.
#[must_use]
pub fn reachable_room_count(plan: &RoomPlan, walls: &WallField) -> usize {
    let Some(spawn) = plan.spawn_room() else {
        return 0;
    };
    let reach = ReachabilityField::flood(walls, &[spawn.center()]);
    plan.rooms()
        .iter()
        .map(Room::center)
        .filter(|center| reach.is_reached(*center))
        .count()
}

/// Platform tiles emitted on each storey, ground storey first.
#[must_use]
pub fn tiles_per_floor(geometry: &Geometry, floors: u32) -> Vec<usize> {
    (0..floors)
        .map(|floor| geometry.tiles_on_floor(floor))
        .collect()
}

/// Highest tier any filled cell settled on, or zero for an empty field.
#[must_use]
pub fn tallest_tier(heights: &HeightField) -> i32 {
    heights
        .filled_cells()
        .map(|(_, tier)| tier)
        .max()
        .unwrap_or(0)
}

/// Enemies across every planned encounter.
#[must_use]
pub fn enemy_count(encounters: &[EncounterPlan]) -> usize {
    encounters.iter().map(|plan| plan.enemies.len()).sum()
}

/// Barrier panels across every planned encounter.
#[must_use]
pub fn barrier_count(encounters: &[EncounterPlan]) -> usize {
    encounters.iter().map(|plan| plan.barriers.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::{CellCoord, RoomId};

    fn carved(rooms: &[Room]) -> WallField {
        let mut walls = WallField::new(24, 24);
        for room in rooms {
            for cell in room.cells() {
                walls.carve(cell);
            }
        }
        walls
    }

    #[test]
    fn histogram_lists_unused_archetypes() {
        let archetypes = ArchetypeMap::new(BTreeMap::from([
            (RoomId::new(1), RoomArchetype::Staircase),
            (RoomId::new(2), RoomArchetype::Staircase),
        ]));

        let histogram = archetype_histogram(&archetypes);

        assert_eq!(histogram.len(), RoomArchetype::ALL.len());
        assert_eq!(histogram[&RoomArchetype::Staircase], 2);
        assert_eq!(histogram[&RoomArchetype::SmallEmpty], 0);
    }

    #[test]
    fn disconnected_room_is_not_reachable() {
        let spawn = Room::from_origin(2, 2, 6, 6);
        let linked = Room::from_origin(8, 2, 6, 6);
        let island = Room::from_origin(2, 14, 6, 6);
        let walls = carved(&[spawn, linked, island]);
        let plan = RoomPlan::new(vec![spawn, linked, island], 3);

        assert_eq!(reachable_room_count(&plan, &walls), 2);
    }

    #[test]
    fn empty_plan_reaches_nothing() {
        let walls = WallField::new(24, 24);

        assert_eq!(reachable_room_count(&RoomPlan::new(Vec::new(), 0), &walls), 0);
    }

    #[test]
    fn tallest_tier_ignores_solid_cells() {
        let mut walls = WallField::new(24, 24);
        walls.carve(CellCoord::new(3, 3));
        walls.carve(CellCoord::new(4, 3));
        let mut heights = HeightField::new(24, 24);
        heights.seed_from_walls(&walls);
        heights.set_tier(CellCoord::new(4, 3), 2);

        assert_eq!(tallest_tier(&heights), 2);
        assert_eq!(tallest_tier(&HeightField::new(24, 24)), 0);
    }
}
