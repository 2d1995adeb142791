#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Room placement and corridor carving.
//!
//! The planner centres a spawn room on the grid, rejection-samples further
//! rooms with one cell of padding and links each new room to the previously
//! accepted one. When the target count is not met it runs a relaxed pass with
//! smaller rooms and no padding, linking each room to its nearest neighbour.
//! Running short is a degraded result, never an error.

mod corridor;

use arena_core::{ArenaRng, LayoutConfig, Room};
use arena_world::{GridDims, RoomPlan, WallField};

pub use corridor::{carve_corridor, carve_square, carve_line};

const PRIMARY_ATTEMPTS_PER_ROOM: u32 = 80;
const FALLBACK_ATTEMPTS_PER_ROOM: u32 = 140;
const SIZE_SPLIT: f32 = 0.55;
const MIN_EDGE: i32 = 4;

/// Places rooms and carves them into the wall field.
#[derive(Clone, Debug)]
pub struct LayoutPlanner {
    config: LayoutConfig,
}

impl LayoutPlanner {
    /// Creates a planner from sanitised layout tuning.
    #[must_use]
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Places every room, carving rooms and corridors into `walls`, and
    /// re-seals the border ring before returning.
    pub fn plan(&self, dims: GridDims, walls: &mut WallField, rng: &mut ArenaRng) -> RoomPlan {
        let width = dims.width_i32();
        let depth = dims.depth_i32();
        let fit = (width.min(depth) - 3).max(MIN_EDGE);
        let max_size = to_i32(self.config.max_room_size).min(fit);
        let min_size = to_i32(self.config.min_room_size).min(max_size);
        let target = usize::try_from(self.config.desired_room_count.max(6)).unwrap_or(6);
        let radius = to_i32(self.config.corridor_width).max(1) - 1;

        let spawn = self.spawn_room(width, depth, min_size, max_size);
        carve_room(walls, &spawn);
        let mut rooms = vec![spawn];

        let mut attempts = to_u32(target).saturating_mul(PRIMARY_ATTEMPTS_PER_ROOM);
        while rooms.len() < target && attempts > 0 {
            attempts -= 1;
            let room_width = sample_size(rng, min_size, max_size, self.config.large_room_bias);
            let room_depth = sample_size(rng, min_size, max_size, self.config.large_room_bias);
            let candidate = random_placement(rng, width, depth, room_width, room_depth);
            if rooms.iter().any(|room| room.intersects(&candidate, 1)) {
                continue;
            }

            carve_room(walls, &candidate);
            if let Some(previous) = rooms.last() {
                carve_corridor(
                    walls,
                    previous.center(),
                    candidate.center(),
                    radius,
                    self.config.long_corridor_chance,
                    rng,
                );
            }
            rooms.push(candidate);
        }

        let primary_count = rooms.len();
        if rooms.len() < target {
            log::debug!(
                "primary pass placed {} of {} rooms, relaxing placement",
                rooms.len(),
                target
            );
            self.fallback_pass(
                &mut rooms,
                walls,
                rng,
                (width, depth),
                (min_size, max_size),
                target,
            );
        }

        walls.seal_border();
        log::debug!(
            "placed {} rooms ({} primary) on a {}x{} grid",
            rooms.len(),
            primary_count,
            width,
            depth
        );
        RoomPlan::new(rooms, primary_count)
    }

    fn spawn_room(&self, width: i32, depth: i32, min_size: i32, max_size: i32) -> Room {
        let radius = to_i32(self.config.spawn_clear_radius);
        let size = (radius * 2)
            .max(min_size + 1)
            .clamp(min_size, max_size + 2)
            .min((width.min(depth) - 3).max(MIN_EDGE));
        let origin_x = (width / 2 - size / 2).clamp(1, (width - 2 - size).max(1));
        let origin_z = (depth / 2 - size / 2).clamp(1, (depth - 2 - size).max(1));
        Room::from_origin(origin_x, origin_z, size, size)
    }

    fn fallback_pass(
        &self,
        rooms: &mut Vec<Room>,
        walls: &mut WallField,
        rng: &mut ArenaRng,
        (width, depth): (i32, i32),
        (min_size, max_size): (i32, i32),
        target: usize,
    ) {
        let min_size = (min_size - 2).max(MIN_EDGE);
        let max_size = (max_size - 2).max(min_size);
        let radius = to_i32(self.config.corridor_width).max(1) - 1;
        let remaining = to_u32(target.saturating_sub(rooms.len()));
        let mut attempts = remaining.saturating_mul(FALLBACK_ATTEMPTS_PER_ROOM);

        while rooms.len() < target && attempts > 0 {
            attempts -= 1;
            let room_width = sample_size(rng, min_size, max_size, 0.0);
            let room_depth = sample_size(rng, min_size, max_size, 0.0);
            let candidate = random_placement(rng, width, depth, room_width, room_depth);
            if rooms.iter().any(|room| room.intersects(&candidate, 0)) {
                continue;
            }

            carve_room(walls, &candidate);
            if let Some(nearest) = nearest_room(rooms, &candidate) {
                carve_corridor(
                    walls,
                    nearest.center(),
                    candidate.center(),
                    radius,
                    self.config.long_corridor_chance,
                    rng,
                );
            }
            rooms.push(candidate);
        }
    }
}

/// Samples a room edge from `[min, max]`, drawing from the band above the
/// split point with probability `bias` and from the band below otherwise.
pub fn sample_size(rng: &mut ArenaRng, min: i32, max: i32, bias: f32) -> i32 {
    let low = min.max(MIN_EDGE);
    let high = max.max(low);
    let split = (low as f32 + (high - low) as f32 * SIZE_SPLIT).round() as i32;
    let split = split.clamp(low, high);

    if rng.chance(bias) {
        rng.range_inclusive(split, high)
    } else {
        rng.range_inclusive(low, split)
    }
}

/// Room with the closest centre by Manhattan distance. Earlier rooms win ties.
#[must_use]
pub fn nearest_room<'a>(rooms: &'a [Room], candidate: &Room) -> Option<&'a Room> {
    let target = candidate.center();
    let mut best: Option<(&Room, u32)> = None;
    for room in rooms {
        let distance = room.center().manhattan_distance(target);
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((room, distance)),
        }
    }
    best.map(|(room, _)| room)
}

fn random_placement(
    rng: &mut ArenaRng,
    width: i32,
    depth: i32,
    room_width: i32,
    room_depth: i32,
) -> Room {
    let x = rng.range(1, width - room_width - 1);
    let z = rng.range(1, depth - room_depth - 1);
    Room::from_origin(x, z, room_width, room_depth)
}

fn carve_room(walls: &mut WallField, room: &Room) {
    for cell in room.cells() {
        walls.carve(cell);
    }
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn biased_sizes_stay_in_range() {
        let mut rng = ArenaRng::new(5);
        for _ in 0..2000 {
            let size = sample_size(&mut rng, 8, 26, 0.72);
            assert!((8..=26).contains(&size));
        }
    }

    #[test]
    fn zero_bias_keeps_lower_band() {
        let mut rng = ArenaRng::new(5);
        for _ in 0..500 {
            assert!(sample_size(&mut rng, 8, 26, 0.0) <= 18);
        }
    }

    #[test]
    fn full_bias_keeps_upper_band() {
        let mut rng = ArenaRng::new(5);
        for _ in 0..500 {
            assert!(sample_size(&mut rng, 8, 26, 1.0) >= 18);
        }
    }

    #[test]
    fn nearest_room_prefers_first_on_tie() {
        let rooms = [
            Room::from_bounds(0, 0, 2, 2),
            Room::from_bounds(10, 0, 12, 2),
            Room::from_bounds(20, 0, 22, 2),
        ];
        let candidate = Room::from_bounds(5, 0, 7, 2);

        let nearest = nearest_room(&rooms, &candidate).expect("rooms present");

        assert_eq!(nearest, &rooms[0]);
    }

    #[test]
    fn spawn_room_is_centred() {
        let planner = LayoutPlanner::new(LayoutConfig::default());

        let spawn = planner.spawn_room(96, 96, 8, 26);

        assert_eq!(spawn.width(), 10);
        assert_eq!(spawn.min_x(), 43);
        assert_eq!(spawn.center().x(), 47);
    }
}
