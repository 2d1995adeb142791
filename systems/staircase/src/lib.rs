#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Ramps connecting adjacent storeys inside staircase rooms.
//!
//! Each staircase room receives one sloped connector along its long axis,
//! flanked by a landing at either end. Cells along the slope are registered
//! as connector heights and opened as stairwell shafts so neither the storey
//! above nor the ceiling tiler closes the way up.

use arena_core::{
    ArenaRng, Axis, CellCoord, FeatureConfig, GeometryConfig, Room, RoomArchetype, RoomId,
};
use arena_world::{
    ArchetypeMap, Geometry, GridDims, PlatformTile, Ramp, RoomPlan, SupportPanel, TileKind,
};
use glam::Vec3;

/// Shortest run, in cells, a ramp needs between its landings.
pub const MIN_RUN: i32 = 4;
/// Cells kept clear between each landing and the room's short wall.
const LANDING_INSET: i32 = 2;
const MIN_SAMPLES: u32 = 4;

/// Builds ramps for every staircase room.
#[derive(Clone, Debug)]
pub struct StaircaseBuilder {
    geometry: GeometryConfig,
    features: FeatureConfig,
    dims: GridDims,
}

impl StaircaseBuilder {
    /// Creates a builder from sanitised tuning.
    #[must_use]
    pub fn new(geometry: GeometryConfig, features: FeatureConfig, dims: GridDims) -> Self {
        Self {
            geometry,
            features,
            dims,
        }
    }

    /// Builds one ramp per staircase room in ascending room order and returns
    /// the number of ramps emitted.
    pub fn build_all(
        &self,
        plan: &RoomPlan,
        archetypes: &ArchetypeMap,
        geometry: &mut Geometry,
        rng: &mut ArenaRng,
    ) -> usize {
        let mut built = 0;
        for id in archetypes.rooms_with(RoomArchetype::Staircase) {
            let Some(room) = plan.room(id) else {
                continue;
            };
            if let Some(ramp) = self.build(id, room, geometry, rng) {
                geometry.ramps.push(ramp);
                built += 1;
            }
        }
        built
    }

    /// Emits both landings and registers the stairwell for a single room.
    ///
    /// Returns `None` without drawing randomness or touching `geometry` when
    /// the room is too short for a ramp or only one storey is stacked.
    pub fn build(
        &self,
        id: RoomId,
        room: &Room,
        geometry: &mut Geometry,
        rng: &mut ArenaRng,
    ) -> Option<Ramp> {
        let axis = room.long_axis();
        let (extent, along_min, along_max, lane) = match axis {
            Axis::X => (room.width(), room.min_x(), room.max_x(), room.center().z()),
            Axis::Z => (room.depth(), room.min_z(), room.max_z(), room.center().x()),
        };
        let available_run = extent - 2 * LANDING_INSET;
        if available_run < MIN_RUN || self.geometry.stacked_floor_count < 2 {
            log::debug!(
                "skipping staircase in room {}: run {available_run}, {} storeys",
                id.get(),
                self.geometry.stacked_floor_count
            );
            return None;
        }

        let top_story = i32::try_from(self.geometry.stacked_floor_count - 2).unwrap_or(0);
        let story = u32::try_from(rng.range_inclusive(0, top_story)).unwrap_or(0);
        let backward = rng.coin();

        let (mut from, mut to) = (along_min + LANDING_INSET, along_max - LANDING_INSET);
        if backward {
            std::mem::swap(&mut from, &mut to);
        }
        let start = lane_cell(axis, from, lane);
        let end = lane_cell(axis, to, lane);

        let wall_height = self.geometry.wall_height;
        let low = story as f32 * wall_height;
        let high = low + wall_height;
        let start_point = self.dims.cell_to_world(start, low);
        let end_point = self.dims.cell_to_world(end, high);

        geometry.tiles.push(self.landing(start, story, low));
        geometry.tiles.push(self.landing(end, story + 1, high));

        let heading = Vec3::new(end_point.x - start_point.x, 0.0, end_point.z - start_point.z);
        let run = heading.length();
        let rise = wall_height;
        let support = (story == 0).then(|| self.support(start_point, end_point, axis, rise));

        let samples = MIN_SAMPLES.max((run / self.dims.cell_size()) as u32 + 2);
        for sample in 0..samples {
            let t = sample as f32 / (samples - 1) as f32;
            let along = (from as f32 + (to - from) as f32 * t).round() as i32;
            let cell = lane_cell(axis, along, lane);
            geometry.connectors.register(cell, low + rise * t);
            geometry.shafts.insert_block(cell);
        }

        Some(Ramp {
            room: id,
            story,
            start,
            end,
            start_point,
            end_point,
            pitch: -rise.atan2(run),
            yaw: heading.x.atan2(heading.z),
            length: run.hypot(rise),
            steps: self.features.stair_steps_per_floor.clamp(3, 8),
            support,
        })
    }

    fn landing(&self, cell: CellCoord, floor: u32, top: f32) -> PlatformTile {
        PlatformTile {
            cell,
            floor,
            tier: 0,
            top,
            footprint: self.dims.cell_size(),
            thickness: self.geometry.floor_thickness,
            kind: TileKind::Landing,
        }
    }

    /// Vertical panel filling the lower half of the space under a ground
    /// storey ramp.
    fn support(&self, start: Vec3, end: Vec3, axis: Axis, rise: f32) -> SupportPanel {
        let middle = start.lerp(end, 0.5);
        let span = (end - start).abs();
        let thickness = self.dims.cell_size() * 0.5;
        let size = match axis {
            Axis::X => Vec3::new(span.x, rise * 0.5, thickness),
            Axis::Z => Vec3::new(thickness, rise * 0.5, span.z),
        };
        SupportPanel {
            center: Vec3::new(middle.x, start.y + rise * 0.25, middle.z),
            size,
        }
    }
}

fn lane_cell(axis: Axis, along: i32, lane: i32) -> CellCoord {
    match axis {
        Axis::X => CellCoord::new(along, lane),
        Axis::Z => CellCoord::new(lane, along),
    }
}
