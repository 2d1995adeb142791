#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Height-field population, smoothing and tile emission.
//!
//! The generator runs each room's archetype rule over its interior, relaxes
//! the whole field until no filled cell stands more than one tier above its
//! lowest filled neighbour, and then turns the field into platform tiles,
//! ceiling panels and parkour wall extensions.

mod rules;
mod tiles;

use arena_core::{ArenaRng, FeatureConfig, GeometryConfig};
use arena_world::{ArchetypeMap, HeightField, RoomPlan};

pub use rules::{apply_rule, RuleTuning};

/// Smallest number of relaxation sweeps, even when the field is already
/// smooth after the first one.
pub const MIN_RELAX_PASSES: u32 = 3;

/// Shapes the height field and emits the geometry standing on it.
#[derive(Clone, Debug)]
pub struct HeightFieldGenerator {
    geometry: GeometryConfig,
    features: FeatureConfig,
    cell_size: f32,
}

impl HeightFieldGenerator {
    /// Creates a generator from sanitised tuning.
    #[must_use]
    pub fn new(geometry: GeometryConfig, features: FeatureConfig, cell_size: f32) -> Self {
        Self {
            geometry,
            features,
            cell_size,
        }
    }

    /// Tier limits derived from the configuration.
    #[must_use]
    pub fn tuning(&self) -> RuleTuning {
        let max_tier = self.geometry.max_tier();
        let spiral_top = (self.features.tall_platform_height / self.geometry.platform_level_height)
            .round() as i32;
        RuleTuning {
            max_tier,
            spiral_top: spiral_top.clamp(2, max_tier),
            scatter_max: i32::try_from(self.features.parkour_step_count)
                .unwrap_or(6)
                .clamp(3, 6),
        }
    }

    /// Runs every assigned room's archetype rule in ascending room order.
    pub fn populate(
        &self,
        plan: &RoomPlan,
        archetypes: &ArchetypeMap,
        heights: &mut HeightField,
        rng: &mut ArenaRng,
    ) {
        let tuning = self.tuning();
        for (id, archetype) in archetypes.iter() {
            if let Some(room) = plan.room(id) {
                apply_rule(archetype, room, heights, &tuning, rng);
            }
        }
    }
}

/// Lowers filled cells standing more than one tier above their lowest filled
/// orthogonal neighbour.
///
/// Sweeps in row-major order at least [`MIN_RELAX_PASSES`] times and keeps
/// going until a sweep changes nothing. Tiers only ever decrease, so the loop
/// terminates. Returns the number of sweeps performed.
pub fn relax(heights: &mut HeightField) -> u32 {
    let mut passes = 0;
    loop {
        passes += 1;
        let changed = relax_pass(heights);
        if passes >= MIN_RELAX_PASSES && !changed {
            log::debug!("height field settled after {passes} relaxation passes");
            return passes;
        }
    }
}

fn relax_pass(heights: &mut HeightField) -> bool {
    let filled: Vec<_> = heights.filled_cells().map(|(cell, _)| cell).collect();
    let mut changed = false;

    for cell in filled {
        let tier = heights.tier(cell);
        let lowest = cell
            .orthogonal_neighbors()
            .into_iter()
            .map(|neighbor| heights.tier(neighbor))
            .filter(|neighbor| *neighbor >= 0)
            .min();
        if let Some(lowest) = lowest {
            if tier > lowest + 1 {
                heights.set_tier(cell, lowest + 1);
                changed = true;
            }
        }
    }

    changed
}

/// Largest tier difference between orthogonally adjacent filled cells.
#[must_use]
pub fn max_adjacent_delta(heights: &HeightField) -> i32 {
    heights
        .filled_cells()
        .flat_map(|(cell, tier)| {
            [cell.offset(1, 0), cell.offset(0, 1)]
                .into_iter()
                .map(move |neighbor| (tier, neighbor))
        })
        .filter_map(|(tier, neighbor)| {
            let other = heights.tier(neighbor);
            (other >= 0).then(|| (tier - other).abs())
        })
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::CellCoord;

    #[test]
    fn relaxation_caps_cliffs() {
        let mut heights = HeightField::new(5, 1);
        for x in 0..5 {
            heights.set_tier(CellCoord::new(x, 0), 0);
        }
        heights.set_tier(CellCoord::new(2, 0), 6);

        let passes = relax(&mut heights);

        assert_eq!(heights.tier(CellCoord::new(2, 0)), 1);
        assert_eq!(max_adjacent_delta(&heights), 1);
        assert!(passes >= MIN_RELAX_PASSES);
    }

    #[test]
    fn isolated_platforms_keep_their_tier() {
        let mut heights = HeightField::new(5, 5);
        heights.set_tier(CellCoord::new(2, 2), 5);

        let _ = relax(&mut heights);

        assert_eq!(heights.tier(CellCoord::new(2, 2)), 5);
    }

    #[test]
    fn staircase_of_tiers_needs_several_sweeps() {
        let mut heights = HeightField::new(6, 1);
        for (x, tier) in [0, 5, 5, 5, 5, 5].into_iter().enumerate() {
            heights.set_tier(CellCoord::new(i32::try_from(x).unwrap_or(0), 0), tier);
        }

        let _ = relax(&mut heights);

        let tiers: Vec<i32> = (0..6).map(|x| heights.tier(CellCoord::new(x, 0))).collect();
        assert_eq!(tiers, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn tuning_follows_configuration() {
        let generator = HeightFieldGenerator::new(
            GeometryConfig::default(),
            FeatureConfig::default(),
            4.0,
        );

        let tuning = generator.tuning();

        assert_eq!(tuning.max_tier, 6);
        assert_eq!(tuning.spiral_top, 6);
        assert_eq!(tuning.scatter_max, 5);
    }
}
