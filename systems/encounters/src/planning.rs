//! Enemy and barrier placement for encounter rooms.

use std::collections::BTreeMap;

use arena_core::{ArenaRng, CellCoord, Doorway, EncounterConfig, EnemyVariant, Room, RoomId};
use arena_system_doorways::barrier_for;
use arena_world::{
    ArchetypeMap, EncounterPlan, EnemySpawn, Geometry, GridDims, HeightField, RoomPlan, WallField,
};

const ATTEMPTS_PER_ENEMY: i32 = 20;
const MIN_VARIANT_WEIGHT: f32 = 0.01;

/// Read-only generation outputs the planner places enemies against.
#[derive(Clone, Copy, Debug)]
pub struct EncounterSite<'a> {
    /// Grid dimensions.
    pub dims: GridDims,
    /// Placed rooms.
    pub plan: &'a RoomPlan,
    /// Archetype per room.
    pub archetypes: &'a ArchetypeMap,
    /// Carved wall field.
    pub walls: &'a WallField,
    /// Relaxed height field.
    pub heights: &'a HeightField,
    /// Emitted geometry, used for standing heights.
    pub geometry: &'a Geometry,
    /// Doorways per room.
    pub doorways: &'a BTreeMap<RoomId, Vec<Doorway>>,
}

/// Turns encounter-archetype rooms into enemy rosters and barrier panels.
#[derive(Clone, Debug)]
pub struct EncounterPlanner {
    config: EncounterConfig,
    wall_height: f32,
}

impl EncounterPlanner {
    /// Creates a planner from sanitised encounter tuning.
    #[must_use]
    pub fn new(config: EncounterConfig, wall_height: f32) -> Self {
        Self {
            config,
            wall_height,
        }
    }

    /// Plans every encounter room in ascending room order.
    ///
    /// Returns nothing when encounters are disabled.
    pub fn plan(&self, site: &EncounterSite<'_>, rng: &mut ArenaRng) -> Vec<EncounterPlan> {
        if !self.config.enabled {
            return Vec::new();
        }
        let spawn_area = site.plan.spawn_room().map_or(0, Room::area);

        site.archetypes
            .iter()
            .filter(|(_, archetype)| archetype.is_encounter())
            .filter_map(|(id, _)| site.plan.room(id).map(|room| (id, room)))
            .map(|(id, room)| self.plan_room(site, id, room, spawn_area, rng))
            .collect()
    }

    fn plan_room(
        &self,
        site: &EncounterSite<'_>,
        id: RoomId,
        room: &Room,
        spawn_area: i32,
        rng: &mut ArenaRng,
    ) -> EncounterPlan {
        let barriers = site
            .doorways
            .get(&id)
            .into_iter()
            .flatten()
            .map(|doorway| {
                barrier_for(
                    id,
                    *doorway,
                    &site.dims,
                    self.wall_height,
                    self.config.barrier_thickness,
                )
            })
            .collect();

        let count = self.enemy_count(room, spawn_area, rng);
        let mut enemies = Vec::new();
        for _ in 0..count.saturating_mul(ATTEMPTS_PER_ENEMY) {
            if i32::try_from(enemies.len()).unwrap_or(i32::MAX) >= count {
                break;
            }
            let cell = CellCoord::new(
                rng.range(room.min_x() + 1, room.max_x()),
                rng.range(room.min_z() + 1, room.max_z()),
            );
            if site.walls.is_solid(cell) || !site.heights.is_filled(cell) {
                continue;
            }
            let Some((variant, stats)) = pick_variant(&self.config.variants, rng)
                .and_then(|index| Some((index, self.config.variants.get(index)?)))
            else {
                break;
            };
            let standing = site.geometry.top_height(cell).unwrap_or(0.0);
            enemies.push(EnemySpawn {
                room: id,
                cell,
                position: site.dims.cell_to_world(cell, standing),
                variant,
                scale: rng.range_f32(stats.size_min, stats.size_max),
                health: stats.health,
            });
        }

        if i32::try_from(enemies.len()).unwrap_or(i32::MAX) < count {
            log::debug!(
                "room {} placed {} of {count} enemies",
                id.get(),
                enemies.len()
            );
        }

        EncounterPlan {
            room: id,
            lock_on_enter: self.config.lock_on_enter,
            barriers,
            enemies,
        }
    }

    /// Uniform count between the configured bounds, plus one for rooms
    /// larger than the spawn room.
    fn enemy_count(&self, room: &Room, spawn_area: i32, rng: &mut ArenaRng) -> i32 {
        let min = i32::try_from(self.config.min_enemies_per_room.max(1)).unwrap_or(1);
        let max = i32::try_from(self.config.max_enemies_per_room)
            .unwrap_or(min)
            .max(min);
        let bonus = i32::from(room.area() > spawn_area);
        rng.range_inclusive(min, max) + bonus
    }
}

/// Weighted roll over the variant roster. Weights below 0.01 count as 0.01.
pub fn pick_variant(variants: &[EnemyVariant], rng: &mut ArenaRng) -> Option<usize> {
    let last = variants.len().checked_sub(1)?;
    let weight = |variant: &EnemyVariant| variant.spawn_weight.max(MIN_VARIANT_WEIGHT);
    let total: f32 = variants.iter().map(weight).sum();
    let roll = rng.value() * total;

    let mut cumulative = 0.0;
    for (index, variant) in variants.iter().enumerate() {
        cumulative += weight(variant);
        if roll <= cumulative {
            return Some(index);
        }
    }
    Some(last)
}
