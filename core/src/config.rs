//! Tunable parameters for arena generation.
//!
//! Every field has a default and every value is accepted: [`ArenaConfig::sanitized`]
//! clamps out-of-range input into the supported envelope instead of rejecting it.

use serde::{Deserialize, Serialize};

use crate::ArenaRng;

/// Smallest width or depth, in cells, a generated grid may have.
pub const MIN_GRID_EXTENT: u32 = 24;

/// Complete parameter set for one arena build.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Seed used when `use_random_seed` is unset.
    pub seed: u64,
    /// Draws a fresh seed from system entropy for every build.
    pub use_random_seed: bool,
    /// Grid dimensions.
    pub grid: GridConfig,
    /// Room placement and corridor tuning.
    pub layout: LayoutConfig,
    /// Vertical dimensions of the generated geometry.
    pub geometry: GeometryConfig,
    /// Per-archetype feature tuning.
    pub features: FeatureConfig,
    /// Encounter population.
    pub encounters: EncounterConfig,
    /// Player spawn placement.
    pub spawn: SpawnConfig,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            use_random_seed: false,
            grid: GridConfig::default(),
            layout: LayoutConfig::default(),
            geometry: GeometryConfig::default(),
            features: FeatureConfig::default(),
            encounters: EncounterConfig::default(),
            spawn: SpawnConfig::default(),
        }
    }
}

impl ArenaConfig {
    /// Returns a copy with every field clamped into its supported range.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            seed: self.seed,
            use_random_seed: self.use_random_seed,
            grid: self.grid.sanitized(),
            layout: self.layout.sanitized(),
            geometry: self.geometry.sanitized(),
            features: self.features.sanitized(),
            encounters: self.encounters.sanitized(),
            spawn: self.spawn.sanitized(),
        }
    }

    /// Seed the next build should use.
    #[must_use]
    pub fn resolve_seed(&self) -> u64 {
        if self.use_random_seed {
            ArenaRng::entropy_seed()
        } else {
            self.seed
        }
    }
}

/// Grid dimensions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Number of cells along the x axis.
    pub width: u32,
    /// Number of cells along the z axis.
    pub depth: u32,
    /// Edge length of a cell in world units.
    pub cell_size: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 96,
            depth: 96,
            cell_size: 4.0,
        }
    }
}

impl GridConfig {
    fn sanitized(&self) -> Self {
        Self {
            width: self.width.max(MIN_GRID_EXTENT),
            depth: self.depth.max(MIN_GRID_EXTENT),
            cell_size: positive_or(self.cell_size, 4.0).max(0.1),
        }
    }
}

/// Room placement and corridor tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Number of rooms the planner tries to place, spawn room included.
    pub desired_room_count: u32,
    /// Smallest room edge in cells.
    pub min_room_size: u32,
    /// Largest room edge in cells.
    pub max_room_size: u32,
    /// Corridor width in cells.
    pub corridor_width: u32,
    /// Radius in cells kept open around the spawn point.
    pub spawn_clear_radius: u32,
    /// Probability that a corridor takes the three-segment route.
    pub long_corridor_chance: f32,
    /// Probability that a sampled room edge comes from the upper size band.
    pub large_room_bias: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            desired_room_count: 14,
            min_room_size: 8,
            max_room_size: 26,
            corridor_width: 1,
            spawn_clear_radius: 5,
            long_corridor_chance: 0.65,
            large_room_bias: 0.72,
        }
    }
}

impl LayoutConfig {
    fn sanitized(&self) -> Self {
        let min_room_size = self.min_room_size.clamp(4, 20);
        Self {
            desired_room_count: self.desired_room_count.clamp(6, 36),
            min_room_size,
            max_room_size: self.max_room_size.clamp(5, 32).max(min_room_size),
            corridor_width: self.corridor_width.clamp(1, 4),
            spawn_clear_radius: self.spawn_clear_radius.min(16),
            long_corridor_chance: unit_or(self.long_corridor_chance, 0.65),
            large_room_bias: unit_or(self.large_room_bias, 0.72),
        }
    }
}

/// Vertical dimensions of the generated geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Height of one storey in world units.
    pub wall_height: f32,
    /// Height of one platform tier in world units.
    pub platform_level_height: f32,
    /// Thickness of regular floor tiles.
    pub floor_thickness: f32,
    /// Thickness of ceiling panels.
    pub ceiling_thickness: f32,
    /// Smallest parkour tile footprint as a fraction of the cell size.
    pub platform_footprint_min: f32,
    /// Largest parkour tile footprint as a fraction of the cell size.
    pub platform_footprint_max: f32,
    /// Number of storeys stacked on top of each other.
    pub stacked_floor_count: u32,
    /// Upper bound on platform tiers inside a room.
    pub max_floors: u32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            wall_height: 18.0,
            platform_level_height: 1.5,
            floor_thickness: 0.5,
            ceiling_thickness: 0.4,
            platform_footprint_min: 0.55,
            platform_footprint_max: 0.85,
            stacked_floor_count: 2,
            max_floors: 6,
        }
    }
}

impl GeometryConfig {
    fn sanitized(&self) -> Self {
        let footprint_a = positive_or(self.platform_footprint_min, 0.55).clamp(0.1, 1.0);
        let footprint_b = positive_or(self.platform_footprint_max, 0.85).clamp(0.1, 1.0);
        let max_floors = self.max_floors.clamp(2, 8);
        Self {
            wall_height: positive_or(self.wall_height, 18.0).max(1.0),
            platform_level_height: positive_or(self.platform_level_height, 1.5).max(0.1),
            floor_thickness: positive_or(self.floor_thickness, 0.5),
            ceiling_thickness: positive_or(self.ceiling_thickness, 0.4),
            platform_footprint_min: footprint_a.min(footprint_b),
            platform_footprint_max: footprint_a.max(footprint_b),
            stacked_floor_count: self.stacked_floor_count.clamp(1, max_floors),
            max_floors,
        }
    }

    /// Highest tier any height-field rule may assign.
    #[must_use]
    pub fn max_tier(&self) -> i32 {
        i32::try_from(self.max_floors.clamp(2, 8)).unwrap_or(2)
    }
}

/// Per-archetype feature tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Upper bound on rooms tagged as staircases.
    pub staircase_count: u32,
    /// Upper bound on platforms in a scattered hallway.
    pub parkour_step_count: u32,
    /// Thickness of parkour platforms.
    pub parkour_step_height: f32,
    /// Height the vertical parkour spiral aims for.
    pub tall_platform_height: f32,
    /// Number of visual steps on each ramp.
    pub stair_steps_per_floor: u32,
    /// Whether boundary walls of parkour rooms are extended upward.
    pub extend_parkour_walls: bool,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            staircase_count: 4,
            parkour_step_count: 5,
            parkour_step_height: 0.45,
            tall_platform_height: 9.0,
            stair_steps_per_floor: 5,
            extend_parkour_walls: true,
        }
    }
}

impl FeatureConfig {
    fn sanitized(&self) -> Self {
        Self {
            staircase_count: self.staircase_count.min(16),
            parkour_step_count: self.parkour_step_count.clamp(3, 6),
            parkour_step_height: positive_or(self.parkour_step_height, 0.45),
            tall_platform_height: positive_or(self.tall_platform_height, 9.0),
            stair_steps_per_floor: self.stair_steps_per_floor.clamp(3, 8),
            extend_parkour_walls: self.extend_parkour_walls,
        }
    }
}

/// Encounter population.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Whether encounter rooms receive enemies and barriers.
    pub enabled: bool,
    /// Fewest enemies spawned in an encounter room.
    pub min_enemies_per_room: u32,
    /// Most enemies spawned in an encounter room before the size bonus.
    pub max_enemies_per_room: u32,
    /// Barrier panel thickness in world units.
    pub barrier_thickness: f32,
    /// Whether entering an encounter raises its barriers.
    pub lock_on_enter: bool,
    /// Enemy variants available to encounter rooms.
    pub variants: Vec<EnemyVariant>,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_enemies_per_room: 2,
            max_enemies_per_room: 5,
            barrier_thickness: 0.45,
            lock_on_enter: true,
            variants: EnemyVariant::defaults(),
        }
    }
}

impl EncounterConfig {
    fn sanitized(&self) -> Self {
        let min_enemies_per_room = self.min_enemies_per_room.clamp(1, 32);
        let variants = if self.variants.is_empty() {
            EnemyVariant::defaults()
        } else {
            self.variants.iter().map(EnemyVariant::sanitized).collect()
        };
        Self {
            enabled: self.enabled,
            min_enemies_per_room,
            max_enemies_per_room: self.max_enemies_per_room.clamp(min_enemies_per_room, 32),
            barrier_thickness: positive_or(self.barrier_thickness, 0.45),
            lock_on_enter: self.lock_on_enter,
            variants,
        }
    }
}

/// Stat block for one kind of enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyVariant {
    /// Display name.
    pub name: String,
    /// Relative weight in the variant roll.
    pub spawn_weight: f32,
    /// Starting health.
    pub health: f32,
    /// Smallest uniform scale.
    pub size_min: f32,
    /// Largest uniform scale.
    pub size_max: f32,
    /// Movement speed in world units per second.
    pub move_speed: f32,
    /// Radius within which the enemy notices the player.
    pub vision_radius: f32,
    /// Damage dealt per hit.
    pub contact_damage: f32,
    /// Reach of an attack.
    pub attack_range: f32,
    /// Seconds between attacks.
    pub attack_cooldown: f32,
}

impl Default for EnemyVariant {
    fn default() -> Self {
        Self::grunt()
    }
}

impl EnemyVariant {
    /// The stock roster: a balanced grunt, a fast runner and a heavy brute.
    #[must_use]
    pub fn defaults() -> Vec<EnemyVariant> {
        vec![
            Self::grunt(),
            Self {
                name: "Runner".to_owned(),
                spawn_weight: 1.0,
                health: 55.0,
                size_min: 0.85,
                size_max: 1.0,
                move_speed: 8.0,
                vision_radius: 40.0,
                contact_damage: 7.0,
                attack_range: 2.0,
                attack_cooldown: 0.45,
            },
            Self {
                name: "Brute".to_owned(),
                spawn_weight: 0.7,
                health: 180.0,
                size_min: 1.3,
                size_max: 1.6,
                move_speed: 3.2,
                vision_radius: 30.0,
                contact_damage: 18.0,
                attack_range: 2.8,
                attack_cooldown: 1.2,
            },
        ]
    }

    fn grunt() -> Self {
        Self {
            name: "Grunt".to_owned(),
            spawn_weight: 1.6,
            health: 100.0,
            size_min: 1.0,
            size_max: 1.2,
            move_speed: 5.0,
            vision_radius: 35.0,
            contact_damage: 10.0,
            attack_range: 2.2,
            attack_cooldown: 0.8,
        }
    }

    fn sanitized(&self) -> Self {
        let size_a = positive_or(self.size_min, 1.0);
        let size_b = positive_or(self.size_max, 1.0);
        Self {
            name: self.name.clone(),
            spawn_weight: positive_or(self.spawn_weight, 0.01).max(0.01),
            health: positive_or(self.health, 1.0),
            size_min: size_a.min(size_b),
            size_max: size_a.max(size_b),
            move_speed: self.move_speed.max(0.0),
            vision_radius: self.vision_radius.max(0.0),
            contact_damage: self.contact_damage.max(0.0),
            attack_range: self.attack_range.max(0.0),
            attack_cooldown: self.attack_cooldown.max(0.0),
        }
    }
}

/// Player spawn placement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Whether the player is moved onto the spawn platform automatically.
    pub auto_position_player: bool,
    /// Height above the platform top at which the player is placed.
    pub fallback_player_spawn_height: f32,
    /// Ticks to wait for the player entity before giving up.
    pub max_spawn_attempts: u32,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            auto_position_player: true,
            fallback_player_spawn_height: 1.0,
            max_spawn_attempts: 180,
        }
    }
}

impl SpawnConfig {
    fn sanitized(&self) -> Self {
        Self {
            auto_position_player: self.auto_position_player,
            fallback_player_spawn_height: if self.fallback_player_spawn_height.is_finite() {
                self.fallback_player_spawn_height
            } else {
                1.0
            },
            max_spawn_attempts: self.max_spawn_attempts.max(1),
        }
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

fn unit_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        fallback
    }
}
