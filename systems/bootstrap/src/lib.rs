#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Generation pipeline that turns a configuration into an [`Arena`].
//!
//! Stages run strictly in dependency order and share one seeded random
//! source, so an arena is a pure function of its seed and configuration.
//! Staircases are built before tiles and ceilings because both consult the
//! stairwell shafts the staircase stage registers.

use arena_core::{ArenaConfig, ArenaRng};
use arena_system_archetypes::ArchetypePlanner;
use arena_system_doorways::DoorwayScanner;
use arena_system_encounters::{EncounterPlanner, EncounterSite};
use arena_system_heightfield::{relax, HeightFieldGenerator};
use arena_system_layout::LayoutPlanner;
use arena_system_spawning::spawn_point;
use arena_system_staircase::StaircaseBuilder;
use arena_world::{Arena, ArenaParts, Geometry, Grid, GridDims};
use glam::Vec3;

/// Pure bootstrap system that assembles arenas.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Runs every generation stage for the provided configuration.
    ///
    /// The configuration is sanitised first and a random seed, when
    /// requested, is resolved once. The arena records the sanitised
    /// configuration with the resolved seed pinned so it can be replayed.
    #[must_use]
    pub fn generate(&self, config: &ArenaConfig) -> Arena {
        let mut config = config.sanitized();
        let seed = config.resolve_seed();
        config.seed = seed;
        config.use_random_seed = false;
        let mut rng = ArenaRng::new(seed);

        let dims = GridDims::new(config.grid.width, config.grid.depth, config.grid.cell_size);
        let mut grid = Grid::new(dims);
        let rooms =
            LayoutPlanner::new(config.layout.clone()).plan(dims, grid.walls_mut(), &mut rng);

        let (walls, heights) = grid.split_heights_mut();
        heights.seed_from_walls(walls);
        let archetypes =
            ArchetypePlanner::new(config.features.staircase_count).assign(&rooms, &mut rng);

        let generator = HeightFieldGenerator::new(
            config.geometry.clone(),
            config.features.clone(),
            dims.cell_size(),
        );
        generator.populate(&rooms, &archetypes, heights, &mut rng);
        let passes = relax(heights);

        let mut geometry = Geometry::new(dims.width(), dims.depth());
        let ramps = StaircaseBuilder::new(config.geometry.clone(), config.features.clone(), dims)
            .build_all(&rooms, &archetypes, &mut geometry, &mut rng);
        generator.emit_tiles(dims, &rooms, &archetypes, heights, &mut geometry, &mut rng);
        if let Some(spawn) = rooms.spawn_room() {
            let forced = generator.ensure_spawn_platform(spawn.center(), heights, &mut geometry);
            if forced > 0 {
                log::debug!("forced {forced} spawn pad tiles");
            }
        }
        generator.tile_ceilings(walls, &mut geometry);
        generator.extend_parkour_walls(&rooms, &archetypes, walls, &mut geometry);

        let doorways = DoorwayScanner::new(config.layout.corridor_width).scan_all(&rooms, walls);
        let site = EncounterSite {
            dims,
            plan: &rooms,
            archetypes: &archetypes,
            walls,
            heights,
            geometry: &geometry,
            doorways: &doorways,
        };
        let encounters =
            EncounterPlanner::new(config.encounters.clone(), config.geometry.wall_height)
                .plan(&site, &mut rng);

        let spawn_point = rooms
            .spawn_room()
            .map(|room| {
                spawn_point(
                    &dims,
                    &geometry,
                    room,
                    config.spawn.fallback_player_spawn_height,
                )
            })
            .unwrap_or(Vec3::ZERO);

        log::info!(
            "generated arena seed {seed}: {} rooms ({} primary), {} ramps, {} tiles, {} encounters, relaxed in {passes} passes",
            rooms.len(),
            rooms.primary_count(),
            ramps,
            geometry.tiles.len(),
            encounters.len()
        );

        Arena::new(ArenaParts {
            seed,
            config,
            grid,
            rooms,
            archetypes,
            geometry,
            doorways,
            encounters,
            spawn_point,
        })
    }
}
