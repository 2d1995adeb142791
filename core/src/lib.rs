#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the arena generator.
//!
//! This crate defines the vocabulary every other crate speaks: grid cells,
//! rooms, archetypes and doorways produced by generation, plus the message
//! surface that drives the runtime half of the arena. Hosts submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command
//! batches.

mod config;
mod rng;

use std::time::Duration;

use glam::Vec3;
use serde::{Deserialize, Serialize};

pub use config::{
    ArenaConfig, EncounterConfig, EnemyVariant, FeatureConfig, GeometryConfig, GridConfig,
    LayoutConfig, SpawnConfig, MIN_GRID_EXTENT,
};
pub use rng::ArenaRng;

/// Area, in cells, at or above which a room counts as large.
pub const LARGE_ROOM_AREA: i32 = 170;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Reports that a physical body crossed into a room's encounter trigger.
    EnterTrigger {
        /// Room whose trigger volume was entered.
        room: RoomId,
        /// Body that caused the overlap.
        body: Body,
    },
    /// Toggles whether an entity participates in the simulation.
    SetEntityEnabled {
        /// Entity receiving the toggle.
        entity: EntityHandle,
        /// Whether the entity should be active after the command.
        enabled: bool,
    },
    /// Applies damage to an entity, destroying it once its health is exhausted.
    DamageEntity {
        /// Entity receiving the damage.
        entity: EntityHandle,
        /// Amount of health removed.
        amount: f32,
    },
    /// Removes an entity from the world immediately.
    DestroyEntity {
        /// Entity to remove.
        entity: EntityHandle,
    },
    /// Announces that the host created the player entity.
    RegisterPlayer,
    /// Moves the player entity to the provided world position.
    PlacePlayer {
        /// World-space position of the player's feet.
        position: Vec3,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a body entered a room's encounter trigger.
    TriggerEntered {
        /// Room whose trigger volume was entered.
        room: RoomId,
        /// Body that caused the overlap.
        body: Body,
    },
    /// Confirms that an entity changed its enabled flag.
    EntityToggled {
        /// Entity whose flag changed.
        entity: EntityHandle,
        /// Flag value after the change.
        enabled: bool,
    },
    /// Confirms that an entity lost health but survived.
    EntityDamaged {
        /// Entity that was damaged.
        entity: EntityHandle,
        /// Health left after the hit.
        remaining: f32,
    },
    /// Confirms that an entity was removed from the world.
    EntityDestroyed {
        /// Entity that no longer exists.
        entity: EntityHandle,
    },
    /// Confirms that the player entity now exists.
    PlayerRegistered,
    /// Confirms that the player entity was moved.
    PlayerPlaced {
        /// World-space position of the player's feet.
        position: Vec3,
    },
}

/// Physical body that may overlap a trigger volume.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Body {
    /// The player character.
    Player,
    /// Any entity tracked by the world's entity table.
    Entity(EntityHandle),
    /// A body the world does not track, such as debris.
    Other,
}

/// Location of a single grid cell on the horizontal plane.
///
/// Coordinates are signed so that neighbour arithmetic can step outside the
/// grid; bounds checks happen at the field accessors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    z: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell along the depth axis.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Returns the cell displaced by the provided deltas.
    #[must_use]
    pub const fn offset(&self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }

    /// Returns the neighbouring cell in the provided direction.
    #[must_use]
    pub const fn step(&self, direction: Direction) -> Self {
        let (dx, dz) = direction.offset();
        self.offset(dx, dz)
    }

    /// Manhattan distance between two cells.
    #[must_use]
    pub const fn manhattan_distance(&self, other: CellCoord) -> u32 {
        self.x.abs_diff(other.x) + self.z.abs_diff(other.z)
    }

    /// The four orthogonal neighbours in north, east, south, west order.
    #[must_use]
    pub const fn orthogonal_neighbors(&self) -> [CellCoord; 4] {
        [
            self.step(Direction::North),
            self.step(Direction::East),
            self.step(Direction::South),
            self.step(Direction::West),
        ]
    }
}

/// Cardinal directions on the grid. North points towards increasing `z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// Towards increasing `z`.
    North,
    /// Towards increasing `x`.
    East,
    /// Towards decreasing `z`.
    South,
    /// Towards decreasing `x`.
    West,
}

impl Direction {
    /// Unit cell offset `(dx, dz)` for the direction.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }

    /// Axis the direction travels along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::North | Self::South => Axis::Z,
            Self::East | Self::West => Axis::X,
        }
    }
}

/// Horizontal grid axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// The width axis.
    X,
    /// The depth axis.
    Z,
}

/// Identifier of a room within the ordered room list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(u32);

impl RoomId {
    /// The spawn room, always first in the list.
    pub const SPAWN: RoomId = RoomId(0);

    /// Creates a new room identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Creates an identifier from a list position, saturating on overflow.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Position of the room within the ordered room list.
    #[must_use]
    pub fn index(&self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }

    /// Whether the identifier names the spawn room.
    #[must_use]
    pub const fn is_spawn(&self) -> bool {
        self.0 == 0
    }
}

/// Axis-aligned rectangular room with inclusive bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Room {
    min_x: i32,
    min_z: i32,
    max_x: i32,
    max_z: i32,
}

impl Room {
    /// Creates a room from inclusive bounds, normalising swapped corners.
    #[must_use]
    pub fn from_bounds(min_x: i32, min_z: i32, max_x: i32, max_z: i32) -> Self {
        Self {
            min_x: min_x.min(max_x),
            min_z: min_z.min(max_z),
            max_x: min_x.max(max_x),
            max_z: min_z.max(max_z),
        }
    }

    /// Creates a room anchored at its minimum corner with the provided size.
    #[must_use]
    pub fn from_origin(min_x: i32, min_z: i32, width: i32, depth: i32) -> Self {
        Self::from_bounds(
            min_x,
            min_z,
            min_x + width.max(1) - 1,
            min_z + depth.max(1) - 1,
        )
    }

    /// Smallest column covered by the room.
    #[must_use]
    pub const fn min_x(&self) -> i32 {
        self.min_x
    }

    /// Smallest row covered by the room.
    #[must_use]
    pub const fn min_z(&self) -> i32 {
        self.min_z
    }

    /// Largest column covered by the room.
    #[must_use]
    pub const fn max_x(&self) -> i32 {
        self.max_x
    }

    /// Largest row covered by the room.
    #[must_use]
    pub const fn max_z(&self) -> i32 {
        self.max_z
    }

    /// Number of columns covered by the room.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.max_x - self.min_x + 1
    }

    /// Number of rows covered by the room.
    #[must_use]
    pub const fn depth(&self) -> i32 {
        self.max_z - self.min_z + 1
    }

    /// Number of cells covered by the room.
    #[must_use]
    pub const fn area(&self) -> i32 {
        self.width() * self.depth()
    }

    /// Whether the room meets the large-room area threshold.
    #[must_use]
    pub const fn is_large(&self) -> bool {
        self.area() >= LARGE_ROOM_AREA
    }

    /// Integer centre cell of the room.
    #[must_use]
    pub const fn center(&self) -> CellCoord {
        CellCoord::new(
            (self.min_x + self.max_x) / 2,
            (self.min_z + self.max_z) / 2,
        )
    }

    /// Axis along which the room is longest. Square rooms report [`Axis::X`].
    #[must_use]
    pub const fn long_axis(&self) -> Axis {
        if self.width() >= self.depth() {
            Axis::X
        } else {
            Axis::Z
        }
    }

    /// Whether the two rooms overlap once both are grown by `padding` cells.
    #[must_use]
    pub const fn intersects(&self, other: &Room, padding: i32) -> bool {
        !(self.max_x + padding < other.min_x
            || self.min_x - padding > other.max_x
            || self.max_z + padding < other.min_z
            || self.min_z - padding > other.max_z)
    }

    /// Whether the cell lies within the room's bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.x() >= self.min_x
            && cell.x() <= self.max_x
            && cell.z() >= self.min_z
            && cell.z() <= self.max_z
    }

    /// Whether the cell lies strictly inside the room's boundary ring.
    #[must_use]
    pub const fn is_interior(&self, cell: CellCoord) -> bool {
        cell.x() > self.min_x
            && cell.x() < self.max_x
            && cell.z() > self.min_z
            && cell.z() < self.max_z
    }

    /// Iterates every cell covered by the room in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let (min_x, max_x) = (self.min_x, self.max_x);
        (self.min_z..=self.max_z)
            .flat_map(move |z| (min_x..=max_x).map(move |x| CellCoord::new(x, z)))
    }

    /// Iterates the room's interior cells in row-major order.
    pub fn interior_cells(&self) -> impl Iterator<Item = CellCoord> {
        let (min_x, max_x) = (self.min_x + 1, self.max_x - 1);
        (self.min_z + 1..self.max_z)
            .flat_map(move |z| (min_x..=max_x).map(move |x| CellCoord::new(x, z)))
    }
}

/// Structural room type steering height-field population.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoomArchetype {
    /// Small flat room with nothing in it.
    SmallEmpty,
    /// Small flat room with a raised centre and a gated fight.
    SmallEncounter,
    /// Large room with concentric stepped rings.
    LargeEmpty,
    /// Large room with an elevated firing line and a gated fight.
    LargeEncounter,
    /// Room hosting a ramp between stacked floors.
    Staircase,
    /// Room crossed by weaving or scattered parkour platforms.
    HallwayParkour,
    /// Voided room with a rising spiral of platforms.
    VerticalParkour,
}

impl RoomArchetype {
    /// Every archetype in declaration order.
    pub const ALL: [RoomArchetype; 7] = [
        Self::SmallEmpty,
        Self::SmallEncounter,
        Self::LargeEmpty,
        Self::LargeEncounter,
        Self::Staircase,
        Self::HallwayParkour,
        Self::VerticalParkour,
    ];

    /// Whether the archetype hosts a gated enemy encounter.
    #[must_use]
    pub const fn is_encounter(self) -> bool {
        matches!(self, Self::SmallEncounter | Self::LargeEncounter)
    }

    /// Whether the archetype is one of the parkour layouts.
    #[must_use]
    pub const fn is_parkour(self) -> bool {
        matches!(self, Self::HallwayParkour | Self::VerticalParkour)
    }

    /// Whether the archetype is drawn from the bounded special selections.
    #[must_use]
    pub const fn is_special(self) -> bool {
        matches!(
            self,
            Self::Staircase | Self::HallwayParkour | Self::VerticalParkour
        )
    }
}

/// Opening where a room boundary meets carved exterior space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Doorway {
    cell: CellCoord,
    direction: Direction,
}

impl Doorway {
    /// Creates a doorway at a boundary cell facing outward in `direction`.
    #[must_use]
    pub const fn new(cell: CellCoord, direction: Direction) -> Self {
        Self { cell, direction }
    }

    /// Boundary cell of the room hosting the doorway.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// Outward-facing direction of the doorway.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }
}

/// Generation-counted reference into the world's entity table.
///
/// A handle stays valid until its slot is freed; a recycled slot bumps the
/// generation so stale handles never alias the new occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle {
    slot: u32,
    generation: u32,
}

impl EntityHandle {
    /// Creates a handle for the provided slot and generation.
    #[must_use]
    pub const fn new(slot: u32, generation: u32) -> Self {
        Self { slot, generation }
    }

    /// Slot index inside the entity table.
    #[must_use]
    pub const fn slot(&self) -> u32 {
        self.slot
    }

    /// Generation the slot had when the handle was issued.
    #[must_use]
    pub const fn generation(&self) -> u32 {
        self.generation
    }
}
