//! Room list, archetype assignment and encounter definitions.

use std::collections::BTreeMap;

use arena_core::{CellCoord, Doorway, Room, RoomArchetype, RoomId};
use glam::Vec3;
use serde::Serialize;

/// Ordered list of placed rooms. The first room is always the spawn room.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RoomPlan {
    rooms: Vec<Room>,
    primary_count: usize,
}

impl RoomPlan {
    /// Creates a plan from the placed rooms.
    ///
    /// `primary_count` rooms (spawn room included) came from the padded
    /// primary pass; the remainder came from the relaxed fallback pass.
    #[must_use]
    pub fn new(rooms: Vec<Room>, primary_count: usize) -> Self {
        let primary_count = primary_count.min(rooms.len());
        Self {
            rooms,
            primary_count,
        }
    }

    /// Every room in placement order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Room with the provided identifier.
    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.index())
    }

    /// The spawn room, when any room was placed.
    #[must_use]
    pub fn spawn_room(&self) -> Option<&Room> {
        self.rooms.first()
    }

    /// Rooms placed by the primary pass, spawn room included.
    #[must_use]
    pub fn primary_rooms(&self) -> &[Room] {
        &self.rooms[..self.primary_count]
    }

    /// Number of rooms placed by the primary pass, spawn room included.
    #[must_use]
    pub const fn primary_count(&self) -> usize {
        self.primary_count
    }

    /// Number of placed rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Whether no room was placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Iterates rooms paired with their identifiers.
    pub fn iter(&self) -> impl Iterator<Item = (RoomId, &Room)> {
        self.rooms
            .iter()
            .enumerate()
            .map(|(index, room)| (RoomId::from_index(index), room))
    }
}

/// Archetype per non-spawn room, fixed once assigned.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ArchetypeMap {
    entries: BTreeMap<RoomId, RoomArchetype>,
}

impl ArchetypeMap {
    /// Freezes an assignment. Any entry for the spawn room is discarded.
    #[must_use]
    pub fn new(mut entries: BTreeMap<RoomId, RoomArchetype>) -> Self {
        let _ = entries.remove(&RoomId::SPAWN);
        Self { entries }
    }

    /// Archetype of the room, `None` for the spawn room or unknown rooms.
    #[must_use]
    pub fn get(&self, room: RoomId) -> Option<RoomArchetype> {
        self.entries.get(&room).copied()
    }

    /// Iterates assignments in ascending room order.
    pub fn iter(&self) -> impl Iterator<Item = (RoomId, RoomArchetype)> + '_ {
        self.entries.iter().map(|(room, archetype)| (*room, *archetype))
    }

    /// Rooms carrying the provided archetype, in ascending order.
    pub fn rooms_with(&self, archetype: RoomArchetype) -> impl Iterator<Item = RoomId> + '_ {
        self.iter()
            .filter(move |(_, assigned)| *assigned == archetype)
            .map(|(room, _)| room)
    }

    /// Number of rooms carrying the provided archetype.
    #[must_use]
    pub fn count(&self, archetype: RoomArchetype) -> usize {
        self.rooms_with(archetype).count()
    }

    /// Number of assigned rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Gate panel closing one doorway while an encounter runs.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BarrierSpec {
    /// Room the barrier seals.
    pub room: RoomId,
    /// Doorway the barrier covers.
    pub doorway: Doorway,
    /// World-space centre of the panel.
    pub center: Vec3,
    /// Extents along each world axis.
    pub size: Vec3,
}

/// Enemy placed inside an encounter room.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnemySpawn {
    /// Room the enemy belongs to.
    pub room: RoomId,
    /// Interior cell the enemy stands on.
    pub cell: CellCoord,
    /// World-space spawn position.
    pub position: Vec3,
    /// Index into the configured variant roster.
    pub variant: usize,
    /// Uniform scale rolled from the variant's size range.
    pub scale: f32,
    /// Starting health.
    pub health: f32,
}

/// Enemies and barriers that make up one gated room.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EncounterPlan {
    /// Room hosting the encounter.
    pub room: RoomId,
    /// Whether entering the room raises the barriers.
    pub lock_on_enter: bool,
    /// Barrier panels, one per doorway.
    pub barriers: Vec<BarrierSpec>,
    /// Enemies waiting inside the room.
    pub enemies: Vec<EnemySpawn>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_room_never_gets_an_archetype() {
        let mut entries = BTreeMap::new();
        let _ = entries.insert(RoomId::SPAWN, RoomArchetype::Staircase);
        let _ = entries.insert(RoomId::new(1), RoomArchetype::Staircase);
        let _ = entries.insert(RoomId::new(2), RoomArchetype::SmallEmpty);

        let map = ArchetypeMap::new(entries);

        assert_eq!(map.get(RoomId::SPAWN), None);
        assert_eq!(map.count(RoomArchetype::Staircase), 1);
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn primary_slice_is_clamped_to_room_count() {
        let rooms = vec![Room::from_origin(1, 1, 5, 5), Room::from_origin(9, 1, 5, 5)];

        let plan = RoomPlan::new(rooms, 7);

        assert_eq!(plan.primary_rooms().len(), 2);
        assert_eq!(plan.room(RoomId::new(1)).map(Room::min_x), Some(9));
        assert!(plan.room(RoomId::new(2)).is_none());
    }
}
