//! Generation-counted slot table for runtime entities.

use arena_core::EntityHandle;
use glam::Vec3;

use crate::EntityKind;

/// State stored for a live entity.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EntityRecord {
    pub(crate) kind: EntityKind,
    pub(crate) enabled: bool,
    pub(crate) health: f32,
    pub(crate) position: Vec3,
}

/// Outcome of applying damage to a live entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DamageOutcome {
    Survived { remaining: f32 },
    Destroyed,
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    record: Option<EntityRecord>,
}

/// Dense entity storage where a handle stays valid until its slot is freed.
#[derive(Clone, Debug, Default)]
pub(crate) struct EntityTable {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl EntityTable {
    /// Creates an empty table.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores a new disabled entity and returns its handle.
    pub(crate) fn insert(&mut self, kind: EntityKind, health: f32, position: Vec3) -> EntityHandle {
        let record = EntityRecord {
            kind,
            enabled: false,
            health,
            position,
        };

        if let Some(slot_index) = self.free.pop() {
            if let Some(slot) = self.slot_mut(slot_index) {
                slot.record = Some(record);
                return EntityHandle::new(slot_index, slot.generation);
            }
        }

        let slot_index = u32::try_from(self.slots.len()).unwrap_or(u32::MAX);
        self.slots.push(Slot {
            generation: 0,
            record: Some(record),
        });
        EntityHandle::new(slot_index, 0)
    }

    /// Live record behind the handle.
    pub(crate) fn get(&self, handle: EntityHandle) -> Option<&EntityRecord> {
        let slot = self.slots.get(usize::try_from(handle.slot()).ok()?)?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.record.as_ref()
    }

    fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut EntityRecord> {
        let slot = self.slot_mut(handle.slot())?;
        if slot.generation != handle.generation() {
            return None;
        }
        slot.record.as_mut()
    }

    fn slot_mut(&mut self, slot_index: u32) -> Option<&mut Slot> {
        self.slots.get_mut(usize::try_from(slot_index).ok()?)
    }

    /// Whether the handle still refers to a live entity.
    pub(crate) fn is_alive(&self, handle: EntityHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Updates the enabled flag, reporting whether it changed.
    pub(crate) fn set_enabled(&mut self, handle: EntityHandle, enabled: bool) -> bool {
        match self.get_mut(handle) {
            Some(record) if record.enabled != enabled => {
                record.enabled = enabled;
                true
            }
            _ => false,
        }
    }

    /// Subtracts health, freeing the slot once it is exhausted.
    pub(crate) fn damage(&mut self, handle: EntityHandle, amount: f32) -> Option<DamageOutcome> {
        let record = self.get_mut(handle)?;
        record.health -= amount.max(0.0);
        if record.health > 0.0 {
            return Some(DamageOutcome::Survived {
                remaining: record.health,
            });
        }
        let _ = self.remove(handle);
        Some(DamageOutcome::Destroyed)
    }

    /// Frees the slot behind the handle, invalidating every copy of it.
    pub(crate) fn remove(&mut self, handle: EntityHandle) -> Option<EntityRecord> {
        let slot = self.slot_mut(handle.slot())?;
        if slot.generation != handle.generation() {
            return None;
        }
        let record = slot.record.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.slot());
        Some(record)
    }

    /// Number of live entities.
    pub(crate) fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.record.is_some())
            .count()
    }
}
