#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Gated combat rooms.
//!
//! Planning decides which enemies and barriers each encounter room holds.
//! At runtime every room runs a one-way state machine: the player entering
//! wakes the enemies and raises the barriers, and once no enemy handle is
//! alive the barriers are destroyed for good.

mod planning;

use arena_core::{Body, Command, EntityHandle, Event, RoomId};
use arena_world::EncounterRoster;

pub use planning::{pick_variant, EncounterPlanner, EncounterSite};

/// Lifecycle of a single encounter room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EncounterState {
    /// Enemies and barriers are waiting, disabled.
    Idle,
    /// The player entered; enemies are awake.
    Activated,
    /// Every enemy is gone and the barriers were removed.
    Completed,
}

/// State machine owning the handles of one encounter room.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomEncounter {
    room: RoomId,
    lock_on_enter: bool,
    state: EncounterState,
    enemies: Vec<EntityHandle>,
    barriers: Vec<EntityHandle>,
}

impl RoomEncounter {
    /// Creates an idle encounter holding the provided handles.
    #[must_use]
    pub fn new(
        room: RoomId,
        lock_on_enter: bool,
        enemies: Vec<EntityHandle>,
        barriers: Vec<EntityHandle>,
    ) -> Self {
        Self {
            room,
            lock_on_enter,
            state: EncounterState::Idle,
            enemies,
            barriers,
        }
    }

    /// Creates an idle encounter from the world's registered roster.
    #[must_use]
    pub fn from_roster(roster: &EncounterRoster) -> Self {
        Self::new(
            roster.room(),
            roster.lock_on_enter(),
            roster.enemies().to_vec(),
            roster.barriers().to_vec(),
        )
    }

    /// Room hosting the encounter.
    #[must_use]
    pub const fn room(&self) -> RoomId {
        self.room
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EncounterState {
        self.state
    }

    /// Enemy handles held by the encounter.
    #[must_use]
    pub fn enemies(&self) -> &[EntityHandle] {
        &self.enemies
    }

    /// Barrier handles still held by the encounter. Empty once completed.
    #[must_use]
    pub fn barriers(&self) -> &[EntityHandle] {
        &self.barriers
    }

    /// Reacts to a body entering the room's trigger volume.
    ///
    /// Only the player activates an idle encounter; every other body and
    /// every later entry is ignored. Activation enables each held enemy and,
    /// when locking on entry, each barrier. Handles whose entity already
    /// died are rejected by the world. Returns whether the state changed.
    pub fn on_trigger_enter(&mut self, body: Body, out: &mut Vec<Command>) -> bool {
        if self.state != EncounterState::Idle || body != Body::Player {
            return false;
        }
        self.state = EncounterState::Activated;

        for entity in &self.enemies {
            out.push(Command::SetEntityEnabled {
                entity: *entity,
                enabled: true,
            });
        }
        if self.lock_on_enter {
            for entity in &self.barriers {
                out.push(Command::SetEntityEnabled {
                    entity: *entity,
                    enabled: true,
                });
            }
        }
        true
    }

    /// Checks an activated encounter for surviving enemies.
    ///
    /// Completes as soon as no held enemy is alive, destroying and releasing
    /// every barrier. Returns whether the state changed.
    pub fn poll<F>(&mut self, is_alive: F, out: &mut Vec<Command>) -> bool
    where
        F: Fn(EntityHandle) -> bool,
    {
        if self.state != EncounterState::Activated {
            return false;
        }
        if self.enemies.iter().any(|enemy| is_alive(*enemy)) {
            return false;
        }

        self.state = EncounterState::Completed;
        for entity in self.barriers.drain(..) {
            out.push(Command::DestroyEntity { entity });
        }
        log::debug!("encounter in room {} completed", self.room.get());
        true
    }
}

/// Pure system driving every encounter room from world events.
#[derive(Clone, Debug, Default)]
pub struct Encounters {
    rooms: Vec<RoomEncounter>,
}

impl Encounters {
    /// Creates the system from the rosters registered by the world.
    #[must_use]
    pub fn new(rosters: &[EncounterRoster]) -> Self {
        Self {
            rooms: rosters.iter().map(RoomEncounter::from_roster).collect(),
        }
    }

    /// Routes trigger events to their room and polls every activated room
    /// once per batch.
    pub fn handle<F>(&mut self, events: &[Event], is_alive: F, out: &mut Vec<Command>)
    where
        F: Fn(EntityHandle) -> bool,
    {
        for event in events {
            if let Event::TriggerEntered { room, body } = event {
                let encounter = self
                    .rooms
                    .iter_mut()
                    .find(|candidate| candidate.room == *room);
                if let Some(encounter) = encounter {
                    let _ = encounter.on_trigger_enter(*body, out);
                }
            }
        }

        for encounter in &mut self.rooms {
            let _ = encounter.poll(&is_alive, out);
        }
    }

    /// State of the encounter in the provided room.
    #[must_use]
    pub fn state(&self, room: RoomId) -> Option<EncounterState> {
        self.rooms
            .iter()
            .find(|encounter| encounter.room == room)
            .map(RoomEncounter::state)
    }

    /// Every encounter in room order.
    #[must_use]
    pub fn rooms(&self) -> &[RoomEncounter] {
        &self.rooms
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn handles(range: std::ops::Range<u32>) -> Vec<EntityHandle> {
        range.map(|slot| EntityHandle::new(slot, 0)).collect()
    }

    #[test]
    fn non_player_bodies_do_not_activate() {
        let mut encounter = RoomEncounter::new(RoomId::new(1), true, handles(0..2), handles(2..3));
        let mut out = Vec::new();

        assert!(!encounter.on_trigger_enter(Body::Other, &mut out));
        assert!(!encounter.on_trigger_enter(Body::Entity(EntityHandle::new(0, 0)), &mut out));

        assert_eq!(encounter.state(), EncounterState::Idle);
        assert!(out.is_empty());
    }

    #[test]
    fn unlocked_encounter_leaves_barriers_down() {
        let mut encounter = RoomEncounter::new(RoomId::new(1), false, handles(0..2), handles(2..4));
        let mut out = Vec::new();

        assert!(encounter.on_trigger_enter(Body::Player, &mut out));

        assert_eq!(out.len(), 2);
    }

    #[test]
    fn idle_encounter_ignores_polls() {
        let mut encounter = RoomEncounter::new(RoomId::new(1), true, Vec::new(), handles(0..1));
        let mut out = Vec::new();

        assert!(!encounter.poll(|_| false, &mut out));

        assert_eq!(encounter.state(), EncounterState::Idle);
        assert_eq!(encounter.barriers().len(), 1);
    }

    #[test]
    fn empty_roster_completes_on_first_poll() {
        let mut encounter = RoomEncounter::new(RoomId::new(4), true, Vec::new(), handles(0..2));
        let mut out = Vec::new();
        let _ = encounter.on_trigger_enter(Body::Player, &mut out);
        out.clear();

        assert!(encounter.poll(|_| false, &mut out));

        assert_eq!(encounter.state(), EncounterState::Completed);
        let destroyed: BTreeSet<_> = out
            .iter()
            .filter_map(|command| match command {
                Command::DestroyEntity { entity } => Some(*entity),
                _ => None,
            })
            .collect();
        assert_eq!(destroyed.len(), 2);
    }
}
