#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deferred player placement onto the spawn platform.
//!
//! The host creates the player entity on its own schedule, so placement is
//! queued and retried once per tick until the player exists. A bounded
//! number of ticks is spent waiting before the system gives up with a single
//! warning; the arena itself stays fully usable either way.

use arena_core::{Command, Event, Room};
use arena_world::{Geometry, GridDims};
use glam::Vec3;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    max_attempts: u32,
}

impl Config {
    /// Creates a configuration waiting at most `max_attempts` ticks.
    #[must_use]
    pub const fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }
}

/// Outcome of the most recent queued placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnStatus {
    /// Nothing has been queued.
    Idle,
    /// Waiting for the player entity.
    Pending,
    /// The placement command was emitted.
    Placed,
    /// The attempt ceiling was reached first.
    TimedOut,
}

/// Retry state for one deferred placement.
#[derive(Debug)]
pub struct PlayerSpawn {
    max_attempts: u32,
    pending: bool,
    attempts: u32,
    target: Vec3,
    status: SpawnStatus,
}

impl PlayerSpawn {
    /// Creates an idle spawner.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            max_attempts: config.max_attempts,
            pending: false,
            attempts: 0,
            target: Vec3::ZERO,
            status: SpawnStatus::Idle,
        }
    }

    /// Arms the spawner for `target`, restarting the attempt count.
    pub fn queue(&mut self, target: Vec3) {
        self.pending = true;
        self.attempts = 0;
        self.target = target;
        self.status = SpawnStatus::Pending;
    }

    /// Consumes events and emits a placement once the player exists.
    ///
    /// Each `TimeAdvanced` event while pending is one attempt. A
    /// `PlayerRegistered` event earlier in the same batch counts as the
    /// player existing.
    pub fn handle(&mut self, events: &[Event], player_registered: bool, out: &mut Vec<Command>) {
        let mut registered = player_registered;
        for event in events {
            if !self.pending {
                return;
            }
            match event {
                Event::PlayerRegistered => registered = true,
                Event::TimeAdvanced { .. } => self.attempt(registered, out),
                _ => {}
            }
        }
    }

    fn attempt(&mut self, registered: bool, out: &mut Vec<Command>) {
        if registered {
            out.push(Command::PlacePlayer {
                position: self.target,
            });
            self.pending = false;
            self.status = SpawnStatus::Placed;
            return;
        }

        self.attempts = self.attempts.saturating_add(1);
        if self.attempts >= self.max_attempts {
            self.pending = false;
            self.status = SpawnStatus::TimedOut;
            log::warn!(
                "auto player spawn timed out after {} ticks; player was not placed",
                self.attempts
            );
        }
    }

    /// Whether a placement is still waiting.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Ticks spent waiting on the current placement.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Position the player will be placed at.
    #[must_use]
    pub const fn target(&self) -> Vec3 {
        self.target
    }

    /// Outcome of the most recent placement.
    #[must_use]
    pub const fn status(&self) -> SpawnStatus {
        self.status
    }
}

/// Point above the spawn room's centre tile at which the player is placed.
///
/// Uses the walkable height recorded for the centre cell, falling back to
/// ground level when no tile stands there.
#[must_use]
pub fn spawn_point(
    dims: &GridDims,
    geometry: &Geometry,
    spawn_room: &Room,
    clearance: f32,
) -> Vec3 {
    let center = spawn_room.center();
    let standing = geometry.top_height(center).unwrap_or(0.0);
    dims.cell_to_world(center, standing + clearance)
}
