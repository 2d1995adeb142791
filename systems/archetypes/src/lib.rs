#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Assigns a structural archetype to every non-spawn room.

use std::collections::{BTreeMap, BTreeSet};

use arena_core::{ArenaRng, RoomArchetype, RoomId};
use arena_world::{ArchetypeMap, RoomPlan};

const LARGE_ENCOUNTER_CHANCE: f32 = 0.7;
const SMALL_ENCOUNTER_CHANCE: f32 = 0.6;

/// Splits rooms by area and hands out special archetypes before filling the
/// rest with empty or encounter variants.
#[derive(Clone, Copy, Debug)]
pub struct ArchetypePlanner {
    staircase_count: u32,
}

impl ArchetypePlanner {
    /// Creates a planner that tags at most `staircase_count` staircase rooms.
    /// At least one staircase is always attempted.
    #[must_use]
    pub const fn new(staircase_count: u32) -> Self {
        Self { staircase_count }
    }

    /// Produces the archetype of every room except the spawn room.
    #[must_use]
    pub fn assign(&self, plan: &RoomPlan, rng: &mut ArenaRng) -> ArchetypeMap {
        let room_count = plan.len();
        let (large, small): (Vec<RoomId>, Vec<RoomId>) = plan
            .iter()
            .filter(|(id, _)| !id.is_spawn())
            .map(|(id, room)| (id, room.is_large()))
            .fold((Vec::new(), Vec::new()), |(mut large, mut small), (id, is_large)| {
                if is_large {
                    large.push(id);
                } else {
                    small.push(id);
                }
                (large, small)
            });

        let mut selection = Selection::default();

        let staircase_cap = if large.is_empty() {
            room_count.saturating_sub(1)
        } else {
            large.len()
        };
        let staircase_targets = usize::try_from(self.staircase_count.max(1))
            .unwrap_or(usize::MAX)
            .min(staircase_cap);
        let staircase_pool = if large.is_empty() { &small } else { &large };
        selection.pick(staircase_pool, RoomArchetype::Staircase, staircase_targets, rng);

        let others = room_count.saturating_sub(1);
        let hallway_targets = (others / 8).clamp(1, 3);
        selection.pick(&large, RoomArchetype::HallwayParkour, hallway_targets, rng);

        let vertical_targets = (others / 10).clamp(1, 2);
        selection.pick(&large, RoomArchetype::VerticalParkour, vertical_targets, rng);

        for (id, room) in plan.iter().filter(|(id, _)| !id.is_spawn()) {
            if selection.used.contains(&id) {
                continue;
            }
            let archetype = if room.is_large() {
                if rng.chance(LARGE_ENCOUNTER_CHANCE) {
                    RoomArchetype::LargeEncounter
                } else {
                    RoomArchetype::LargeEmpty
                }
            } else if rng.chance(SMALL_ENCOUNTER_CHANCE) {
                RoomArchetype::SmallEncounter
            } else {
                RoomArchetype::SmallEmpty
            };
            let _ = selection.assigned.insert(id, archetype);
        }

        log::debug!(
            "assigned archetypes to {} rooms ({} large, {} small)",
            selection.assigned.len(),
            large.len(),
            small.len()
        );
        ArchetypeMap::new(selection.assigned)
    }
}

#[derive(Default)]
struct Selection {
    used: BTreeSet<RoomId>,
    assigned: BTreeMap<RoomId, RoomArchetype>,
}

impl Selection {
    /// Tags up to `target` unused rooms from `candidates`, drawn uniformly
    /// without replacement.
    fn pick(
        &mut self,
        candidates: &[RoomId],
        archetype: RoomArchetype,
        target: usize,
        rng: &mut ArenaRng,
    ) {
        let mut available: Vec<RoomId> = candidates
            .iter()
            .copied()
            .filter(|id| !self.used.contains(id))
            .collect();

        for _ in 0..target {
            let Some(pick) = rng.index(available.len()) else {
                break;
            };
            let id = available.remove(pick);
            let _ = self.used.insert(id);
            let _ = self.assigned.insert(id, archetype);
        }
    }
}
