use std::collections::HashSet;

use super::reward_calculator::{Contribution, RewardCalculator, StatePatch};
use crate::config::RewardConfig;
use crate::episode::EpisodeState;
use crate::facts::GameFacts;

/// Reward calculator focused on story progression: badges, party levels,
/// event flags and arrival at key maps.
pub struct MilestoneRewardCalculator {
    badge_reward: f32,
    level_up_reward: f32,
    event_reward: f32,
    key_location_reward: f32,
    key_locations: HashSet<u8>,
}

/// Milestones reached on one step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MilestonePatch {
    pub badges_gained: u32,
    pub levels_gained: u32,
    pub events_set: u32,
    pub entered_key_location: bool,
}

impl MilestoneRewardCalculator {
    pub fn new(config: &RewardConfig, key_locations: HashSet<u8>) -> Self {
        Self {
            badge_reward: config.milestone_badge,
            level_up_reward: config.milestone_level_up,
            event_reward: config.milestone_event,
            key_location_reward: config.milestone_key_location,
            key_locations,
        }
    }

    fn milestones(&self, facts: &GameFacts, state: &EpisodeState) -> MilestonePatch {
        let previous = &state.previous;

        // Level-downs (party reordering, deposits) never go negative.
        let levels_gained = match (facts.party.level_sum(), previous.level_sum()) {
            (Some(now), Some(before)) => now.saturating_sub(before),
            _ => 0,
        };

        let events_set = match (facts.events.valid(), previous.events.as_ref()) {
            (Some(now), Some(before)) => now.newly_set(before),
            _ => 0,
        };

        let map_id = facts.position.map_id;
        MilestonePatch {
            badges_gained: facts.badges.newly_set(&previous.badges),
            levels_gained,
            events_set,
            entered_key_location: self.key_locations.contains(&map_id)
                && previous.position.map_id != map_id,
        }
    }
}

impl StatePatch for MilestonePatch {
    fn apply(self, state: &mut EpisodeState) {
        state.progress.badges_earned += self.badges_gained;
        state.progress.levels_gained += self.levels_gained;
        state.progress.events_set += self.events_set;
        if self.entered_key_location {
            state.progress.key_locations_entered += 1;
        }
    }
}

impl RewardCalculator for MilestoneRewardCalculator {
    type Patch = MilestonePatch;

    fn calculate_reward(&self, facts: &GameFacts, state: &EpisodeState) -> Contribution<MilestonePatch> {
        let patch = self.milestones(facts, state);

        let mut reward = patch.badges_gained as f32 * self.badge_reward
            + patch.levels_gained as f32 * self.level_up_reward
            + patch.events_set as f32 * self.event_reward;
        if patch.entered_key_location {
            reward += self.key_location_reward;
        }

        if patch.badges_gained > 0 {
            tracing::info!(
                "Badge progress reward: {} -> {} badges",
                state.previous.badges.count(),
                facts.badges.count()
            );
        }
        if patch.entered_key_location {
            tracing::info!("Reached key location: map {}", facts.position.map_id);
        }

        Contribution { reward, patch }
    }
}
