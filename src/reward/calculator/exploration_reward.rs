use super::reward_calculator::{Contribution, RewardCalculator, StatePatch};
use crate::config::RewardConfig;
use crate::episode::EpisodeState;
use crate::facts::{GameFacts, Position};

/// Rewards stepping on tiles not seen this episode, and a smaller amount for
/// tiles that have fallen out of the recent window.
pub struct ExplorationRewardCalculator {
    new_tile_reward: f32,
    recent_tile_reward: f32,
}

impl ExplorationRewardCalculator {
    pub fn new(new_tile_reward: f32, recent_tile_reward: f32) -> Self {
        Self {
            new_tile_reward,
            recent_tile_reward,
        }
    }

    pub fn from_config(config: &RewardConfig) -> Self {
        Self::new(config.exploration_new_tile, config.exploration_recent_tile)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExplorationPatch {
    pub tile: Position,
    pub first_visit: bool,
}

impl StatePatch for ExplorationPatch {
    fn apply(self, state: &mut EpisodeState) {
        if self.first_visit {
            state.visited_tiles.insert(self.tile);
        }
        state.recent_tiles.push(self.tile);
    }
}

impl RewardCalculator for ExplorationRewardCalculator {
    type Patch = ExplorationPatch;

    fn calculate_reward(&self, facts: &GameFacts, state: &EpisodeState) -> Contribution<ExplorationPatch> {
        let tile = facts.position;
        let first_visit = !state.visited_tiles.contains(&tile);
        let reward = if first_visit {
            self.new_tile_reward
        } else if !state.recent_tiles.contains(&tile) {
            self.recent_tile_reward
        } else {
            0.0
        };
        Contribution {
            reward,
            patch: ExplorationPatch { tile, first_visit },
        }
    }
}
