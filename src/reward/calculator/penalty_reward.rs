use super::reward_calculator::{Contribution, RewardCalculator, StatePatch};
use crate::config::RewardConfig;
use crate::episode::EpisodeState;
use crate::facts::{GameFacts, Position};

/// Per-step costs: a flat step penalty, a failed-move penalty and a penalty
/// for lingering on one tile.
pub struct PenaltyRewardCalculator {
    step_penalty: f32,
    wall_penalty: f32,
    stuck_penalty: f32,
    stuck_threshold: u32,
}

impl PenaltyRewardCalculator {
    pub fn new(config: &RewardConfig, stuck_threshold: u32) -> Self {
        Self {
            step_penalty: config.penalty_step,
            wall_penalty: config.penalty_wall,
            stuck_penalty: config.penalty_stuck,
            stuck_threshold,
        }
    }

    /// The player cannot walk while a battle is on screen, including the frame
    /// a battle closes on.
    fn movement_blocked(facts: &GameFacts, state: &EpisodeState) -> bool {
        let was_in_battle = state.battle.is_active();
        facts
            .battle
            .active()
            .into_option()
            .unwrap_or(was_in_battle)
            || was_in_battle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenaltyPatch {
    pub tile: Position,
}

impl StatePatch for PenaltyPatch {
    fn apply(self, state: &mut EpisodeState) {
        *state.visit_counts.entry(self.tile).or_insert(0) += 1;
    }
}

impl RewardCalculator for PenaltyRewardCalculator {
    type Patch = PenaltyPatch;

    fn calculate_reward(&self, facts: &GameFacts, state: &EpisodeState) -> Contribution<PenaltyPatch> {
        let tile = facts.position;
        let mut reward = self.step_penalty;

        if tile == state.previous.position && !Self::movement_blocked(facts, state) {
            reward += self.wall_penalty;
        }

        let visits = state.visit_counts.get(&tile).copied().unwrap_or(0) + 1;
        if visits > self.stuck_threshold {
            reward += self.stuck_penalty;
        }

        Contribution {
            reward,
            patch: PenaltyPatch { tile },
        }
    }
}
