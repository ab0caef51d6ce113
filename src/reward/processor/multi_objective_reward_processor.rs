use crate::config::{EnvSettings, RewardConfig};
use crate::episode::EpisodeState;
use crate::facts::GameFacts;
use crate::reward::calculator::{
    BattleRewardCalculator, ExplorationRewardCalculator, MilestoneRewardCalculator,
    PenaltyRewardCalculator,
};
use crate::reward::{Contribution, MultiObjectiveReward, RewardCalculator, RewardProcessor, StatePatch};

/// Runs the four channel calculators against the same pre-step state, then
/// applies their patches in a fixed order.
pub struct MultiObjectiveRewardProcessor {
    exploration_reward_calculator: ExplorationRewardCalculator,
    battle_reward_calculator: BattleRewardCalculator,
    milestone_reward_calculator: MilestoneRewardCalculator,
    penalty_reward_calculator: PenaltyRewardCalculator,

    enabled: [bool; 4],
    reward_scale: f32,
}

impl MultiObjectiveRewardProcessor {
    pub fn new(settings: &EnvSettings) -> Self {
        let config: &RewardConfig = &settings.reward;
        Self {
            exploration_reward_calculator: ExplorationRewardCalculator::from_config(config),
            battle_reward_calculator: BattleRewardCalculator::from_config(config),
            milestone_reward_calculator: MilestoneRewardCalculator::new(
                config,
                settings.key_locations.clone(),
            ),
            penalty_reward_calculator: PenaltyRewardCalculator::new(
                config,
                settings.stuck_threshold,
            ),
            enabled: [
                config.enable_exploration,
                config.enable_battle,
                config.enable_milestone,
                config.enable_penalty,
            ],
            reward_scale: config.reward_scale,
        }
    }

    /// Reward of a channel, or 0 when the channel is switched off.
    fn gated<P>(&self, channel: usize, contribution: &Contribution<P>) -> f32 {
        if self.enabled[channel] {
            contribution.reward
        } else {
            0.0
        }
    }
}

impl RewardProcessor for MultiObjectiveRewardProcessor {
    fn process(&self, facts: &GameFacts, state: &mut EpisodeState) -> MultiObjectiveReward {
        let exploration = self.exploration_reward_calculator.calculate_reward(facts, state);
        let battle = self.battle_reward_calculator.calculate_reward(facts, state);
        let milestone = self.milestone_reward_calculator.calculate_reward(facts, state);
        let penalty = self.penalty_reward_calculator.calculate_reward(facts, state);

        let detailed_reward = MultiObjectiveReward {
            exploration: self.gated(0, &exploration),
            battle: self.gated(1, &battle),
            milestone: self.gated(2, &milestone),
            penalty: self.gated(3, &penalty),
        };

        exploration.patch.apply(state);
        battle.patch.apply(state);
        milestone.patch.apply(state);
        penalty.patch.apply(state);

        tracing::debug!(
            "Step {} reward: exploration={} battle={} milestone={} penalty={}",
            state.step_index,
            detailed_reward.exploration,
            detailed_reward.battle,
            detailed_reward.milestone,
            detailed_reward.penalty
        );

        detailed_reward.scaled(self.reward_scale)
    }
}
