pub mod battle_reward;
pub mod exploration_reward;
pub mod milestone_reward;
pub mod penalty_reward;
pub mod reward_calculator;

pub use battle_reward::BattleRewardCalculator;
pub use exploration_reward::ExplorationRewardCalculator;
pub use milestone_reward::MilestoneRewardCalculator;
pub use penalty_reward::PenaltyRewardCalculator;
pub use reward_calculator::{Contribution, RewardCalculator, StatePatch};
