pub mod calculator;
pub mod multi_objective_reward;
pub mod processor;

pub use calculator::{Contribution, RewardCalculator, StatePatch};
pub use multi_objective_reward::MultiObjectiveReward;
pub use processor::{
    multi_objective_reward_processor::MultiObjectiveRewardProcessor,
    reward_processor::RewardProcessor,
};
