pub mod multi_objective_reward_processor;
pub mod reward_processor;
