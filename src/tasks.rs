use serde::Serialize;

use crate::config::{EnvConfig, RewardConfig};
use crate::error::ConfigError;

const ROLLOUT_LENGTH: u64 = 2048;

/// A training scenario: reward weights, episode length and end condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskConfig {
    pub name: &'static str,
    pub description: &'static str,
    pub reward: RewardConfig,
    pub max_steps: u64,
    pub termination_condition: Option<&'static str>,
    pub target_map_id: Option<u8>,
    pub success_condition: Option<&'static str>,
}

impl TaskConfig {
    fn new(name: &'static str, description: &'static str, reward: RewardConfig, rollouts: u64) -> Self {
        Self {
            name,
            description,
            reward,
            max_steps: ROLLOUT_LENGTH * rollouts,
            termination_condition: None,
            target_map_id: None,
            success_condition: None,
        }
    }

    fn ends_on(mut self, condition: &'static str) -> Self {
        self.termination_condition = Some(condition);
        self.success_condition = Some(condition);
        self
    }

    /// Environment configuration for this task, with the remaining settings at their defaults.
    pub fn into_env_config(self) -> EnvConfig {
        EnvConfig {
            reward: self.reward,
            max_steps: self.max_steps,
            termination_condition: self.termination_condition.map(str::to_string),
            target_map_id: self.target_map_id,
            ..EnvConfig::default()
        }
    }
}

pub const TASKS: [&str; 7] = [
    "exploration_basic",
    "battle_training",
    "gym_quest",
    "early_game",
    "full_game",
    "full_game_shaped",
    "walk_to_pokecenter",
];

pub fn list_tasks() -> &'static [&'static str] {
    &TASKS
}

pub fn task(name: &str) -> Result<TaskConfig, ConfigError> {
    let task = match name {
        "exploration_basic" => TaskConfig::new(
            "exploration_basic",
            "Explore Pallet Town and Route 1. Focus on discovering new tiles.",
            RewardConfig {
                exploration_new_tile: 5.0,
                exploration_recent_tile: 0.5,
                milestone_badge: 50.0,
                milestone_level_up: 1.0,
                milestone_key_location: 20.0,
                milestone_event: 2.0,
                penalty_step: -0.001,
                penalty_wall: -0.05,
                penalty_stuck: -0.1,
                ..RewardConfig::default()
            },
            40,
        ),
        "battle_training" => TaskConfig::new(
            "battle_training",
            "Train battle skills. Win battles while minimizing HP loss.",
            RewardConfig {
                exploration_new_tile: 0.5,
                battle_hp_delta: 5.0,
                battle_win: 100.0,
                battle_loss: -20.0,
                milestone_badge: 100.0,
                milestone_level_up: 10.0,
                milestone_key_location: 5.0,
                milestone_event: 2.0,
                penalty_step: -0.005,
                penalty_wall: -0.05,
                penalty_stuck: -0.2,
                ..RewardConfig::default()
            },
            60,
        ),
        "gym_quest" => TaskConfig::new(
            "gym_quest",
            "Navigate to Pewter City Gym and earn the Boulder Badge.",
            RewardConfig {
                exploration_new_tile: 2.0,
                exploration_recent_tile: 0.2,
                battle_hp_delta: 2.0,
                battle_win: 50.0,
                battle_loss: -10.0,
                milestone_badge: 500.0,
                milestone_level_up: 5.0,
                milestone_key_location: 30.0,
                milestone_event: 5.0,
                penalty_step: -0.002,
                penalty_wall: -0.05,
                penalty_stuck: -0.1,
                ..RewardConfig::default()
            },
            120,
        )
        .ends_on("badge_earned"),
        "early_game" => TaskConfig::new(
            "early_game",
            "Complete early game: Pallet Town -> Viridian -> Pewter City -> Boulder Badge.",
            RewardConfig {
                exploration_new_tile: 2.0,
                exploration_recent_tile: 0.3,
                battle_hp_delta: 1.0,
                battle_win: 30.0,
                battle_loss: -5.0,
                milestone_badge: 300.0,
                milestone_level_up: 3.0,
                milestone_key_location: 20.0,
                milestone_event: 5.0,
                penalty_step: -0.002,
                penalty_wall: -0.05,
                penalty_stuck: -0.1,
                ..RewardConfig::default()
            },
            150,
        ),
        "full_game" => TaskConfig::new(
            "full_game",
            "Full game playthrough. Explore Kanto, earn all badges, defeat Elite Four.",
            RewardConfig {
                exploration_new_tile: 1.0,
                exploration_recent_tile: 0.1,
                battle_hp_delta: 0.5,
                battle_win: 20.0,
                battle_loss: -5.0,
                milestone_badge: 200.0,
                milestone_level_up: 2.0,
                milestone_key_location: 10.0,
                milestone_event: 4.0,
                penalty_step: -0.001,
                penalty_wall: -0.05,
                penalty_stuck: -0.05,
                // Long episodes
                reward_scale: 0.5,
                ..RewardConfig::default()
            },
            200,
        ),
        "full_game_shaped" => TaskConfig::new(
            "full_game_shaped",
            "Full game with aggressive reward shaping for faster learning.",
            RewardConfig {
                exploration_new_tile: 2.0,
                exploration_recent_tile: 0.2,
                battle_hp_delta: 1.0,
                battle_win: 50.0,
                battle_loss: -10.0,
                milestone_badge: 300.0,
                milestone_level_up: 5.0,
                milestone_key_location: 20.0,
                milestone_event: 8.0,
                penalty_step: -0.005,
                penalty_wall: -0.1,
                penalty_stuck: -0.2,
                ..RewardConfig::default()
            },
            200,
        ),
        "walk_to_pokecenter" => TaskConfig::new(
            "walk_to_pokecenter",
            "Walk from the starting house to the nearest Pokémon Center.",
            RewardConfig {
                exploration_new_tile: 2.0,
                exploration_recent_tile: 0.1,
                milestone_key_location: 20.0,
                penalty_step: -0.005,
                penalty_wall: -0.05,
                penalty_stuck: -0.1,
                ..RewardConfig::default()
            },
            10,
        )
        .ends_on("pokecenter_reached"),
        other => return Err(ConfigError::UnknownTask(other.to_string())),
    };
    Ok(task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::termination::{POKECENTER_MAP_ID, TerminationCondition};

    #[test]
    fn every_listed_task_builds_valid_settings() {
        for name in list_tasks() {
            let task = task(name).unwrap();
            assert_eq!(task.name, *name);
            assert!(task.into_env_config().validate().is_ok(), "{name}");
        }
    }

    #[test]
    fn unknown_task_is_an_error() {
        assert!(matches!(
            task("elite_four_speedrun"),
            Err(ConfigError::UnknownTask(_))
        ));
    }

    #[test]
    fn gym_quest_ends_on_badge() {
        let task = task("gym_quest").unwrap();
        assert_eq!(task.max_steps, 2048 * 120);
        assert_eq!(task.success_condition, Some("badge_earned"));
        let settings = task.into_env_config().validate().unwrap();
        assert_eq!(settings.termination, Some(TerminationCondition::BadgeEarned));
        assert_eq!(settings.reward.milestone_badge, 500.0);
    }

    #[test]
    fn walk_to_pokecenter_targets_the_pokecenter_map() {
        let settings = task("walk_to_pokecenter")
            .unwrap()
            .into_env_config()
            .validate()
            .unwrap();
        assert_eq!(
            settings.termination,
            Some(TerminationCondition::ArrivedAtMap {
                map_id: POKECENTER_MAP_ID
            })
        );
    }

    #[test]
    fn full_game_scales_rewards_down() {
        let task = task("full_game").unwrap();
        assert_eq!(task.reward.reward_scale, 0.5);
        assert_eq!(task.reward.battle_start, 0.0);
    }
}
