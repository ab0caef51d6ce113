use std::collections::HashSet;
use std::path::Path;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::termination::TerminationCondition;

pub const ENV_PREFIX: &str = "POKEBOT";

/// Reward coefficients, one per named channel term. Signs are carried by the
/// coefficients themselves: penalties are configured as negative numbers.
///
/// Absent coefficients deserialize to 0, which disables that term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub exploration_new_tile: f32,
    pub exploration_recent_tile: f32,

    pub battle_hp_delta: f32,
    pub battle_win: f32,
    pub battle_loss: f32,
    pub battle_start: f32,

    pub milestone_badge: f32,
    pub milestone_level_up: f32,
    pub milestone_key_location: f32,
    pub milestone_event: f32,

    pub penalty_step: f32,
    pub penalty_wall: f32,
    pub penalty_stuck: f32,

    pub reward_scale: f32,

    pub enable_exploration: bool,
    pub enable_battle: bool,
    pub enable_milestone: bool,
    pub enable_penalty: bool,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            exploration_new_tile: 0.0,
            exploration_recent_tile: 0.0,
            battle_hp_delta: 0.0,
            battle_win: 0.0,
            battle_loss: 0.0,
            battle_start: 0.0,
            milestone_badge: 0.0,
            milestone_level_up: 0.0,
            milestone_key_location: 0.0,
            milestone_event: 0.0,
            penalty_step: 0.0,
            penalty_wall: 0.0,
            penalty_stuck: 0.0,
            reward_scale: 1.0,
            enable_exploration: true,
            enable_battle: true,
            enable_milestone: true,
            enable_penalty: true,
        }
    }
}

impl RewardConfig {
    pub const PRESETS: [&'static str; 5] = [
        "default",
        "exploration",
        "battle",
        "milestone",
        "minimal_penalty",
    ];

    /// Balanced shaping across all four channels.
    pub fn balanced() -> Self {
        Self {
            exploration_new_tile: 1.0,
            exploration_recent_tile: 0.1,
            battle_hp_delta: 0.5,
            battle_win: 10.0,
            battle_loss: -5.0,
            milestone_badge: 100.0,
            milestone_level_up: 1.0,
            milestone_key_location: 5.0,
            milestone_event: 4.0,
            penalty_step: -0.01,
            penalty_wall: -0.1,
            penalty_stuck: -0.05,
            ..Self::default()
        }
    }

    /// Heavily rewards discovering new tiles
    pub fn exploration_focused() -> Self {
        Self {
            exploration_new_tile: 2.0,
            exploration_recent_tile: 0.5,
            battle_hp_delta: 0.1,
            battle_win: 5.0,
            milestone_badge: 50.0,
            penalty_step: -0.005,
            ..Self::balanced()
        }
    }

    /// Heavily rewards battle performance
    pub fn battle_focused() -> Self {
        Self {
            exploration_new_tile: 0.5,
            battle_hp_delta: 2.0,
            battle_win: 50.0,
            battle_loss: -10.0,
            milestone_level_up: 5.0,
            penalty_step: -0.02,
            ..Self::balanced()
        }
    }

    /// Heavily rewards story milestones
    pub fn milestone_focused() -> Self {
        Self {
            exploration_new_tile: 0.5,
            battle_hp_delta: 0.2,
            battle_win: 20.0,
            milestone_badge: 200.0,
            milestone_level_up: 10.0,
            milestone_key_location: 20.0,
            milestone_event: 10.0,
            penalty_step: -0.005,
            ..Self::balanced()
        }
    }

    /// Near-zero penalties for early training
    pub fn minimal_penalty() -> Self {
        Self {
            penalty_step: 0.0,
            penalty_wall: -0.01,
            penalty_stuck: -0.01,
            ..Self::balanced()
        }
    }

    pub fn preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::balanced()),
            "exploration" => Ok(Self::exploration_focused()),
            "battle" => Ok(Self::battle_focused()),
            "milestone" => Ok(Self::milestone_focused()),
            "minimal_penalty" => Ok(Self::minimal_penalty()),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }

    pub fn coefficients(&self) -> [(&'static str, f32); 14] {
        [
            ("exploration_new_tile", self.exploration_new_tile),
            ("exploration_recent_tile", self.exploration_recent_tile),
            ("battle_hp_delta", self.battle_hp_delta),
            ("battle_win", self.battle_win),
            ("battle_loss", self.battle_loss),
            ("battle_start", self.battle_start),
            ("milestone_badge", self.milestone_badge),
            ("milestone_level_up", self.milestone_level_up),
            ("milestone_key_location", self.milestone_key_location),
            ("milestone_event", self.milestone_event),
            ("penalty_step", self.penalty_step),
            ("penalty_wall", self.penalty_wall),
            ("penalty_stuck", self.penalty_stuck),
            ("reward_scale", self.reward_scale),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((name, value)) = self
            .coefficients()
            .into_iter()
            .find(|(_, value)| !value.is_finite())
        {
            return Err(ConfigError::NonFiniteCoefficient { name, value });
        }
        if self.reward_scale <= 0.0 {
            tracing::warn!(
                "reward_scale is non-positive ({}); training may be unstable",
                self.reward_scale
            );
        }
        Ok(())
    }
}

/// Environment configuration as loaded: a flat mapping of named values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    #[serde(flatten)]
    pub reward: RewardConfig,
    pub max_steps: u64,
    pub termination_condition: Option<String>,
    pub target_map_id: Option<u8>,
    pub exploration_recent_window: usize,
    pub penalty_stuck_threshold: u32,
    pub key_locations: Vec<u8>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            reward: RewardConfig::default(),
            max_steps: 163_840,
            termination_condition: None,
            target_map_id: None,
            exploration_recent_window: 100,
            penalty_stuck_threshold: 10,
            key_locations: Vec::new(),
        }
    }
}

impl EnvConfig {
    /// Layer an optional config file under `POKEBOT__*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("key_locations"),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Check everything that can be checked before the first step.
    pub fn validate(self) -> Result<EnvSettings, ConfigError> {
        self.reward.validate()?;
        if self.max_steps == 0 {
            return Err(ConfigError::NotPositive("max_steps"));
        }
        if self.exploration_recent_window == 0 {
            return Err(ConfigError::NotPositive("exploration_recent_window"));
        }
        let termination = self
            .termination_condition
            .as_deref()
            .map(|name| TerminationCondition::parse(name, self.target_map_id))
            .transpose()?;

        Ok(EnvSettings {
            reward: self.reward,
            max_steps: self.max_steps,
            termination,
            recent_window: self.exploration_recent_window,
            stuck_threshold: self.penalty_stuck_threshold,
            key_locations: self.key_locations.into_iter().collect(),
        })
    }
}

/// Validated, immutable settings. Shared read-only between environment instances.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvSettings {
    pub reward: RewardConfig,
    pub max_steps: u64,
    pub termination: Option<TerminationCondition>,
    pub recent_window: usize,
    pub stuck_threshold: u32,
    pub key_locations: HashSet<u8>,
}
