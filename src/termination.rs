use serde::{Deserialize, Serialize};

use crate::episode::Snapshot;
use crate::error::ConfigError;
use crate::facts::GameFacts;

/// Default destination of the `pokecenter_reached` condition.
pub const POKECENTER_MAP_ID: u8 = 40;

/// Optional task-specific end condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationCondition {
    BadgeEarned,
    ArrivedAtMap { map_id: u8 },
}

impl TerminationCondition {
    pub fn parse(name: &str, target_map_id: Option<u8>) -> Result<Self, ConfigError> {
        match name {
            "badge_earned" => Ok(TerminationCondition::BadgeEarned),
            "arrived_at_map" => target_map_id
                .map(|map_id| TerminationCondition::ArrivedAtMap { map_id })
                .ok_or(ConfigError::MissingTargetMap),
            "pokecenter_reached" => Ok(TerminationCondition::ArrivedAtMap {
                map_id: target_map_id.unwrap_or(POKECENTER_MAP_ID),
            }),
            other => Err(ConfigError::UnknownTermination(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodeStatus {
    Running,
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    StepCeiling,
    BadgeEarned,
    ArrivedAtMap,
}

impl TerminationReason {
    /// Whether the episode ended because the task objective was reached.
    pub fn is_success(self) -> bool {
        !matches!(self, TerminationReason::StepCeiling)
    }
}

#[derive(Debug, Clone)]
pub struct TerminationEvaluator {
    step_ceiling: u64,
    condition: Option<TerminationCondition>,
}

impl TerminationEvaluator {
    pub fn new(step_ceiling: u64, condition: Option<TerminationCondition>) -> Self {
        Self {
            step_ceiling,
            condition,
        }
    }

    /// Decide whether the step with index `step_index` ends the episode.
    ///
    /// `previous` is the snapshot taken before this step's facts were read.
    /// A task condition wins over the ceiling when both fire on the same step.
    pub fn evaluate(
        &self,
        step_index: u64,
        facts: &GameFacts,
        previous: &Snapshot,
    ) -> Option<TerminationReason> {
        let condition = self.condition.and_then(|condition| match condition {
            TerminationCondition::BadgeEarned => {
                (facts.badges.count() > previous.badges.count())
                    .then_some(TerminationReason::BadgeEarned)
            }
            TerminationCondition::ArrivedAtMap { map_id } => (facts.position.map_id == map_id
                && previous.position.map_id != map_id)
                .then_some(TerminationReason::ArrivedAtMap),
        });

        condition.or_else(|| {
            (step_index >= self.step_ceiling.saturating_sub(1))
                .then_some(TerminationReason::StepCeiling)
        })
    }
}
