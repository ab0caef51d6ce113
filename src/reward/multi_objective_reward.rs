use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

/// Per-channel reward breakdown. The scalar reward is exactly their sum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiObjectiveReward {
    pub exploration: f32,
    pub battle: f32,
    pub milestone: f32,
    pub penalty: f32,
}

impl MultiObjectiveReward {
    pub const CHANNELS: [&'static str; 4] = ["exploration", "battle", "milestone", "penalty"];

    pub fn to_vector(&self) -> Vec<f32> {
        vec![self.exploration, self.battle, self.milestone, self.penalty]
    }

    pub fn total(&self) -> f32 {
        self.exploration + self.battle + self.milestone + self.penalty
    }

    pub fn scaled(&self, scale: f32) -> Self {
        Self {
            exploration: self.exploration * scale,
            battle: self.battle * scale,
            milestone: self.milestone * scale,
            penalty: self.penalty * scale,
        }
    }
}

impl AddAssign for MultiObjectiveReward {
    fn add_assign(&mut self, other: Self) {
        self.exploration += other.exploration;
        self.battle += other.battle;
        self.milestone += other.milestone;
        self.penalty += other.penalty;
    }
}
