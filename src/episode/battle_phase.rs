use serde::{Deserialize, Serialize};

use crate::facts::Reading;

/// HP fractions used to judge a battle. `None` means no valid reading has
/// been seen yet this episode.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HpSnapshot {
    pub party: Option<f32>,
    pub opponent: Option<f32>,
}

impl HpSnapshot {
    fn party_fainted(&self) -> bool {
        self.party.is_some_and(|hp| hp <= 0.0)
    }

    fn opponent_fainted(&self) -> bool {
        self.opponent.is_some_and(|hp| hp <= 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    Won,
    Lost,
    /// Fled, caught the opponent, or the zero-HP frame was never observed.
    Neither,
}

impl BattleOutcome {
    /// Loss wins the tie when both sides are observed at zero HP.
    pub fn classify(last_valid: HpSnapshot) -> Self {
        if last_valid.party_fainted() {
            BattleOutcome::Lost
        } else if last_valid.opponent_fainted() {
            BattleOutcome::Won
        } else {
            BattleOutcome::Neither
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleTransition {
    StayedIdle,
    Started,
    Continued,
    Ended(BattleOutcome),
}

/// Encounter state kept in the episode tracker.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    Idle,
    Active { baseline: HpSnapshot },
}

impl BattlePhase {
    pub fn is_active(&self) -> bool {
        matches!(self, BattlePhase::Active { .. })
    }

    /// Next phase given this frame's battle flag and the last valid HP values
    /// (this frame's readings where valid, otherwise carried forward).
    ///
    /// An invalid flag keeps the current phase.
    pub fn transition(self, active: Reading<bool>, hp: HpSnapshot) -> (BattlePhase, BattleTransition) {
        let active = active.into_option().unwrap_or(self.is_active());
        match (self, active) {
            (BattlePhase::Idle, false) => (self, BattleTransition::StayedIdle),
            (BattlePhase::Idle, true) => (
                BattlePhase::Active { baseline: hp },
                BattleTransition::Started,
            ),
            (BattlePhase::Active { .. }, true) => (self, BattleTransition::Continued),
            (BattlePhase::Active { .. }, false) => (
                BattlePhase::Idle,
                BattleTransition::Ended(BattleOutcome::classify(hp)),
            ),
        }
    }
}
