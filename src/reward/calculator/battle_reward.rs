use super::reward_calculator::{Contribution, RewardCalculator, StatePatch};
use crate::config::RewardConfig;
use crate::episode::{BattleOutcome, BattlePhase, BattleTransition, EpisodeState, HpSnapshot};
use crate::facts::GameFacts;

/// Shapes combat: damage dealt minus damage taken while a battle runs, plus
/// flat bonuses when a battle starts, is won, or is lost.
pub struct BattleRewardCalculator {
    hp_delta_weight: f32,
    win_bonus: f32,
    loss_penalty: f32,
    start_bonus: f32,
}

impl BattleRewardCalculator {
    pub fn new(hp_delta_weight: f32, win_bonus: f32, loss_penalty: f32, start_bonus: f32) -> Self {
        Self {
            hp_delta_weight,
            win_bonus,
            loss_penalty,
            start_bonus,
        }
    }

    pub fn from_config(config: &RewardConfig) -> Self {
        Self::new(
            config.battle_hp_delta,
            config.battle_win,
            config.battle_loss,
            config.battle_start,
        )
    }

    /// Non-negative HP lost between two readings. Healing and opponent
    /// switches count as zero.
    fn hp_loss(before: Option<f32>, after: Option<f32>) -> f32 {
        match (before, after) {
            (Some(before), Some(after)) => (before - after).max(0.0),
            _ => 0.0,
        }
    }

    fn exchange_reward(&self, before: HpSnapshot, after: HpSnapshot) -> f32 {
        let dealt = Self::hp_loss(before.opponent, after.opponent);
        let taken = Self::hp_loss(before.party, after.party);
        self.hp_delta_weight * (dealt - taken)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BattlePatch {
    pub phase: BattlePhase,
    pub transition: BattleTransition,
    /// HP as judged this step; replaces the snapshot's carried-forward values.
    pub hp: HpSnapshot,
}

impl StatePatch for BattlePatch {
    fn apply(self, state: &mut EpisodeState) {
        if let (BattlePhase::Active { baseline }, BattleTransition::Ended(outcome)) =
            (state.battle, self.transition)
        {
            tracing::info!(
                "Battle ended: {:?} (party hp at start {:?}, opponent hp at start {:?})",
                outcome,
                baseline.party,
                baseline.opponent
            );
        }
        state.battle = self.phase;
        state.previous.hp = self.hp;
        state.battle_counters.record(self.transition);
    }
}

impl RewardCalculator for BattleRewardCalculator {
    type Patch = BattlePatch;

    fn calculate_reward(&self, facts: &GameFacts, state: &EpisodeState) -> Contribution<BattlePatch> {
        let before = state.previous.hp;
        let mut after = state.previous.merged_hp(facts);
        // Outside a battle the last opponent reading belongs to a finished
        // encounter and must not carry into the next one.
        if !state.battle.is_active() {
            after.opponent = facts.battle.opponent_hp_fraction.into_option();
        }
        let (phase, transition) = state.battle.transition(facts.battle.active(), after);

        let reward = match transition {
            BattleTransition::StayedIdle => 0.0,
            BattleTransition::Started => self.start_bonus,
            BattleTransition::Continued => self.exchange_reward(before, after),
            BattleTransition::Ended(outcome) => {
                let bonus = match outcome {
                    BattleOutcome::Won => self.win_bonus,
                    BattleOutcome::Lost => self.loss_penalty,
                    BattleOutcome::Neither => 0.0,
                };
                self.exchange_reward(before, after) + bonus
            }
        };

        Contribution {
            reward,
            patch: BattlePatch {
                phase,
                transition,
                hp: after,
            },
        }
    }
}
