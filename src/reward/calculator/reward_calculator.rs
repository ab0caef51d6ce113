use crate::episode::EpisodeState;
use crate::facts::GameFacts;

/// Bookkeeping a calculator wants written back into the episode state.
pub trait StatePatch {
    fn apply(self, state: &mut EpisodeState);
}

/// A calculator's output for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct Contribution<P> {
    pub reward: f32,
    pub patch: P,
}

/// One reward channel. Reads the episode state, never mutates it; state
/// changes travel in the returned patch.
pub trait RewardCalculator: Send + Sync {
    type Patch: StatePatch;

    fn calculate_reward(&self, facts: &GameFacts, state: &EpisodeState) -> Contribution<Self::Patch>;
}
