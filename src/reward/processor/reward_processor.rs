use crate::episode::EpisodeState;
use crate::facts::GameFacts;
use crate::reward::MultiObjectiveReward;

pub trait RewardProcessor {
    /// Score one step and write the step's bookkeeping into `state`.
    fn process(&self, facts: &GameFacts, state: &mut EpisodeState) -> MultiObjectiveReward;
}
