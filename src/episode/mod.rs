pub mod battle_phase;
pub mod state;

pub use battle_phase::{BattleOutcome, BattlePhase, BattleTransition, HpSnapshot};
pub use state::{BattleCounters, EpisodeState, ProgressCounters, RecentTiles, Snapshot};
