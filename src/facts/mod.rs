pub mod extractor;
pub mod flags;
pub mod schema;

pub use extractor::{FactExtractor, FieldValue, RawReadings};
pub use flags::FlagSet;

use serde::{Deserialize, Serialize};

/// A decoded memory field: either a value inside its declared domain, or a
/// marker that this frame's reading cannot be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reading<T> {
    Valid(T),
    Invalid,
}

impl<T> Reading<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Reading::Valid(_))
    }

    pub fn valid(&self) -> Option<&T> {
        match self {
            Reading::Valid(value) => Some(value),
            Reading::Invalid => None,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Reading::Valid(value) => Some(value),
            Reading::Invalid => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Reading<U> {
        match self {
            Reading::Valid(value) => Reading::Valid(f(value)),
            Reading::Invalid => Reading::Invalid,
        }
    }
}

/// Map tile the player stands on. Also the key for visited-tile bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: u8,
    pub y: u8,
    pub map_id: u8,
}

impl Position {
    pub fn new(x: u8, y: u8, map_id: u8) -> Self {
        Self { x, y, map_id }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartySummary {
    pub count: Reading<u8>,
    pub levels: Reading<Vec<u8>>,
    pub hp_fractions: Vec<Reading<f32>>,
    /// Sum of current HP over sum of max HP across the whole party.
    pub total_hp_fraction: Reading<f32>,
}

impl PartySummary {
    pub fn level_sum(&self) -> Option<u32> {
        self.levels
            .valid()
            .map(|levels| levels.iter().map(|level| *level as u32).sum())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleKind {
    None,
    Wild,
    Trainer,
    /// The game flags a battle the player just lost; the battle screen is gone.
    Lost,
}

impl BattleKind {
    pub fn is_active(self) -> bool {
        matches!(self, BattleKind::Wild | BattleKind::Trainer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BattleFacts {
    pub kind: Reading<BattleKind>,
    pub opponent_hp_fraction: Reading<f32>,
}

impl BattleFacts {
    pub fn active(&self) -> Reading<bool> {
        self.kind.map(BattleKind::is_active)
    }
}

/// Everything the reward engine knows about the current frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameFacts {
    pub position: Position,
    pub party: PartySummary,
    pub battle: BattleFacts,
    pub badges: FlagSet,
    pub events: Reading<FlagSet>,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Facts for an overworld frame with a single healthy level-5 party member.
    pub fn facts_at(x: u8, y: u8, map_id: u8) -> GameFacts {
        GameFacts {
            position: Position::new(x, y, map_id),
            party: party(&[5], 1.0),
            battle: BattleFacts {
                kind: Reading::Valid(BattleKind::None),
                opponent_hp_fraction: Reading::Valid(1.0),
            },
            badges: FlagSet::empty(1),
            events: Reading::Valid(FlagSet::empty(4)),
        }
    }

    pub fn party(levels: &[u8], hp_fraction: f32) -> PartySummary {
        PartySummary {
            count: Reading::Valid(levels.len() as u8),
            levels: Reading::Valid(levels.to_vec()),
            hp_fractions: levels.iter().map(|_| Reading::Valid(hp_fraction)).collect(),
            total_hp_fraction: Reading::Valid(hp_fraction),
        }
    }

    pub fn in_battle(mut facts: GameFacts, party_hp: f32, opponent_hp: f32) -> GameFacts {
        facts.battle = BattleFacts {
            kind: Reading::Valid(BattleKind::Wild),
            opponent_hp_fraction: Reading::Valid(opponent_hp),
        };
        facts.party.total_hp_fraction = Reading::Valid(party_hp);
        facts
    }

    pub fn out_of_battle(mut facts: GameFacts, party_hp: f32, opponent_hp: f32) -> GameFacts {
        facts = in_battle(facts, party_hp, opponent_hp);
        facts.battle.kind = Reading::Valid(BattleKind::None);
        facts
    }
}
