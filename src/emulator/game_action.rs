use rand::Rng;
use serde::{Deserialize, Serialize};

/// Controller inputs the agent can press, one per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameAction {
    Down,
    Left,
    Right,
    Up,
    A,
    B,
    Start,
}

impl GameAction {
    pub const ALL: [GameAction; 7] = [
        GameAction::Down,
        GameAction::Left,
        GameAction::Right,
        GameAction::Up,
        GameAction::A,
        GameAction::B,
        GameAction::Start,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Uniformly sample an action, the same way a random policy explores the action space.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Joypad register bit for this button.
    pub fn button_mask(self) -> u8 {
        match self {
            GameAction::A => 1 << 0,
            GameAction::B => 1 << 1,
            GameAction::Start => 1 << 3,
            GameAction::Right => 1 << 4,
            GameAction::Left => 1 << 5,
            GameAction::Up => 1 << 6,
            GameAction::Down => 1 << 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn index_roundtrip_covers_action_space() {
        for (index, action) in GameAction::ALL.iter().enumerate() {
            assert_eq!(GameAction::from_index(index), Some(*action));
        }
        assert_eq!(GameAction::from_index(GameAction::ALL.len()), None);
    }

    #[test]
    fn button_masks_are_distinct_bits() {
        let combined = GameAction::ALL
            .iter()
            .fold(0u8, |acc, action| {
                assert_eq!(acc & action.button_mask(), 0);
                acc | action.button_mask()
            });
        assert_eq!(combined.count_ones() as usize, GameAction::ALL.len());
    }

    #[test]
    fn sampling_stays_inside_action_space() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let action = GameAction::sample(&mut rng);
            assert!(GameAction::ALL.contains(&action));
        }
    }
}
