use serde::{Deserialize, Serialize};

/// Fixed-width set of boolean flags packed the way the game stores them.
///
/// Bit `i` lives in byte `i / 8` at position `i % 8` (least significant bit first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FlagSet {
    bytes: Vec<u8>,
}

impl FlagSet {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn empty(width_bytes: usize) -> Self {
        Self {
            bytes: vec![0; width_bytes],
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Width in flags.
    pub fn len(&self) -> usize {
        self.bytes.len() * 8
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn get(&self, index: usize) -> bool {
        self.bytes
            .get(index / 8)
            .is_some_and(|byte| byte & (1 << (index % 8)) != 0)
    }

    pub fn count(&self) -> u32 {
        self.bytes.iter().map(|byte| byte.count_ones()).sum()
    }

    /// Number of flags set here that were clear in `previous`.
    ///
    /// Flags that were cleared since `previous` do not subtract.
    pub fn newly_set(&self, previous: &FlagSet) -> u32 {
        self.bytes
            .iter()
            .enumerate()
            .map(|(i, byte)| {
                let before = previous.bytes.get(i).copied().unwrap_or(0);
                (byte & !before).count_ones()
            })
            .sum()
    }

    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len()).filter(|index| self.get(*index))
    }

    pub fn to_bools(&self) -> Vec<bool> {
        (0..self.len()).map(|index| self.get(index)).collect()
    }
}
