use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Emulator, GameAction, MemoryAccessor};
use crate::error::EmulatorError;
use crate::facts::schema;

const ADDRESS_SPACE: usize = 0x1_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryWrite {
    pub address: u16,
    pub value: u8,
}

/// Memory writes applied when one frame is reached.
///
/// The builder methods encode game facts using the same address table the
/// extractor decodes, so traces can be written in terms of positions and HP.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceFrame {
    pub writes: Vec<MemoryWrite>,
}

impl TraceFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn byte(mut self, address: u16, value: u8) -> Self {
        self.writes.push(MemoryWrite { address, value });
        self
    }

    pub fn word(self, address: u16, value: u16) -> Self {
        let [high, low] = value.to_be_bytes();
        self.byte(address, high).byte(address.wrapping_add(1), low)
    }

    pub fn position(self, x: u8, y: u8, map_id: u8) -> Self {
        self.byte(schema::PLAYER_X.address, x)
            .byte(schema::PLAYER_Y.address, y)
            .byte(schema::MAP_ID.address, map_id)
    }

    /// Party members as `(level, hp, max_hp)`.
    pub fn party(mut self, members: &[(u8, u16, u16)]) -> Self {
        self = self.byte(schema::PARTY_COUNT.address, members.len() as u8);
        for (slot, (level, hp, max_hp)) in members.iter().enumerate() {
            self = self
                .byte(schema::party_slot(schema::PARTY_LEVEL, slot), *level)
                .word(schema::party_slot(schema::PARTY_HP, slot), *hp)
                .word(schema::party_slot(schema::PARTY_MAX_HP, slot), *max_hp);
        }
        self
    }

    pub fn battle_flag(self, flag: u8) -> Self {
        self.byte(schema::BATTLE_FLAG.address, flag)
    }

    pub fn opponent_hp(self, hp: u16, max_hp: u16) -> Self {
        self.word(schema::OPPONENT_HP.address, hp)
            .word(schema::OPPONENT_MAX_HP.address, max_hp)
    }

    pub fn badges(self, bits: u8) -> Self {
        self.byte(schema::BADGES.address, bits)
    }

    /// Raise one event flag by bit index. Other flags in the same byte are cleared.
    pub fn event_flag(self, index: usize) -> Self {
        let address = schema::EVENT_FLAGS.address + (index / 8) as u16;
        let bit = 1u8 << (index % 8);
        self.byte(address, bit)
    }
}

/// Recorded session: the state the game restarts from plus one frame per step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryTrace {
    pub initial: TraceFrame,
    pub frames: Vec<TraceFrame>,
}

impl MemoryTrace {
    pub fn new(initial: TraceFrame) -> Self {
        Self {
            initial,
            frames: Vec::new(),
        }
    }

    pub fn then(mut self, frame: TraceFrame) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, EmulatorError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Emulator stand-in that replays a recorded trace deterministically.
///
/// Inputs are recorded but do not influence memory. Once the trace is
/// exhausted the last frame stays on screen.
pub struct ReplayEmulator {
    trace: MemoryTrace,
    memory: Vec<u8>,
    cursor: usize,
    inputs: Vec<GameAction>,
}

impl ReplayEmulator {
    pub fn new(trace: MemoryTrace) -> Self {
        let mut emulator = Self {
            trace,
            memory: vec![0; ADDRESS_SPACE],
            cursor: 0,
            inputs: Vec::new(),
        };
        emulator.load_initial();
        emulator
    }

    pub fn inputs(&self) -> &[GameAction] {
        &self.inputs
    }

    pub fn remaining_frames(&self) -> usize {
        self.trace.frames.len().saturating_sub(self.cursor)
    }

    fn load_initial(&mut self) {
        self.memory.iter_mut().for_each(|byte| *byte = 0);
        self.cursor = 0;
        self.inputs.clear();
        let initial = self.trace.initial.writes.clone();
        self.apply(&initial);
    }

    fn apply(&mut self, writes: &[MemoryWrite]) {
        for write in writes {
            self.memory[write.address as usize] = write.value;
        }
    }
}

impl MemoryAccessor for ReplayEmulator {
    fn read_byte(&self, address: u16) -> u8 {
        self.memory[address as usize]
    }
}

impl Emulator for ReplayEmulator {
    fn advance(&mut self, action: GameAction) -> Result<(), EmulatorError> {
        tracing::trace!(
            "Applied keypad mask {:#010b} for action {:?}",
            action.button_mask(),
            action
        );
        self.inputs.push(action);
        if let Some(frame) = self.trace.frames.get(self.cursor) {
            let writes = frame.writes.clone();
            self.apply(&writes);
            self.cursor += 1;
        }
        Ok(())
    }

    fn restart(&mut self) -> Result<(), EmulatorError> {
        self.load_initial();
        Ok(())
    }
}
