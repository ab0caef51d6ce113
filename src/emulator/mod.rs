pub mod game_action;
pub mod replay;

pub use game_action::GameAction;
pub use replay::{MemoryTrace, MemoryWrite, ReplayEmulator, TraceFrame};

use crate::error::EmulatorError;

/// Read-only view over the emulated address space.
pub trait MemoryAccessor {
    fn read_byte(&self, address: u16) -> u8;

    /// Big-endian word, the layout the game stores HP values in.
    fn read_word(&self, address: u16) -> u16 {
        u16::from_be_bytes([self.read_byte(address), self.read_byte(address.wrapping_add(1))])
    }
}

/// The external emulator driven one controller input at a time.
pub trait Emulator: MemoryAccessor {
    /// Execute one input and return once a stable frame is reached.
    fn advance(&mut self, action: GameAction) -> Result<(), EmulatorError>;

    /// Reload the starting save state. Called on every environment reset.
    fn restart(&mut self) -> Result<(), EmulatorError> {
        Ok(())
    }
}
