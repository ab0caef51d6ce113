//! Memory layout of the game's working RAM.
//!
//! Every address the extractor touches is declared here once, together with
//! its width and how the raw value is judged valid.

/// How many bytes a field occupies. Multi-byte fields are big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte,
    Word,
    Bytes(u16),
}

impl Width {
    pub fn len(self) -> u16 {
        match self {
            Width::Byte => 1,
            Width::Word => 2,
            Width::Bytes(n) => n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeRule {
    /// Any value is meaningful.
    Raw,
    /// Inclusive range of meaningful values.
    Range { min: u16, max: u16 },
    /// Enumerated set of meaningful values.
    OneOf(&'static [u16]),
    /// Packed flag bits, unpacked into a flag set.
    Flags,
}

impl DecodeRule {
    pub fn accepts(self, value: u16) -> bool {
        match self {
            DecodeRule::Raw | DecodeRule::Flags => true,
            DecodeRule::Range { min, max } => (min..=max).contains(&value),
            DecodeRule::OneOf(values) => values.contains(&value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub address: u16,
    pub width: Width,
    pub rule: DecodeRule,
    /// Number of party slots the field repeats over, 1 for global fields.
    pub slots: u16,
}

impl Field {
    pub const fn new(name: &'static str, address: u16, width: Width, rule: DecodeRule) -> Self {
        Self {
            name,
            address,
            width,
            rule,
            slots: 1,
        }
    }

    const fn per_party_slot(self) -> Self {
        Self {
            slots: PARTY_SIZE as u16,
            ..self
        }
    }

    /// The same field for the given party slot.
    pub fn at_slot(self, slot: usize) -> Field {
        Field {
            address: party_slot(self, slot),
            ..self
        }
    }
}

pub const PARTY_SIZE: usize = 6;
pub const PARTY_STRIDE: u16 = 0x2C;

pub const BATTLE_NONE: u16 = 0x00;
pub const BATTLE_WILD: u16 = 0x01;
pub const BATTLE_TRAINER: u16 = 0x02;
pub const BATTLE_LOST: u16 = 0xFF;

pub const MAP_ID: Field = Field::new("map_id", 0xD35E, Width::Byte, DecodeRule::Raw);
pub const PLAYER_Y: Field = Field::new("player_y", 0xD361, Width::Byte, DecodeRule::Raw);
pub const PLAYER_X: Field = Field::new("player_x", 0xD362, Width::Byte, DecodeRule::Raw);
pub const PARTY_COUNT: Field = Field::new(
    "party_count",
    0xD163,
    Width::Byte,
    DecodeRule::Range {
        min: 0,
        max: PARTY_SIZE as u16,
    },
);
pub const PARTY_HP: Field =
    Field::new("party_hp", 0xD16C, Width::Word, DecodeRule::Raw).per_party_slot();
pub const PARTY_LEVEL: Field = Field::new(
    "party_level",
    0xD18C,
    Width::Byte,
    DecodeRule::Range { min: 1, max: 100 },
)
.per_party_slot();
pub const PARTY_MAX_HP: Field = Field::new(
    "party_max_hp",
    0xD18D,
    Width::Word,
    DecodeRule::Range { min: 1, max: 999 },
)
.per_party_slot();
pub const BATTLE_FLAG: Field = Field::new(
    "battle_flag",
    0xD057,
    Width::Byte,
    DecodeRule::OneOf(&[BATTLE_NONE, BATTLE_WILD, BATTLE_TRAINER, BATTLE_LOST]),
);
pub const OPPONENT_HP: Field = Field::new("opponent_hp", 0xCFE6, Width::Word, DecodeRule::Raw);
pub const OPPONENT_MAX_HP: Field = Field::new(
    "opponent_max_hp",
    0xCFF4,
    Width::Word,
    DecodeRule::Range { min: 1, max: 999 },
);
pub const BADGES: Field = Field::new("badges", 0xD356, Width::Byte, DecodeRule::Flags);
pub const EVENT_FLAGS: Field = Field::new(
    "event_flags",
    0xD747,
    Width::Bytes(0xD886 - 0xD747),
    DecodeRule::Flags,
);

/// The full table the extractor reads each frame.
pub const SCHEMA: &[Field] = &[
    OPPONENT_HP,
    OPPONENT_MAX_HP,
    BATTLE_FLAG,
    PARTY_COUNT,
    PARTY_HP,
    PARTY_LEVEL,
    PARTY_MAX_HP,
    BADGES,
    MAP_ID,
    PLAYER_Y,
    PLAYER_X,
    EVENT_FLAGS,
];

pub fn party_slot(field: Field, slot: usize) -> u16 {
    field.address + PARTY_STRIDE * slot as u16
}
