use std::collections::HashMap;

use super::schema::{self, DecodeRule, Field, Width};
use super::{BattleFacts, BattleKind, FlagSet, GameFacts, PartySummary, Position, Reading};
use crate::emulator::MemoryAccessor;

/// One field as read from memory and judged by its decode rule.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Scalar(Reading<u16>),
    Flags(FlagSet),
}

/// Every field of [`schema::SCHEMA`] read once, one value per slot.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReadings {
    values: HashMap<&'static str, Vec<FieldValue>>,
}

impl RawReadings {
    pub fn read<M: MemoryAccessor + ?Sized>(memory: &M) -> Self {
        let values = schema::SCHEMA
            .iter()
            .map(|field| {
                let slots = (0..field.slots as usize)
                    .map(|slot| FactExtractor::read_field(memory, field.at_slot(slot)))
                    .collect();
                (field.name, slots)
            })
            .collect();
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn slots(&self, field: Field) -> usize {
        self.values.get(field.name).map_or(0, Vec::len)
    }

    /// A scalar field at `slot`. Fields missing from the table read as invalid.
    pub fn scalar(&self, field: Field, slot: usize) -> Reading<u16> {
        match self.values.get(field.name).and_then(|slots| slots.get(slot)) {
            Some(FieldValue::Scalar(reading)) => *reading,
            _ => Reading::Invalid,
        }
    }

    pub fn take_flags(&mut self, field: Field) -> Option<FlagSet> {
        let mut slots = self.values.remove(field.name)?;
        match slots.pop() {
            Some(FieldValue::Flags(flags)) => Some(flags),
            _ => None,
        }
    }
}

/// Decodes the schema table into typed facts. Stateless and side-effect free.
pub struct FactExtractor;

impl FactExtractor {
    pub fn extract<M: MemoryAccessor + ?Sized>(memory: &M) -> GameFacts {
        let mut raw = RawReadings::read(memory);
        GameFacts {
            position: Self::position(&raw),
            party: Self::party(&raw),
            battle: Self::battle(&raw),
            badges: raw
                .take_flags(schema::BADGES)
                .unwrap_or_else(|| FlagSet::empty(schema::BADGES.width.len() as usize)),
            events: Self::events(&mut raw),
        }
    }

    /// Read one field the way its decode rule asks for.
    pub fn read_field<M: MemoryAccessor + ?Sized>(memory: &M, field: Field) -> FieldValue {
        if field.rule == DecodeRule::Flags {
            let bytes = (0..field.width.len())
                .map(|offset| memory.read_byte(field.address + offset))
                .collect();
            FieldValue::Flags(FlagSet::from_bytes(bytes))
        } else {
            FieldValue::Scalar(Self::read_scalar(memory, field))
        }
    }

    /// Read a scalar field and judge it against its decode rule.
    pub fn read_scalar<M: MemoryAccessor + ?Sized>(memory: &M, field: Field) -> Reading<u16> {
        let value = match field.width {
            Width::Byte => memory.read_byte(field.address) as u16,
            Width::Word => memory.read_word(field.address),
            Width::Bytes(_) => return Reading::Invalid,
        };
        if field.rule.accepts(value) {
            Reading::Valid(value)
        } else {
            tracing::debug!(
                "Field {} at {:#06x} out of range: {}",
                field.name,
                field.address,
                value
            );
            Reading::Invalid
        }
    }

    fn position(raw: &RawReadings) -> Position {
        let coordinate = |field: Field| raw.scalar(field, 0).into_option().unwrap_or_default() as u8;
        Position::new(
            coordinate(schema::PLAYER_X),
            coordinate(schema::PLAYER_Y),
            coordinate(schema::MAP_ID),
        )
    }

    fn party(raw: &RawReadings) -> PartySummary {
        let count = raw.scalar(schema::PARTY_COUNT, 0).map(|count| count as u8);
        let Some(&size) = count.valid() else {
            return PartySummary {
                count,
                levels: Reading::Invalid,
                hp_fractions: Vec::new(),
                total_hp_fraction: Reading::Invalid,
            };
        };

        let mut levels = Some(Vec::with_capacity(size as usize));
        let mut hp_fractions = Vec::with_capacity(size as usize);
        let mut hp_total = Some((0u32, 0u32));

        for slot in 0..size as usize {
            let level = raw.scalar(schema::PARTY_LEVEL, slot);
            levels = match (levels, level) {
                (Some(mut values), Reading::Valid(level)) => {
                    values.push(level as u8);
                    Some(values)
                }
                _ => None,
            };

            let hp = raw.scalar(schema::PARTY_HP, slot);
            let max_hp = raw.scalar(schema::PARTY_MAX_HP, slot);
            let fraction = hp_fraction(hp, max_hp);
            hp_total = match (hp_total, hp, max_hp) {
                (Some((cur, max)), Reading::Valid(hp), Reading::Valid(max_hp))
                    if fraction.is_valid() =>
                {
                    Some((cur + hp as u32, max + max_hp as u32))
                }
                _ => None,
            };
            hp_fractions.push(fraction);
        }

        let total_hp_fraction = match hp_total {
            Some((cur, max)) if max > 0 => Reading::Valid(cur as f32 / max as f32),
            _ => Reading::Invalid,
        };

        PartySummary {
            count,
            levels: levels.map_or(Reading::Invalid, Reading::Valid),
            hp_fractions,
            total_hp_fraction,
        }
    }

    fn battle(raw: &RawReadings) -> BattleFacts {
        let kind = raw.scalar(schema::BATTLE_FLAG, 0).map(|flag| match flag {
            schema::BATTLE_WILD => BattleKind::Wild,
            schema::BATTLE_TRAINER => BattleKind::Trainer,
            schema::BATTLE_LOST => BattleKind::Lost,
            _ => BattleKind::None,
        });
        let opponent_hp_fraction = hp_fraction(
            raw.scalar(schema::OPPONENT_HP, 0),
            raw.scalar(schema::OPPONENT_MAX_HP, 0),
        );
        BattleFacts {
            kind,
            opponent_hp_fraction,
        }
    }

    /// Event flags read as all ones while the save data is still being loaded.
    fn events(raw: &mut RawReadings) -> Reading<FlagSet> {
        match raw.take_flags(schema::EVENT_FLAGS) {
            Some(flags) if flags.as_bytes().iter().all(|byte| *byte == 0xFF) => {
                tracing::debug!("Event flags read as uninitialised memory");
                Reading::Invalid
            }
            Some(flags) => Reading::Valid(flags),
            None => Reading::Invalid,
        }
    }
}

fn hp_fraction(hp: Reading<u16>, max_hp: Reading<u16>) -> Reading<f32> {
    match (hp, max_hp) {
        (Reading::Valid(hp), Reading::Valid(max_hp)) if max_hp > 0 && hp <= max_hp => {
            Reading::Valid(hp as f32 / max_hp as f32)
        }
        _ => Reading::Invalid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::{MemoryTrace, ReplayEmulator, TraceFrame};

    fn memory(frame: TraceFrame) -> ReplayEmulator {
        ReplayEmulator::new(MemoryTrace::new(frame))
    }

    #[test]
    fn decodes_overworld_frame() {
        let emulator = memory(
            TraceFrame::new()
                .position(5, 6, 12)
                .party(&[(12, 30, 40), (7, 10, 10)])
                .battle_flag(0)
                .badges(0b0000_0011)
                .event_flag(9),
        );
        let facts = FactExtractor::extract(&emulator);

        assert_eq!(facts.position, Position::new(5, 6, 12));
        assert_eq!(facts.party.count, Reading::Valid(2));
        assert_eq!(facts.party.levels, Reading::Valid(vec![12, 7]));
        assert_eq!(facts.party.level_sum(), Some(19));
        assert_eq!(facts.party.hp_fractions, vec![Reading::Valid(0.75), Reading::Valid(1.0)]);
        assert_eq!(facts.party.total_hp_fraction, Reading::Valid(0.8));
        assert_eq!(facts.battle.active(), Reading::Valid(false));
        assert_eq!(facts.badges.count(), 2);
        let events = facts.events.valid().unwrap();
        assert!(events.get(9));
        assert_eq!(events.count(), 1);
        assert_eq!(events.len(), (0xD886 - 0xD747) * 8);
    }

    #[test]
    fn hp_above_max_is_invalid() {
        let emulator = memory(TraceFrame::new().party(&[(5, 50, 20)]));
        let facts = FactExtractor::extract(&emulator);
        assert_eq!(facts.party.hp_fractions, vec![Reading::Invalid]);
        assert_eq!(facts.party.total_hp_fraction, Reading::Invalid);
        assert_eq!(facts.party.levels, Reading::Valid(vec![5]));
    }

    #[test]
    fn zero_max_hp_is_invalid() {
        let emulator = memory(TraceFrame::new().party(&[(5, 0, 0)]).opponent_hp(0, 0));
        let facts = FactExtractor::extract(&emulator);
        assert_eq!(facts.party.total_hp_fraction, Reading::Invalid);
        assert_eq!(facts.battle.opponent_hp_fraction, Reading::Invalid);
    }

    #[test]
    fn oversized_party_is_invalid() {
        let emulator = memory(TraceFrame::new().byte(schema::PARTY_COUNT.address, 9));
        let facts = FactExtractor::extract(&emulator);
        assert_eq!(facts.party.count, Reading::Invalid);
        assert_eq!(facts.party.levels, Reading::Invalid);
        assert_eq!(facts.party.total_hp_fraction, Reading::Invalid);
    }

    #[test]
    fn level_outside_domain_invalidates_levels() {
        let emulator = memory(TraceFrame::new().party(&[(5, 10, 10), (0, 10, 10)]));
        let facts = FactExtractor::extract(&emulator);
        assert_eq!(facts.party.levels, Reading::Invalid);
        assert_eq!(facts.party.total_hp_fraction, Reading::Valid(1.0));
    }

    #[test]
    fn battle_flag_decoding() {
        let cases = [
            (0x00, Reading::Valid(BattleKind::None)),
            (0x01, Reading::Valid(BattleKind::Wild)),
            (0x02, Reading::Valid(BattleKind::Trainer)),
            (0xFF, Reading::Valid(BattleKind::Lost)),
            (0x07, Reading::Invalid),
        ];
        for (flag, expected) in cases {
            let emulator = memory(TraceFrame::new().battle_flag(flag).opponent_hp(10, 40));
            let facts = FactExtractor::extract(&emulator);
            assert_eq!(facts.battle.kind, expected, "flag {flag:#04x}");
            assert_eq!(facts.battle.opponent_hp_fraction, Reading::Valid(0.25));
        }
    }

    #[test]
    fn uninitialised_event_flags_are_invalid() {
        let mut frame = TraceFrame::new();
        for offset in 0..schema::EVENT_FLAGS.width.len() {
            frame = frame.byte(schema::EVENT_FLAGS.address + offset, 0xFF);
        }
        let facts = FactExtractor::extract(&memory(frame));
        assert_eq!(facts.events, Reading::Invalid);
    }

    #[test]
    fn every_table_field_is_read_per_slot() {
        let emulator = memory(TraceFrame::new().position(5, 6, 12).party(&[(12, 30, 40)]));
        let raw = RawReadings::read(&emulator);
        assert_eq!(raw.len(), schema::SCHEMA.len());
        for field in schema::SCHEMA {
            assert_eq!(raw.slots(*field), field.slots as usize, "{}", field.name);
        }
        assert_eq!(raw.scalar(schema::PLAYER_Y, 0), Reading::Valid(6));
        assert_eq!(raw.scalar(schema::PARTY_LEVEL, 0), Reading::Valid(12));
        // Empty slots still read, and judge zero levels out of range.
        assert_eq!(raw.scalar(schema::PARTY_LEVEL, 1), Reading::Invalid);
        assert_eq!(raw.scalar(schema::PARTY_LEVEL, 6), Reading::Invalid);
    }

    #[test]
    fn decode_rule_chooses_flags_or_scalar() {
        let emulator = memory(TraceFrame::new().badges(0b1000_0001).position(7, 0, 0));
        match FactExtractor::read_field(&emulator, schema::BADGES) {
            FieldValue::Flags(flags) => {
                assert_eq!(flags.count(), 2);
                assert!(flags.get(7));
            }
            other => panic!("badges decoded as {other:?}"),
        }

        let narrowed = Field::new(
            "player_x",
            schema::PLAYER_X.address,
            Width::Byte,
            DecodeRule::Range { min: 0, max: 5 },
        );
        assert_eq!(
            FactExtractor::read_field(&emulator, narrowed),
            FieldValue::Scalar(Reading::Invalid)
        );
        assert_eq!(
            FactExtractor::read_field(&emulator, schema::PLAYER_X),
            FieldValue::Scalar(Reading::Valid(7))
        );
    }
}
