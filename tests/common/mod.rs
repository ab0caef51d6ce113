#![allow(dead_code)]

use pokebot_env::{EnvConfig, Environment, MemoryTrace, PokemonEnv, ReplayEmulator, RewardConfig, TraceFrame};

pub const EPSILON: f32 = 1e-4;

/// Overworld frame with one level-5 party member at `hp`/20.
pub fn overworld(x: u8, y: u8, map_id: u8, hp: u16) -> TraceFrame {
    TraceFrame::new()
        .position(x, y, map_id)
        .party(&[(5, hp, 20)])
        .battle_flag(0)
        .opponent_hp(0, 0)
}

/// Wild battle frame with the opponent at `opponent_hp`/20.
pub fn wild_battle(x: u8, y: u8, map_id: u8, hp: u16, opponent_hp: u16) -> TraceFrame {
    TraceFrame::new()
        .position(x, y, map_id)
        .party(&[(5, hp, 20)])
        .battle_flag(1)
        .opponent_hp(opponent_hp, 20)
}

pub fn config_with(reward: RewardConfig) -> EnvConfig {
    EnvConfig {
        reward,
        ..EnvConfig::default()
    }
}

/// Build an environment and reset it.
pub fn start(trace: MemoryTrace, config: EnvConfig) -> PokemonEnv<ReplayEmulator> {
    let mut env = PokemonEnv::from_config(ReplayEmulator::new(trace), config).unwrap();
    env.reset().unwrap();
    env
}
