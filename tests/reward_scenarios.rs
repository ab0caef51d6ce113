mod common;

use common::{EPSILON, config_with, overworld, start, wild_battle};
use pokebot_env::{EnvConfig, EnvError, Environment, GameAction, MemoryTrace, RewardConfig, TerminationReason};

#[test]
fn first_step_onto_new_tile() {
    let trace = MemoryTrace::new(overworld(5, 5, 0, 20)).then(overworld(5, 6, 0, 20));
    let mut env = start(
        trace,
        config_with(RewardConfig {
            exploration_new_tile: 2.0,
            penalty_step: -0.01,
            ..RewardConfig::default()
        }),
    );

    let outcome = env.step(GameAction::Down).unwrap();
    assert!((outcome.reward - 1.99).abs() < EPSILON);
    assert_eq!(outcome.diagnostics.reward.exploration, 2.0);
    assert_eq!(outcome.diagnostics.reward.penalty, -0.01);
    assert_eq!(outcome.diagnostics.tiles_visited, 2);
    assert!(!outcome.done);
}

#[test]
fn standing_on_spawn_pays_the_revisit_reward() {
    let trace = MemoryTrace::new(overworld(5, 5, 0, 20)).then(overworld(5, 5, 0, 20));
    let mut env = start(
        trace,
        config_with(RewardConfig {
            exploration_new_tile: 2.0,
            exploration_recent_tile: 0.5,
            ..RewardConfig::default()
        }),
    );

    let first = env.step(GameAction::A).unwrap();
    assert_eq!(first.diagnostics.reward.exploration, 0.5);
    assert_eq!(first.diagnostics.tiles_visited, 1);
    let second = env.step(GameAction::A).unwrap();
    assert_eq!(second.diagnostics.reward.exploration, 0.0);
}

#[test]
fn won_battle_pays_exchange_and_bonus() {
    let trace = MemoryTrace::new(overworld(5, 5, 0, 12))
        .then(wild_battle(5, 5, 0, 12, 20))
        .then(overworld(5, 5, 0, 10).opponent_hp(0, 20));
    let mut env = start(
        trace,
        config_with(RewardConfig {
            battle_hp_delta: 5.0,
            battle_win: 50.0,
            ..RewardConfig::default()
        }),
    );

    let started = env.step(GameAction::A).unwrap();
    assert_eq!(started.diagnostics.battles_started, 1);
    assert_eq!(started.diagnostics.reward.battle, 0.0);

    let ended = env.step(GameAction::A).unwrap();
    assert!((ended.diagnostics.reward.battle - 54.5).abs() < EPSILON);
    assert_eq!(ended.diagnostics.battles_won, 1);
    assert_eq!(ended.diagnostics.battles_lost, 0);
}

#[test]
fn double_knockout_counts_as_loss() {
    let trace = MemoryTrace::new(overworld(5, 5, 0, 20))
        .then(wild_battle(5, 5, 0, 20, 20))
        .then(wild_battle(5, 5, 0, 4, 4))
        .then(overworld(5, 5, 0, 0).opponent_hp(0, 20));
    let mut env = start(
        trace,
        config_with(RewardConfig {
            battle_win: 50.0,
            battle_loss: -10.0,
            ..RewardConfig::default()
        }),
    );

    env.step(GameAction::A).unwrap();
    env.step(GameAction::A).unwrap();
    let ended = env.step(GameAction::A).unwrap();
    assert_eq!(ended.diagnostics.reward.battle, -10.0);
    assert_eq!(ended.diagnostics.battles_won, 0);
    assert_eq!(ended.diagnostics.battles_lost, 1);
}

#[test]
fn earlier_knockout_does_not_win_a_later_battle() {
    let trace = MemoryTrace::new(overworld(5, 5, 0, 20))
        .then(wild_battle(5, 5, 0, 20, 20))
        .then(overworld(5, 5, 0, 20).opponent_hp(0, 20))
        .then(overworld(5, 6, 0, 20))
        .then(wild_battle(5, 6, 0, 20, 0).opponent_hp(0, 0))
        .then(wild_battle(5, 6, 0, 20, 0).opponent_hp(0, 0))
        .then(overworld(5, 6, 0, 20));
    let mut env = start(
        trace,
        config_with(RewardConfig {
            battle_win: 50.0,
            ..RewardConfig::default()
        }),
    );

    let rewards: Vec<f32> = (0..6)
        .map(|_| env.step(GameAction::A).unwrap().diagnostics.reward.battle)
        .collect();
    assert_eq!(rewards, vec![0.0, 50.0, 0.0, 0.0, 0.0, 0.0]);

    let episode = env.episode().unwrap();
    assert_eq!(episode.battle_counters.started, 2);
    assert_eq!(episode.battle_counters.won, 1);
    assert_eq!(episode.battle_counters.lost, 0);
}

#[test]
fn fleeing_is_neither_won_nor_lost() {
    let trace = MemoryTrace::new(overworld(5, 5, 0, 20))
        .then(wild_battle(5, 5, 0, 20, 20))
        .then(overworld(5, 5, 0, 20).opponent_hp(20, 20));
    let mut env = start(trace, config_with(RewardConfig::balanced()));

    env.step(GameAction::B).unwrap();
    let fled = env.step(GameAction::B).unwrap();
    assert_eq!(fled.diagnostics.battles_started, 1);
    assert_eq!(fled.diagnostics.battles_won, 0);
    assert_eq!(fled.diagnostics.battles_lost, 0);
}

#[test]
fn blocked_move_outside_battle_hits_the_wall() {
    let trace = MemoryTrace::new(overworld(5, 5, 0, 20)).then(overworld(5, 5, 0, 20));
    let mut env = start(
        trace,
        config_with(RewardConfig {
            penalty_wall: -0.1,
            ..RewardConfig::default()
        }),
    );

    let outcome = env.step(GameAction::Left).unwrap();
    assert!((outcome.diagnostics.reward.penalty + 0.1).abs() < EPSILON);
}

#[test]
fn standing_still_in_battle_is_not_a_wall() {
    let trace = MemoryTrace::new(overworld(5, 5, 0, 20))
        .then(wild_battle(5, 5, 0, 20, 20))
        .then(wild_battle(5, 5, 0, 18, 15))
        .then(overworld(5, 5, 0, 18).opponent_hp(0, 20))
        .then(overworld(5, 5, 0, 18));
    let mut env = start(
        trace,
        config_with(RewardConfig {
            penalty_wall: -0.1,
            ..RewardConfig::default()
        }),
    );

    // Battle start, battle turn and the frame the battle closes on.
    for _ in 0..3 {
        let outcome = env.step(GameAction::A).unwrap();
        assert_eq!(outcome.diagnostics.reward.penalty, 0.0);
    }
    // Back on the overworld, not moving is a wall again.
    let outcome = env.step(GameAction::Up).unwrap();
    assert!((outcome.diagnostics.reward.penalty + 0.1).abs() < EPSILON);
}

#[test]
fn step_ceiling_boundary() {
    let mut trace = MemoryTrace::new(overworld(0, 0, 0, 20));
    for x in 1..=12 {
        trace = trace.then(overworld(x, 0, 0, 20));
    }
    let mut env = start(
        trace,
        EnvConfig {
            max_steps: 10,
            ..EnvConfig::default()
        },
    );

    for _ in 0..9 {
        assert!(!env.step(GameAction::Right).unwrap().done);
    }
    let last = env.step(GameAction::Right).unwrap();
    assert!(last.done);
    let summary = last.diagnostics.summary.unwrap();
    assert_eq!(summary.steps, 10);
    assert_eq!(summary.termination, TerminationReason::StepCeiling);
    assert!(!summary.success);

    assert!(matches!(
        env.step(GameAction::Right),
        Err(EnvError::EpisodeFinished(id)) if id == summary.episode_id
    ));
}

#[test]
fn badge_ends_gym_task() {
    let trace = MemoryTrace::new(overworld(3, 3, 54, 20))
        .then(overworld(3, 4, 54, 20))
        .then(overworld(3, 4, 54, 20).badges(0b0000_0001));
    let config = pokebot_env::tasks::task("gym_quest").unwrap().into_env_config();
    let mut env = start(trace, config);

    assert!(!env.step(GameAction::Down).unwrap().done);
    let outcome = env.step(GameAction::A).unwrap();
    assert!(outcome.done);
    assert!((outcome.diagnostics.reward.milestone - 500.0).abs() < EPSILON);
    let summary = outcome.diagnostics.summary.unwrap();
    assert_eq!(summary.termination, TerminationReason::BadgeEarned);
    assert_eq!(summary.badges_earned, 1);
    assert!(summary.success);
}

#[test]
fn reset_starts_a_fresh_episode() {
    let trace = MemoryTrace::new(overworld(5, 5, 0, 20))
        .then(overworld(5, 6, 0, 20))
        .then(overworld(5, 7, 0, 20));
    let mut env = start(trace, config_with(RewardConfig::balanced()));

    let first_run: Vec<f32> = (0..2)
        .map(|_| env.step(GameAction::Down).unwrap().reward)
        .collect();
    let first_id = env.episode().unwrap().episode_id;

    let first_reset = env.reset().unwrap();
    let second_reset = env.reset().unwrap();
    assert_eq!(first_reset, second_reset);

    let episode = env.episode().unwrap();
    assert_ne!(episode.episode_id, first_id);
    assert_eq!(episode.step_index, 0);
    assert_eq!(episode.tiles_visited(), 1);
    assert_eq!(episode.battle_counters.started, 0);

    let second_run: Vec<f32> = (0..2)
        .map(|_| env.step(GameAction::Down).unwrap().reward)
        .collect();
    assert_eq!(first_run, second_run);
}
