use std::sync::Arc;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use uuid::Uuid;

use crate::config::{EnvConfig, EnvSettings};
use crate::emulator::{Emulator, GameAction};
use crate::episode::EpisodeState;
use crate::error::EnvError;
use crate::facts::{FactExtractor, GameFacts};
use crate::reward::{MultiObjectiveReward, MultiObjectiveRewardProcessor, RewardProcessor};
use crate::termination::{EpisodeStatus, TerminationEvaluator, TerminationReason};

/// What a training loop drives: restart an episode, then feed it one input
/// per step until the outcome says it is done.
pub trait Environment {
    /// Facts decoded from the frame an episode starts on.
    type Observation;
    type Action;

    /// Begin a new episode. Calling it twice in a row yields the same facts.
    fn reset(&mut self) -> Result<Self::Observation, EnvError>;

    /// Press `action`, advance one frame and score the result. Fails before the
    /// first reset and once the episode has finished.
    fn step(&mut self, action: Self::Action) -> Result<StepOutcome, EnvError>;

    /// How many distinct button presses a policy can choose from.
    fn action_space(&self) -> usize;
}

/// Facts, reward and bookkeeping produced by one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub facts: GameFacts,
    /// Scalar reward, always the sum of `diagnostics.reward`'s channels.
    pub reward: f32,
    pub done: bool,
    pub diagnostics: StepDiagnostics,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepDiagnostics {
    pub step_index: u64,
    pub reward: MultiObjectiveReward,
    pub episode_totals: MultiObjectiveReward,
    pub battles_started: u32,
    pub battles_won: u32,
    pub battles_lost: u32,
    pub tiles_visited: usize,
    pub termination: Option<TerminationReason>,
    pub summary: Option<EpisodeSummary>,
}

impl StepDiagnostics {
    fn from_episode(
        episode: &EpisodeState,
        step_index: u64,
        reward: MultiObjectiveReward,
        termination: Option<TerminationReason>,
        summary: Option<EpisodeSummary>,
    ) -> Self {
        Self {
            step_index,
            reward,
            episode_totals: episode.reward_totals,
            battles_started: episode.battle_counters.started,
            battles_won: episode.battle_counters.won,
            battles_lost: episode.battle_counters.lost,
            tiles_visited: episode.tiles_visited(),
            termination,
            summary,
        }
    }

    /// Flatten into ordered key/value pairs for metric sinks.
    pub fn to_map(&self) -> IndexMap<&'static str, f64> {
        let mut map = IndexMap::new();
        map.insert("step", self.step_index as f64);
        map.insert("exploration", self.reward.exploration as f64);
        map.insert("battle", self.reward.battle as f64);
        map.insert("milestone", self.reward.milestone as f64);
        map.insert("penalty", self.reward.penalty as f64);
        map.insert("total", self.reward.total() as f64);
        map.insert("battles_started", self.battles_started as f64);
        map.insert("battles_won", self.battles_won as f64);
        map.insert("battles_lost", self.battles_lost as f64);
        map.insert("tiles_visited", self.tiles_visited as f64);
        map.insert("episode_exploration", self.episode_totals.exploration as f64);
        map.insert("episode_battle", self.episode_totals.battle as f64);
        map.insert("episode_milestone", self.episode_totals.milestone as f64);
        map.insert("episode_penalty", self.episode_totals.penalty as f64);
        map.insert("episode_total", self.episode_totals.total() as f64);
        map
    }
}

/// Reported once, on the step that ends an episode.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EpisodeSummary {
    pub episode_id: Uuid,
    pub steps: u64,
    pub total_reward: f32,
    pub totals: MultiObjectiveReward,
    pub battles_started: u32,
    pub battles_won: u32,
    pub battles_lost: u32,
    pub badges_earned: u32,
    pub levels_gained: u32,
    pub events_set: u32,
    pub key_locations_entered: u32,
    pub tiles_visited: usize,
    pub termination: TerminationReason,
    pub success: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl EpisodeSummary {
    fn new(episode: &EpisodeState, termination: TerminationReason) -> Self {
        Self {
            episode_id: episode.episode_id,
            steps: episode.step_index,
            total_reward: episode.reward_totals.total(),
            totals: episode.reward_totals,
            battles_started: episode.battle_counters.started,
            battles_won: episode.battle_counters.won,
            battles_lost: episode.battle_counters.lost,
            badges_earned: episode.progress.badges_earned,
            levels_gained: episode.progress.levels_gained,
            events_set: episode.progress.events_set,
            key_locations_entered: episode.progress.key_locations_entered,
            tiles_visited: episode.tiles_visited(),
            termination,
            success: termination.is_success(),
            started_at: episode.started_at,
            finished_at: Utc::now(),
        }
    }
}

/// One emulator, one episode at a time.
pub struct PokemonEnv<E: Emulator> {
    emulator: E,
    settings: Arc<EnvSettings>,
    processor: MultiObjectiveRewardProcessor,
    termination: TerminationEvaluator,
    episode: Option<EpisodeState>,
}

impl<E: Emulator> PokemonEnv<E> {
    pub fn new(emulator: E, settings: Arc<EnvSettings>) -> Self {
        let processor = MultiObjectiveRewardProcessor::new(&settings);
        let termination = TerminationEvaluator::new(settings.max_steps, settings.termination);
        Self {
            emulator,
            settings,
            processor,
            termination,
            episode: None,
        }
    }

    /// Validate `config` and build an environment around `emulator`.
    pub fn from_config(emulator: E, config: EnvConfig) -> Result<Self, EnvError> {
        let settings = config.validate()?;
        Ok(Self::new(emulator, Arc::new(settings)))
    }

    pub fn settings(&self) -> &Arc<EnvSettings> {
        &self.settings
    }

    pub fn episode(&self) -> Option<&EpisodeState> {
        self.episode.as_ref()
    }

    pub fn emulator(&self) -> &E {
        &self.emulator
    }
}

impl<E: Emulator> Environment for PokemonEnv<E> {
    type Observation = GameFacts;
    type Action = GameAction;

    /// Restart the emulator and discard everything from the previous episode.
    fn reset(&mut self) -> Result<GameFacts, EnvError> {
        self.emulator.restart()?;
        let facts = FactExtractor::extract(&self.emulator);
        let episode = EpisodeState::new(&facts, self.settings.recent_window);
        tracing::info!(
            "Episode {} started on map {} at ({}, {})",
            episode.episode_id,
            facts.position.map_id,
            facts.position.x,
            facts.position.y
        );
        self.episode = Some(episode);
        Ok(facts)
    }

    fn step(&mut self, action: GameAction) -> Result<StepOutcome, EnvError> {
        let episode = self.episode.as_mut().ok_or(EnvError::NotReset)?;
        if episode.status == EpisodeStatus::Done {
            return Err(EnvError::EpisodeFinished(episode.episode_id));
        }

        self.emulator.advance(action)?;
        let facts = FactExtractor::extract(&self.emulator);
        if !facts.battle.kind.is_valid() {
            tracing::warn!(
                "Battle flag unreadable on step {}; keeping battle phase {:?}",
                episode.step_index,
                episode.battle
            );
        }

        let step_index = episode.step_index;
        let reward = self.processor.process(&facts, episode);
        let termination = self
            .termination
            .evaluate(step_index, &facts, &episode.previous);

        episode.previous.advance(&facts);
        episode.reward_totals += reward;
        episode.step_index += 1;

        let summary = termination.map(|reason| {
            episode.status = EpisodeStatus::Done;
            let summary = EpisodeSummary::new(episode, reason);
            tracing::info!(
                "Episode {} finished after {} steps ({:?}): total reward {:.3}, {} tiles, {} badges, battles {}/{}/{}",
                summary.episode_id,
                summary.steps,
                summary.termination,
                summary.total_reward,
                summary.tiles_visited,
                summary.badges_earned,
                summary.battles_started,
                summary.battles_won,
                summary.battles_lost
            );
            summary
        });

        let diagnostics = StepDiagnostics::from_episode(episode, step_index, reward, termination, summary);
        Ok(StepOutcome {
            facts,
            reward: reward.total(),
            done: termination.is_some(),
            diagnostics,
        })
    }

    fn action_space(&self) -> usize {
        GameAction::ALL.len()
    }
}
