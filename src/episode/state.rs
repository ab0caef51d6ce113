use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::battle_phase::{BattleOutcome, BattlePhase, BattleTransition, HpSnapshot};
use crate::facts::{FlagSet, GameFacts, Position};
use crate::reward::MultiObjectiveReward;
use crate::termination::EpisodeStatus;

/// Bounded FIFO of the last `capacity` tiles stood on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentTiles {
    tiles: VecDeque<Position>,
    capacity: usize,
}

impl RecentTiles {
    pub fn new(capacity: usize) -> Self {
        Self {
            tiles: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn contains(&self, tile: &Position) -> bool {
        self.tiles.contains(tile)
    }

    /// Append a tile, evicting the oldest entry when full.
    pub fn push(&mut self, tile: Position) {
        if self.capacity == 0 {
            return;
        }
        if self.tiles.len() == self.capacity {
            self.tiles.pop_front();
        }
        self.tiles.push_back(tile);
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BattleCounters {
    pub started: u32,
    pub won: u32,
    pub lost: u32,
}

impl BattleCounters {
    pub fn record(&mut self, transition: BattleTransition) {
        match transition {
            BattleTransition::Started => self.started += 1,
            BattleTransition::Ended(BattleOutcome::Won) => self.won += 1,
            BattleTransition::Ended(BattleOutcome::Lost) => self.lost += 1,
            BattleTransition::Ended(BattleOutcome::Neither)
            | BattleTransition::StayedIdle
            | BattleTransition::Continued => {}
        }
    }
}

/// Milestones reached this episode, reported in the episode summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProgressCounters {
    pub badges_earned: u32,
    pub levels_gained: u32,
    pub events_set: u32,
    pub key_locations_entered: u32,
}

/// Previous step's facts. HP, levels and events hold the last valid reading.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub position: Position,
    pub hp: HpSnapshot,
    pub party_levels: Option<Vec<u8>>,
    pub badges: FlagSet,
    pub events: Option<FlagSet>,
}

impl Snapshot {
    pub fn seed(facts: &GameFacts) -> Self {
        Self {
            position: facts.position,
            hp: HpSnapshot {
                party: facts.party.total_hp_fraction.into_option(),
                opponent: facts.battle.opponent_hp_fraction.into_option(),
            },
            party_levels: facts.party.levels.valid().cloned(),
            badges: facts.badges.clone(),
            events: facts.events.valid().cloned(),
        }
    }

    /// Overwrite with this step's facts, carrying forward any invalid reading.
    pub fn advance(&mut self, facts: &GameFacts) {
        self.position = facts.position;
        self.hp = self.merged_hp(facts);
        if let Some(levels) = facts.party.levels.valid() {
            self.party_levels = Some(levels.clone());
        }
        self.badges = facts.badges.clone();
        if let Some(events) = facts.events.valid() {
            self.events = Some(events.clone());
        }
    }

    /// HP values as of this step: valid readings replace the snapshot's.
    pub fn merged_hp(&self, facts: &GameFacts) -> HpSnapshot {
        HpSnapshot {
            party: facts.party.total_hp_fraction.into_option().or(self.hp.party),
            opponent: facts
                .battle
                .opponent_hp_fraction
                .into_option()
                .or(self.hp.opponent),
        }
    }

    pub fn level_sum(&self) -> Option<u32> {
        self.party_levels
            .as_ref()
            .map(|levels| levels.iter().map(|level| *level as u32).sum())
    }
}

/// Everything that persists across steps within one episode.
#[derive(Debug, Clone)]
pub struct EpisodeState {
    pub episode_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub visited_tiles: HashSet<Position>,
    pub recent_tiles: RecentTiles,
    pub visit_counts: HashMap<Position, u32>,
    pub previous: Snapshot,
    pub battle: BattlePhase,
    pub battle_counters: BattleCounters,
    pub progress: ProgressCounters,
    pub reward_totals: MultiObjectiveReward,
    pub step_index: u64,
    pub status: EpisodeStatus,
}

impl EpisodeState {
    /// Seed a fresh episode from the facts read right after reset.
    ///
    /// The spawn tile counts as visited but not recent. A reset inside a
    /// battle counts that battle as started so win/loss counts never exceed it.
    pub fn new(facts: &GameFacts, recent_window: usize) -> Self {
        let previous = Snapshot::seed(facts);

        let (battle, transition) = BattlePhase::Idle.transition(facts.battle.active(), previous.hp);
        let mut battle_counters = BattleCounters::default();
        battle_counters.record(transition);

        Self {
            episode_id: Uuid::new_v4(),
            started_at: Utc::now(),
            visited_tiles: HashSet::from([facts.position]),
            recent_tiles: RecentTiles::new(recent_window),
            visit_counts: HashMap::new(),
            previous,
            battle,
            battle_counters,
            progress: ProgressCounters::default(),
            reward_totals: MultiObjectiveReward::default(),
            step_index: 0,
            status: EpisodeStatus::Running,
        }
    }

    pub fn tiles_visited(&self) -> usize {
        self.visited_tiles.len()
    }

    pub fn is_done(&self) -> bool {
        self.status == EpisodeStatus::Done
    }
}
