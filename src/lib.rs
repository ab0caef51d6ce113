pub mod config;
pub mod emulator;
pub mod environment;
pub mod episode;
pub mod error;
pub mod facts;
pub mod reward;
pub mod tasks;
pub mod termination;

pub use config::{EnvConfig, EnvSettings, RewardConfig};
pub use emulator::{Emulator, GameAction, MemoryAccessor, MemoryTrace, ReplayEmulator, TraceFrame};
pub use environment::{Environment, EpisodeSummary, PokemonEnv, StepDiagnostics, StepOutcome};
pub use error::{AppError, ConfigError, EmulatorError, EnvError};
pub use facts::{FactExtractor, GameFacts, Reading};
pub use reward::MultiObjectiveReward;
pub use termination::{TerminationCondition, TerminationReason};
