use thiserror::Error;
use uuid::Uuid;

// Main Environment Error Type

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),
    #[error("Emulator Error: {0}")]
    Emulator(#[from] EmulatorError),
    #[error("Episode {0} is finished, reset the environment before stepping again")]
    EpisodeFinished(Uuid),
    #[error("The environment has not been reset yet")]
    NotReset,
}

// Configuration Error Type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Unknown termination condition '{0}'")]
    UnknownTermination(String),
    #[error("Termination condition 'arrived_at_map' requires a target map id")]
    MissingTargetMap,
    #[error("Coefficient '{name}' is not finite: {value}")]
    NonFiniteCoefficient { name: &'static str, value: f32 },
    #[error("'{0}' must be greater than 0")]
    NotPositive(&'static str),
    #[error("Unknown reward preset '{0}'")]
    UnknownPreset(String),
    #[error("Unknown task '{0}'")]
    UnknownTask(String),
}

// Emulator Error Type
#[derive(Error, Debug)]
pub enum EmulatorError {
    #[error("Failed to read trace: {0}")]
    TraceRead(#[from] std::io::Error),
    #[error("Failed to parse trace: {0}")]
    TraceParse(#[from] serde_json::Error),
    #[error("Emulator failure: {0}")]
    Failure(String),
}

// Debugging Binary Error Type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Environment Error: {0}")]
    Env(#[from] EnvError),
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),
    #[error("Emulator Error: {0}")]
    Emulator(#[from] EmulatorError),
    #[error("Failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}
