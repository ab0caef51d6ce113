use std::path::PathBuf;

use clap::Parser;

use pokebot_env::tasks;
use pokebot_env::{AppError, EnvConfig, Environment, GameAction, MemoryTrace, PokemonEnv, ReplayEmulator};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use tracing::Level;

fn init_logging() {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();
}

/// Replay a recorded memory trace with random inputs and print each step's reward breakdown.
#[derive(Parser, Debug)]
#[command(name = "pokebot-env")]
struct Args {
    /// JSON memory trace to replay
    trace: PathBuf,
    /// Config file layered under POKEBOT__* environment variables
    #[arg(long, conflicts_with = "task")]
    config: Option<PathBuf>,
    /// Curriculum task to take the configuration from
    #[arg(long)]
    task: Option<String>,
    /// Steps to run (defaults to the trace length)
    #[arg(long)]
    steps: Option<u64>,
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), AppError> {
    init_logging();
    let args = Args::parse();

    let config = match &args.task {
        Some(name) => tasks::task(name)?.into_env_config(),
        None => EnvConfig::load(args.config.as_deref())?,
    };
    let trace = MemoryTrace::from_json_file(&args.trace)?;
    let steps = args.steps.unwrap_or(trace.frames.len() as u64);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::seed_from_u64(rand::rng().random()),
    };

    let mut env = PokemonEnv::from_config(ReplayEmulator::new(trace), config)?;
    let facts = env.reset()?;
    println!("{}", serde_json::to_string(&json!({ "reset": facts }))?);

    for _ in 0..steps {
        let action = GameAction::sample(&mut rng);
        let outcome = env.step(action)?;
        println!(
            "{}",
            serde_json::to_string(&json!({
                "action": action,
                "reward": outcome.reward,
                "breakdown": outcome.diagnostics.to_map(),
                "position": outcome.facts.position,
            }))?
        );
        if let Some(summary) = outcome.diagnostics.summary {
            println!("{}", serde_json::to_string(&json!({ "summary": summary }))?);
            break;
        }
    }

    Ok(())
}
