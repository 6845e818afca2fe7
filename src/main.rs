//! Simon Motivation - session runner
//!
//! Runs one or more simulated Simon sessions and prints per-condition
//! accuracy and response times, or the full trial log as JSON.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use simon_motivation::core::config::{EngineConfig, MotivationConfig};
use simon_motivation::core::error::Result;
use simon_motivation::task::{simulate_sessions, DesignConfig};

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Model {
    Count,
    Clock,
}

/// Simulated cued Simon task under a count or clock motivation model
#[derive(Parser, Debug)]
#[command(name = "simon_motivation")]
#[command(about = "Run simulated Simon task sessions and report accuracy and response times")]
struct Args {
    /// TOML engine configuration; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replications per condition before the valid/invalid split
    #[arg(long, default_value_t = 20)]
    trials: usize,

    /// Fraction of trials with a valid cue
    #[arg(long, default_value_t = 0.5)]
    valid_cue: f64,

    /// Present stimuli in design order instead of shuffled
    #[arg(long)]
    no_shuffle: bool,

    /// Random seed for deterministic runs
    #[arg(long)]
    seed: Option<u64>,

    /// Motivation model
    #[arg(long, value_enum)]
    model: Option<Model>,

    /// Retry budget (count model) or seconds (clock model)
    #[arg(long)]
    motivation: Option<f64>,

    /// Number of independent sessions, run in parallel
    #[arg(long, default_value_t = 1)]
    sessions: usize,

    /// Output format: text or json
    #[arg(long, default_value = "text")]
    format: String,

    /// Log every rule firing
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose {
        "simon_motivation=debug"
    } else {
        "simon_motivation=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    match (args.seed, &args.config) {
        (Some(seed), _) => config.seed = seed,
        (None, None) => config.seed = rand::random(),
        // Keep the seed from the file
        (None, Some(_)) => {}
    }
    if let Some(motivation) = motivation_override(&args, &config.motivation) {
        config = config.with_motivation(motivation);
    }
    config.validate()?;

    let design = DesignConfig {
        n_trials: args.trials,
        valid_cue_fraction: args.valid_cue,
        shuffle: !args.no_shuffle,
    };

    tracing::info!(
        seed = config.seed,
        sessions = args.sessions,
        motivation = ?config.motivation,
        "starting"
    );
    let outputs = simulate_sessions(&config, &design, args.sessions)?;

    if args.format == "json" {
        let json = serde_json::to_string_pretty(&outputs)?;
        println!("{json}");
    } else {
        for output in &outputs {
            print!("{}", output.summary());
        }
    }
    Ok(())
}

/// Model and budget from flags, filling gaps from the loaded config
fn motivation_override(args: &Args, current: &MotivationConfig) -> Option<MotivationConfig> {
    if args.model.is_none() && args.motivation.is_none() {
        return None;
    }
    let model = args.model.unwrap_or(match current {
        MotivationConfig::Count { .. } => Model::Count,
        MotivationConfig::Clock { .. } => Model::Clock,
    });
    Some(match model {
        Model::Count => MotivationConfig::Count {
            retries: args.motivation.map(|m| m.round() as i64).unwrap_or(match current {
                MotivationConfig::Count { retries } => *retries,
                MotivationConfig::Clock { .. } => 1,
            }),
        },
        Model::Clock => MotivationConfig::Clock {
            seconds: args.motivation.unwrap_or(match current {
                MotivationConfig::Clock { seconds } => *seconds,
                MotivationConfig::Count { .. } => 1.0,
            }),
        },
    })
}
