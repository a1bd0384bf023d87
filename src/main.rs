//! Infinitetris runner (default binary).
//!
//! Solves clearance after clearance on an endless board and plays the result
//! in the terminal, exports it as JSON lines, or just runs headless.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::EnvFilter;

use infinitetris::core::{Board, LcgRandom, RandomSource, SystemRandom};
use infinitetris::engine::{Animator, MoveSolver, Runner};
use infinitetris::term::{JsonLinesAnimator, NopAnimator, TerminalAnimator};
use infinitetris::types::Size;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Animate in the terminal
    Term,
    /// Write the event stream as JSON lines
    Json,
    /// Run the solver only
    None,
}

#[derive(Parser)]
#[command(
    name = "infinitetris",
    about = "Endless Tetris clearance solver with animated playback"
)]
struct Cli {
    /// Seed for reproducible runs (system randomness when omitted)
    #[arg(long, env = "INFINITETRIS_SEED")]
    seed: Option<u64>,

    /// Number of clearances to produce
    #[arg(long, env = "INFINITETRIS_CLEARS", default_value_t = 10)]
    clears: usize,

    /// Where the event stream goes
    #[arg(long, env = "INFINITETRIS_OUTPUT", value_enum, default_value_t = Output::Term)]
    output: Output,

    /// Destination file for `--output json`
    #[arg(long, env = "INFINITETRIS_JSON_PATH", default_value = "infinitetris.jsonl")]
    json_path: PathBuf,

    /// Search nodes a single clearance attempt may draw (0 for no limit)
    #[arg(long, env = "INFINITETRIS_NODE_LIMIT", default_value_t = 5000)]
    node_limit: u64,

    /// Playback speed multiplier for terminal output
    #[arg(long, env = "INFINITETRIS_SPEED", default_value_t = 1.0, value_parser = parse_speed)]
    speed: f64,
}

fn parse_speed(s: &str) -> Result<f64, String> {
    let speed = s
        .parse::<f64>()
        .map_err(|_| format!("invalid speed '{}'", s))?;
    if !speed.is_finite() || speed <= 0.0 {
        return Err(format!("speed must be positive, got '{}'", s));
    }
    Ok(speed)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    info!(
        seed = ?cli.seed,
        clears = cli.clears,
        output = ?cli.output,
        node_limit = cli.node_limit,
        "starting run"
    );

    let rng: Box<dyn RandomSource> = match cli.seed {
        Some(seed) => Box::new(LcgRandom::new(seed)),
        None => Box::new(SystemRandom::new()),
    };
    let animator: Box<dyn Animator> = match cli.output {
        Output::Term => Box::new(TerminalAnimator::new(cli.speed)),
        Output::Json => Box::new(JsonLinesAnimator::create(&cli.json_path)?),
        Output::None => Box::new(NopAnimator::new()),
    };

    let node_limit = (cli.node_limit > 0).then_some(cli.node_limit);
    let solver = MoveSolver::new(Board::new(Size::default()), rng).with_node_limit(node_limit);
    let mut runner = Runner::new(solver, animator);
    let summary = runner.run(cli.clears)?;
    info!(
        clears = summary.clears,
        pieces = summary.pieces,
        events = summary.events,
        "run finished"
    );

    if cli.output != Output::Term {
        println!(
            "{} clears, {} pieces, {} events",
            summary.clears, summary.pieces, summary.events
        );
    }
    if cli.output == Output::Json {
        println!("wrote {}", cli.json_path.display());
    }
    Ok(())
}
