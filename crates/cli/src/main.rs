mod sample;

use std::fmt::Display;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::LevelFilter;

use aircombat_shared::*;
use aircombat_sim::geometry::GeometryResult;
use aircombat_sim::{rollout, ActionMapper, ObservationNormalizer, RewardEngine, SingleCombatTask};

#[derive(Parser)]
#[command(name = "aircombat", about = "Air-combat reward and observation shaping CLI")]
struct Cli {
    /// YAML task configuration (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Posture reward for a given geometry
    Reward {
        /// Ego aspect angle, radians
        #[arg(long)]
        ao: f64,

        /// Enemy track angle, radians
        #[arg(long)]
        ta: f64,

        /// Range to the enemy, km
        #[arg(long)]
        range: f64,

        /// Orientation version (v0, v1, v2)
        #[arg(long)]
        orientation_version: Option<ShapingVersion>,

        /// Range version (v0, v1, v2)
        #[arg(long)]
        range_version: Option<ShapingVersion>,

        /// Preferred engagement distance, km
        #[arg(long)]
        target_dist: Option<f64>,
    },

    /// Normalize one JSON frame ({"states": [..2 aircraft..]}) into observations
    Observe {
        frame: PathBuf,
    },

    /// Map discrete action indices to a control command
    Action {
        aileron: usize,
        elevator: usize,
        rudder: usize,
        throttle: usize,
    },

    /// Replay a JSON trace (array of frames) through the task
    Rollout {
        trace: PathBuf,

        /// Output path for the episode report JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Posture reward statistics over seeded random encounters
    Sample {
        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value_t = 1000)]
        count: usize,

        /// Evaluate every orientation/range version pair
        #[arg(long)]
        all_versions: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Warn };
    env_logger::Builder::new().filter_level(level).parse_default_env().init();

    let config = match &cli.config {
        Some(path) => or_exit(TaskConfig::load(path), "Failed to load config"),
        None => TaskConfig::default(),
    };
    or_exit(config.validate(), "Invalid config");

    match cli.command {
        Commands::Reward {
            ao,
            ta,
            range,
            orientation_version,
            range_version,
            target_dist,
        } => {
            let base = config.posture.shaping;
            let shaping = RewardConfig {
                orientation_version: orientation_version.unwrap_or(base.orientation_version),
                range_version: range_version.unwrap_or(base.range_version),
                target_dist: target_dist.unwrap_or(base.target_dist),
            };
            cmd_reward(shaping, ao, ta, range)
        }

        Commands::Observe { frame } => cmd_observe(&config, &frame),

        Commands::Action {
            aileron,
            elevator,
            rudder,
            throttle,
        } => cmd_action([aileron, elevator, rudder, throttle]),

        Commands::Rollout { trace, output } => cmd_rollout(config, &trace, output),

        Commands::Sample {
            seed,
            count,
            all_versions,
        } => or_exit(sample::cmd_sample(&config, seed, count, all_versions), "Sample failed"),
    }
}

/// Print `context: error` and exit non-zero.
fn or_exit<T, E: Display>(result: Result<T, E>, context: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("{}: {}", context, e);
            std::process::exit(1);
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> T {
    let text = or_exit(std::fs::read_to_string(path), &format!("Failed to read {}", path.display()));
    or_exit(serde_json::from_str(&text), &format!("Failed to parse {}", path.display()))
}

fn cmd_reward(shaping: RewardConfig, ao: f64, ta: f64, range: f64) {
    let engine = or_exit(RewardEngine::new(shaping), "Invalid reward config");
    let breakdown = engine.evaluate(&GeometryResult { ao, ta, range, side: 0 });

    println!(
        "orientation={} range={} target_dist={}",
        shaping.orientation_version, shaping.range_version, shaping.target_dist
    );
    println!("  orientation: {:>10.6}", breakdown.orientation);
    println!("  range:       {:>10.6}", breakdown.range);
    println!("  total:       {:>10.6}", breakdown.total);
}

fn cmd_observe(config: &TaskConfig, frame_path: &Path) {
    let frame: TraceFrame = read_json(frame_path);
    let observations = ObservationNormalizer::new(config.origin).normalize(&frame.states);
    for (agent, obs) in observations.iter().enumerate() {
        if !obs.within_bounds() {
            log::warn!("agent {agent}: observation outside [{OBS_LOW}, {OBS_HIGH}]");
        }
    }
    let json = or_exit(serde_json::to_string_pretty(&observations), "Failed to serialize observations");
    println!("{}", json);
}

fn cmd_action(indices: [usize; ACTION_SIZE]) {
    let command = or_exit(ActionMapper::default().denormalize(indices), "Invalid action");
    println!("aileron:  {:>7.3}", command.aileron);
    println!("elevator: {:>7.3}", command.elevator);
    println!("rudder:   {:>7.3}", command.rudder);
    println!("throttle: {:>7.3}", command.throttle);
}

fn cmd_rollout(config: TaskConfig, trace_path: &Path, output: Option<PathBuf>) {
    let trace: Vec<TraceFrame> = read_json(trace_path);
    let mut task = or_exit(SingleCombatTask::new(config), "Invalid task config");

    println!("Replaying {} frames from {}", trace.len(), trace_path.display());
    let report = rollout(&mut task, &trace);

    println!();
    println!("=== Episode ===");
    println!("Steps:   {}", report.steps);
    for agent in 0..NUM_AGENTS {
        let t = report.terminations[agent];
        println!(
            "  Agent {}: return={:.4} done={} success={}",
            agent, report.returns[agent], t.done, t.success
        );
    }
    for reason in &report.end_reasons {
        println!("  {}", reason);
    }

    if let Some(path) = output {
        let json = or_exit(serde_json::to_string_pretty(&report), "Failed to serialize report");
        or_exit(std::fs::write(&path, json), "Failed to write report");
        println!("\nReport written to {}", path.display());
    }
}
