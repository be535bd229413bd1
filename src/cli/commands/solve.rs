//! Solve command - run a reachability query on a POMDP model file

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use serde::Serialize;

use crate::{
    adapters::{ChainValueIteration, ModelFile},
    checker::ModelChecker,
    cli::output,
    config::{Config, Direction, TermCrit},
    ports::{Pomdp, Rewards},
};

#[derive(Parser, Debug)]
#[command(about = "Solve a reachability objective on a POMDP model")]
pub struct SolveArgs {
    /// Path to the model file (JSON)
    pub model: PathBuf,

    /// Optimization direction
    #[arg(long, short = 'd', value_enum, default_value = "max")]
    pub direction: DirectionArg,

    /// Compute expected reward to the target instead of reach probability
    #[arg(long)]
    pub rewards: bool,

    /// Grid resolution M
    #[arg(long, short = 'r', default_value_t = 10)]
    pub resolution: u32,

    /// Maximum number of value-iteration sweeps
    #[arg(long, default_value_t = 10_000)]
    pub max_iters: u32,

    /// Use an absolute termination criterion instead of relative
    #[arg(long)]
    pub absolute: bool,

    /// Termination threshold
    #[arg(long, default_value_t = 1e-6)]
    pub epsilon: f64,

    /// Tolerate non-convergence and report looser accuracy
    #[arg(long)]
    pub tolerate_non_convergence: bool,

    /// Export the induced strategy to this base path (plus a .dot file)
    #[arg(long)]
    pub export_strategy: Option<PathBuf>,

    /// Export the result summary as JSON
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// CLI-facing optimization direction
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum DirectionArg {
    Min,
    Max,
}

impl From<DirectionArg> for Direction {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Min => Direction::Min,
            DirectionArg::Max => Direction::Max,
        }
    }
}

#[derive(Serialize)]
struct ResultSummary {
    direction: String,
    objective: String,
    resolution: u32,
    value: f64,
    interval_lower: f64,
    interval_upper: f64,
    outer_bound: f64,
    inner_bound: f64,
    num_iters: u32,
    time_seconds: f64,
    strategy_states: usize,
}

pub fn execute(args: SolveArgs) -> Result<()> {
    let model = ModelFile::load(&args.model)
        .with_context(|| format!("loading model {}", args.model.display()))?;

    let mut config = Config::new(args.direction.into())
        .with_resolution(args.resolution)
        .with_max_iters(args.max_iters);
    let term_crit = if args.absolute {
        TermCrit::Absolute
    } else {
        TermCrit::Relative
    };
    config = config.with_term_crit(term_crit, args.epsilon);
    if args.tolerate_non_convergence {
        config = config.tolerate_non_convergence();
    }
    if let Some(path) = &args.export_strategy {
        config = config.with_strategy_export(path.clone());
    }

    output::section("Model");
    output::kv("File", &args.model.display().to_string());
    output::kv("States", &output::with_separators(model.pomdp.num_states()));
    output::kv("Target states", &output::with_separators(model.target.len()));

    let rewards = if args.rewards {
        match &model.rewards {
            Some(table) => Some(Rewards::new(table.clone())),
            None => bail!("model file has no rewards table but --rewards was given"),
        }
    } else {
        None
    };

    let solver = ChainValueIteration::from_config(&config);
    let checker = ModelChecker::new(config, solver);

    let spinner = output::phase_spinner(&format!(
        "Solving belief space approximation (resolution {})...",
        args.resolution
    ));
    let result = match &rewards {
        Some(rewards) => checker.check_reach_rewards(&model.pomdp, rewards, &model.target),
        None => checker.check_reach_probs(&model.pomdp, &model.target),
    };
    spinner.finish_and_clear();
    let result = result.context("grid-based check failed")?;

    output::section("Result");
    output::kv("Objective", if args.rewards { "reward" } else { "probability" });
    output::kv(
        "Direction",
        match args.direction {
            DirectionArg::Min => "min",
            DirectionArg::Max => "max",
        },
    );
    output::kv("Outer bound", &format!("{:.9}", result.outer_bound));
    output::kv("Inner bound", &format!("{:.9}", result.inner_bound));
    output::kv("Value", &format!("{:.9}", result.value));
    output::kv(
        "Interval",
        &format!("[{:.9}, {:.9}]", result.interval.lower, result.interval.upper),
    );
    output::kv("Iterations", &output::with_separators(result.num_iters as usize));
    output::kv(
        "Strategy states",
        &output::with_separators(result.strategy.chain.num_states()),
    );
    output::kv("Time", &format!("{:.3}s", result.time_taken.as_secs_f64()));
    if let Some(path) = &args.export_strategy {
        output::kv("Strategy export", &path.display().to_string());
    }

    if let Some(path) = &args.export {
        let summary = ResultSummary {
            direction: format!("{:?}", args.direction).to_lowercase(),
            objective: if args.rewards { "reward" } else { "probability" }.to_string(),
            resolution: args.resolution,
            value: result.value,
            interval_lower: result.interval.lower,
            interval_upper: result.interval.upper,
            outer_bound: result.outer_bound,
            inner_bound: result.inner_bound,
            num_iters: result.num_iters,
            time_seconds: result.time_taken.as_secs_f64(),
            strategy_states: result.strategy.chain.num_states(),
        };
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json)
            .with_context(|| format!("writing result summary {}", path.display()))?;
        output::kv("Result export", &path.display().to_string());
    }

    Ok(())
}
