//! Info command - inspect a model and its grid statistics

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::ModelFile,
    checker,
    cli::output,
    grid,
    ports::Pomdp,
};

#[derive(Parser, Debug)]
#[command(about = "Show model and belief-grid statistics")]
pub struct InfoArgs {
    /// Path to the model file (JSON)
    pub model: PathBuf,

    /// Grid resolution M used for the grid statistics
    #[arg(long, short = 'r', default_value_t = 10)]
    pub resolution: u32,
}

pub fn execute(args: InfoArgs) -> Result<()> {
    let model = ModelFile::load(&args.model)
        .with_context(|| format!("loading model {}", args.model.display()))?;
    let pomdp = &model.pomdp;

    output::section("Model");
    output::kv("File", &args.model.display().to_string());
    output::kv("States", &output::with_separators(pomdp.num_states()));
    output::kv(
        "Observations",
        &output::with_separators(pomdp.num_observations()),
    );
    output::kv(
        "Unobservations",
        &output::with_separators(pomdp.num_unobservations()),
    );
    output::kv("Initial states", &output::with_separators(pomdp.initial_states().len()));
    output::kv("Target states", &output::with_separators(model.target.len()));
    output::kv("Rewards", if model.rewards.is_some() { "yes" } else { "no" });

    let target_obs = checker::target_observations(pomdp, &model.target)
        .context("target set is not usable")?;
    let unknown_obs: Vec<bool> = target_obs.iter().map(|&t| !t).collect();
    let grid_points = grid::enumerate_grid_points(pomdp, &unknown_obs, args.resolution);

    output::section("Grid");
    output::kv("Resolution", &args.resolution.to_string());
    output::kv("Grid points", &output::with_separators(grid_points.len()));
    for observation in 0..pomdp.num_observations() {
        let multiplicity = (0..pomdp.num_states())
            .filter(|&state| pomdp.observation(state) == observation)
            .count();
        let status = if target_obs[observation] { "target" } else { "unknown" };
        output::kv(
            &format!("Observation {observation}"),
            &format!(
                "{multiplicity} states, {} choices, {status}",
                pomdp.num_choices_for_observation(observation)
            ),
        );
    }

    Ok(())
}
