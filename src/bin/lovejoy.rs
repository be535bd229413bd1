//! lovejoy CLI - grid-based reachability analysis for POMDP models
//!
//! This CLI solves min/max reachability probabilities and expected rewards
//! on explicit POMDP model files and reports two-sided bounds.

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lovejoy")]
#[command(version, about = "Belief-grid model checking for POMDPs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a reachability objective on a model
    Solve(lovejoy::cli::commands::solve::SolveArgs),

    /// Show model and belief-grid statistics
    Info(lovejoy::cli::commands::info::InfoArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Solve(args) => lovejoy::cli::commands::solve::execute(args),
        Commands::Info(args) => lovejoy::cli::commands::info::execute(args),
    }
}
