//! Fixed-resolution belief-grid model checking for POMDPs
//!
//! This crate provides:
//! - Freudenthal discretization of the belief simplex at a fixed resolution
//! - Belief-MDP construction and synchronous value iteration for a sound
//!   outer bound on reachability probabilities and expected rewards
//! - Greedy strategy extraction into a Markov chain whose value is a sound
//!   inner bound
//! - Two-sided results with accuracy metadata, strategy export, and a CLI
//!   for explicit model files

pub mod accuracy;
pub mod adapters;
pub mod belief;
pub mod belief_mdp;
pub mod chain;
pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod grid;
pub mod ports;
pub mod strategy;
pub mod utils;
pub mod value_iteration;

pub use accuracy::{Accuracy, Interval};
pub use adapters::{ChainValueIteration, ExplicitPomdp, ModelFile, ObservationInfo, StateInfo};
pub use belief::Belief;
pub use chain::StrategyChain;
pub use checker::{CancelToken, CheckResult, ModelChecker, Objective};
pub use config::{Config, Direction, TermCrit};
pub use error::{Error, Result, UnsupportedFeature};
pub use ports::{ChainSolver, Pomdp, Rewards};
pub use strategy::ExtractedStrategy;
