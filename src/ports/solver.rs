//! Chain-solver port - evaluates the strategy-induced Markov chain.
//!
//! The grid engine produces a finite Markov chain from the extracted greedy
//! strategy; a solver for that chain turns it into a sound inner bound. The
//! default adapter is [`crate::adapters::ChainValueIteration`], but any exact
//! or iterative solver satisfying this contract can be plugged in.

use crate::{accuracy::Accuracy, chain::StrategyChain, error::Result};

/// Solver for reachability queries on a strategy-induced Markov chain.
///
/// Both operations compute the value at the chain's initial state with
/// respect to its `target` labelling, together with an accuracy bound for
/// the returned value.
pub trait ChainSolver {
    /// Probability of eventually reaching a target state.
    fn reach_probs(&self, chain: &StrategyChain) -> Result<(f64, Accuracy)>;

    /// Expected reward accumulated before reaching a target state, using
    /// the chain's per-state rewards.
    fn reach_rewards(&self, chain: &StrategyChain) -> Result<(f64, Accuracy)>;
}
