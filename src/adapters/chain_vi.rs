//! Default inner-bound solver: value iteration on the strategy chain.
//!
//! The strategy-induced model is a finite Markov chain with absorbing
//! target states, so reachability values satisfy a linear fixed point that
//! plain Bellman iteration solves. A reverse-reachability pass first finds
//! the states that can reach the target at all: they pin probabilities to
//! zero, and for rewards they decide whether the expected value is finite.

use crate::{
    accuracy::Accuracy,
    chain::StrategyChain,
    config::{Config, TermCrit},
    error::{Error, Result},
    ports::ChainSolver,
    utils,
};

/// Bellman-iteration solver for strategy chains.
#[derive(Debug, Clone)]
pub struct ChainValueIteration {
    term_crit: TermCrit,
    term_crit_param: f64,
    max_iters: u32,
}

impl ChainValueIteration {
    /// Solver with explicit numerics.
    pub fn new(term_crit: TermCrit, term_crit_param: f64, max_iters: u32) -> Self {
        ChainValueIteration {
            term_crit,
            term_crit_param,
            max_iters,
        }
    }

    /// Solver matching a checker configuration, so both bounds converge
    /// under the same criteria.
    pub fn from_config(config: &Config) -> Self {
        ChainValueIteration::new(config.term_crit, config.term_crit_param, config.max_iters)
    }

    fn iterate<F>(&self, chain: &StrategyChain, mut init: Vec<f64>, update: F) -> Result<(f64, Accuracy)>
    where
        F: Fn(&StrategyChain, usize, &[f64]) -> f64,
    {
        let n = chain.num_states();
        let mut values = init.clone();
        let mut iters = 0;
        let mut residual = 0.0;
        let mut converged = n == 0;
        while !converged && iters < self.max_iters {
            for state in 0..n {
                values[state] = update(chain, state, &init);
            }
            residual = utils::slice_sup_norm_diff(&values, &init, self.term_crit.is_relative());
            converged = residual <= self.term_crit_param;
            init.copy_from_slice(&values);
            iters += 1;
        }
        if !converged {
            return Err(Error::NonConverged { iters, residual });
        }
        Ok((
            values.first().copied().unwrap_or(0.0),
            Accuracy::from_value_iteration(residual, self.term_crit.is_relative()),
        ))
    }
}

impl Default for ChainValueIteration {
    fn default() -> Self {
        ChainValueIteration::new(TermCrit::default(), 1e-6, 10_000)
    }
}

impl ChainSolver for ChainValueIteration {
    fn reach_probs(&self, chain: &StrategyChain) -> Result<(f64, Accuracy)> {
        let can_reach = can_reach_target(chain);
        let mut init = vec![0.0; chain.num_states()];
        for state in chain.target_states() {
            init[state] = 1.0;
        }
        self.iterate(chain, init, move |chain, state, prev| {
            if chain.is_target(state) {
                1.0
            } else if !can_reach[state] {
                0.0
            } else {
                chain
                    .transitions(state)
                    .iter()
                    .map(|&(dest, prob)| prob * prev[dest])
                    .sum()
            }
        })
    }

    fn reach_rewards(&self, chain: &StrategyChain) -> Result<(f64, Accuracy)> {
        let can_reach = can_reach_target(chain);
        // A reachable state that cannot reach the target accumulates
        // reward forever; the expected value is infinite rather than a
        // number the iteration would creep toward.
        if reachable_states(chain).iter().any(|&state| !can_reach[state]) {
            return Ok((f64::INFINITY, Accuracy::absolute(0.0)));
        }
        let init = vec![0.0; chain.num_states()];
        self.iterate(chain, init, |chain, state, prev| {
            if chain.is_target(state) || !can_reach[state] {
                0.0
            } else {
                chain.reward(state)
                    + chain
                        .transitions(state)
                        .iter()
                        .map(|&(dest, prob)| prob * prev[dest])
                        .sum::<f64>()
            }
        })
    }
}

/// States from which some path reaches a target state.
fn can_reach_target(chain: &StrategyChain) -> Vec<bool> {
    let n = chain.num_states();
    let mut can_reach: Vec<bool> = (0..n).map(|state| chain.is_target(state)).collect();
    let mut changed = true;
    while changed {
        changed = false;
        for state in 0..n {
            if can_reach[state] {
                continue;
            }
            if chain
                .transitions(state)
                .iter()
                .any(|&(dest, _)| can_reach[dest])
            {
                can_reach[state] = true;
                changed = true;
            }
        }
    }
    can_reach
}

/// States reachable from the chain's initial state.
fn reachable_states(chain: &StrategyChain) -> Vec<usize> {
    let n = chain.num_states();
    if n == 0 {
        return Vec::new();
    }
    let mut seen = vec![false; n];
    let mut stack = vec![0];
    seen[0] = true;
    let mut order = Vec::new();
    while let Some(state) = stack.pop() {
        order.push(state);
        for &(dest, _) in chain.transitions(state) {
            if !seen[dest] {
                seen[dest] = true;
                stack.push(dest);
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin_flip_chain() -> StrategyChain {
        // 0 flips between itself and two absorbing outcomes; state 1 is
        // the target, state 2 a dead end.
        let mut chain = StrategyChain::new();
        chain.add_state();
        chain.add_state();
        chain.add_state();
        chain.set_choice(0, "flip", vec![(0, 0.5), (1, 0.25), (2, 0.25)]);
        chain.mark_target(1);
        chain
    }

    #[test]
    fn reach_probability_solves_the_geometric_series() {
        let solver = ChainValueIteration::new(TermCrit::Absolute, 1e-10, 10_000);
        let (value, _) = solver.reach_probs(&coin_flip_chain()).unwrap();
        assert!((value - 0.5).abs() < 1e-8);
    }

    #[test]
    fn rewards_are_infinite_when_the_target_can_be_missed() {
        let mut chain = coin_flip_chain();
        chain.set_reward(0, 1.0);
        let solver = ChainValueIteration::default();
        let (value, _) = solver.reach_rewards(&chain).unwrap();
        assert!(value.is_infinite());
    }

    #[test]
    fn rewards_accumulate_until_absorption() {
        // 0 pays 1 per step and leaves with probability 1/2, so the
        // expected total is 2.
        let mut chain = StrategyChain::new();
        chain.add_state();
        chain.add_state();
        chain.set_choice(0, "wait", vec![(0, 0.5), (1, 0.5)]);
        chain.mark_target(1);
        chain.set_reward(0, 1.0);
        let solver = ChainValueIteration::new(TermCrit::Absolute, 1e-10, 10_000);
        let (value, _) = solver.reach_rewards(&chain).unwrap();
        assert!((value - 2.0).abs() < 1e-8);
    }
}
