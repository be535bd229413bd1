//! The grid-based model checker.
//!
//! Orchestrates a check end to end: validate the target set, enumerate the
//! grid, build the belief MDP, run value iteration for the outer bound,
//! extract the greedy strategy, solve the induced chain for the inner
//! bound, and assemble the two-sided result.

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use crate::{
    accuracy::{self, Accuracy, Interval},
    belief_mdp,
    config::Config,
    error::{Error, Result},
    export, grid,
    ports::{ChainSolver, Pomdp, Rewards},
    strategy::{self, ExtractedStrategy},
    value_iteration,
};

/// Cooperative cancellation flag, polled between value-iteration sweeps.
///
/// Clone the token and hand it to whatever enforces the deadline; a
/// cancelled check fails with [`Error::Cancelled`]. Timeouts are external
/// cancellation.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, un-cancelled token.
    pub fn new() -> Self {
        CancelToken::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// What to compute for the target set.
///
/// The variant selects the value pinned on target beliefs (1 for
/// reachability probabilities, 0 for rewards), whether immediate rewards
/// enter the Bellman backups, and which chain-solver operation evaluates
/// the inner bound.
#[derive(Debug, Clone, Copy)]
pub enum Objective<'a> {
    /// Probability of eventually reaching the target.
    Reachability,
    /// Expected reward accumulated before reaching the target.
    ExpectedReward(&'a Rewards),
}

impl<'a> Objective<'a> {
    fn target_value(&self) -> f64 {
        match self {
            Objective::Reachability => 1.0,
            Objective::ExpectedReward(_) => 0.0,
        }
    }

    fn rewards(&self) -> Option<&'a Rewards> {
        match *self {
            Objective::Reachability => None,
            Objective::ExpectedReward(rewards) => Some(rewards),
        }
    }
}

/// Result of a grid-based check.
#[derive(Debug)]
pub struct CheckResult {
    /// Reported value, the midpoint of `interval`.
    pub value: f64,
    /// Half-width of `interval` as an absolute error bound.
    pub accuracy: Accuracy,
    /// Two-sided bracket around the true optimum.
    pub interval: Interval,
    /// Grid value-iteration bound (optimistic side).
    pub outer_bound: f64,
    /// Accuracy of the outer bound.
    pub outer_accuracy: Accuracy,
    /// Strategy-induced chain value (conservative side).
    pub inner_bound: f64,
    /// Accuracy of the inner bound.
    pub inner_accuracy: Accuracy,
    /// Value-iteration sweeps performed.
    pub num_iters: u32,
    /// Wall-clock time of the whole check.
    pub time_taken: Duration,
    /// The extracted greedy strategy and its beliefs.
    pub strategy: ExtractedStrategy,
}

/// Grid-based checker for POMDP reachability objectives.
pub struct ModelChecker<S: ChainSolver> {
    config: Config,
    solver: S,
    cancel: CancelToken,
}

impl<S: ChainSolver> ModelChecker<S> {
    /// A checker with the given configuration and inner-bound solver.
    pub fn new(config: Config, solver: S) -> Self {
        ModelChecker {
            config,
            solver,
            cancel: CancelToken::new(),
        }
    }

    /// Use an externally-owned cancellation token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The checker's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A clone of the cancellation token driving this checker.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Min/max probability of reaching `target`, per the configured
    /// direction.
    pub fn check_reach_probs<P: Pomdp + ?Sized>(
        &self,
        pomdp: &P,
        target: &[usize],
    ) -> Result<CheckResult> {
        self.check(pomdp, target, Objective::Reachability)
    }

    /// Min/max expected reward accumulated before reaching `target`.
    pub fn check_reach_rewards<P: Pomdp + ?Sized>(
        &self,
        pomdp: &P,
        rewards: &Rewards,
        target: &[usize],
    ) -> Result<CheckResult> {
        self.check(pomdp, target, Objective::ExpectedReward(rewards))
    }

    /// Run the fixed-resolution grid approximation for an objective.
    ///
    /// # Errors
    ///
    /// [`Error::Unsupported`] for multiple initial states,
    /// [`Error::TargetNotObservable`] when the target is not a union of
    /// observation classes, [`Error::NonConverged`] when the iteration cap
    /// is hit and the configuration does not tolerate it,
    /// [`Error::Cancelled`] on cooperative cancellation, and
    /// [`Error::InnerSolve`] wrapping chain-solver failures.
    pub fn check<P: Pomdp + ?Sized>(
        &self,
        pomdp: &P,
        target: &[usize],
        objective: Objective<'_>,
    ) -> Result<CheckResult> {
        self.config.validate()?;
        let start = Instant::now();

        let initial_belief = pomdp.initial_belief()?;
        let target_obs = target_observations(pomdp, target)?;
        let unknown_obs: Vec<bool> = target_obs.iter().map(|&t| !t).collect();

        let grid_points =
            grid::enumerate_grid_points(pomdp, &unknown_obs, self.config.resolution);
        let belief_mdp = belief_mdp::build_belief_mdp(pomdp, &grid_points)?;

        // Immediate rewards are belief-independent of the sweep, so they
        // are memoized up front for the reward variant.
        let immediate_rewards: Option<Vec<Vec<f64>>> = objective.rewards().map(|rewards| {
            grid_points
                .iter()
                .map(|belief| {
                    (0..pomdp.num_choices_for_observation(belief.observation()))
                        .map(|choice| pomdp.reward_after_choice(belief, choice, rewards))
                        .collect()
                })
                .collect()
        });

        let grid_values = value_iteration::iterate_grid(
            &grid_points,
            &belief_mdp,
            immediate_rewards.as_deref(),
            &target_obs,
            objective.target_value(),
            &self.config,
            &self.cancel,
        )?;
        if !grid_values.converged && self.config.error_on_non_converge {
            return Err(Error::NonConverged {
                iters: grid_values.iters,
                residual: grid_values.residual,
            });
        }

        let outer_bound = value_iteration::approximate_value(
            &initial_belief,
            &grid_values.values,
            &target_obs,
            objective.target_value(),
            self.config.resolution,
        )?;
        let outer_accuracy = Accuracy::from_value_iteration(
            grid_values.residual,
            self.config.term_crit.is_relative(),
        );

        let strategy = strategy::extract_strategy(
            pomdp,
            &grid_values.values,
            &target_obs,
            objective.rewards(),
            objective.target_value(),
            &self.config,
        )?;
        if let Some(base) = &self.config.export_strategy {
            export::export_strategy(&strategy, pomdp, base)?;
        }

        let solve = match objective {
            Objective::Reachability => self.solver.reach_probs(&strategy.chain),
            Objective::ExpectedReward(_) => self.solver.reach_rewards(&strategy.chain),
        };
        let (inner_bound, inner_accuracy) = solve.map_err(|source| Error::InnerSolve {
            source: Box::new(source),
        })?;

        // The outer bound is optimistic for the configured direction, so it
        // forms the conservative end of the reported interval.
        let (value, accuracy, interval) = match self.config.direction {
            crate::config::Direction::Min => accuracy::value_and_accuracy_from_interval(
                outer_bound,
                outer_accuracy,
                inner_bound,
                inner_accuracy,
            ),
            crate::config::Direction::Max => accuracy::value_and_accuracy_from_interval(
                inner_bound,
                inner_accuracy,
                outer_bound,
                outer_accuracy,
            ),
        };

        Ok(CheckResult {
            value,
            accuracy,
            interval,
            outer_bound,
            outer_accuracy,
            inner_bound,
            inner_accuracy,
            num_iters: grid_values.iters,
            time_taken: start.elapsed(),
            strategy,
        })
    }
}

/// The observation classes covered by the target set.
///
/// # Errors
///
/// Fails with [`Error::TargetNotObservable`] unless the states carrying a
/// target observation are exactly the target states, and with
/// [`Error::InvalidModel`] for out-of-range state indices.
pub fn target_observations<P: Pomdp + ?Sized>(pomdp: &P, target: &[usize]) -> Result<Vec<bool>> {
    let num_states = pomdp.num_states();
    let mut is_target = vec![false; num_states];
    let mut target_obs = vec![false; pomdp.num_observations()];
    for &state in target {
        if state >= num_states {
            return Err(Error::InvalidModel {
                message: format!("target state {state} out of range (model has {num_states})"),
            });
        }
        is_target[state] = true;
        target_obs[pomdp.observation(state)] = true;
    }
    for state in 0..num_states {
        if target_obs[pomdp.observation(state)] && !is_target[state] {
            return Err(Error::TargetNotObservable);
        }
    }
    Ok(target_obs)
}
