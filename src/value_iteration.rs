//! Synchronous value iteration over the belief grid.
//!
//! One sweep applies the Bellman optimality operator to every grid belief,
//! reading successor values from the previous sweep's map so updates are
//! synchronous. Successor beliefs rarely fall on the grid, so their values
//! come from barycentric interpolation; beliefs whose observation is a
//! target observation are pinned to the objective's target value instead.

use std::collections::HashMap;

use crate::{
    belief::Belief,
    belief_mdp::BeliefTransitions,
    checker::CancelToken,
    config::Config,
    error::{Error, Result},
    grid::{self, WEIGHT_CUTOFF},
    utils,
};

/// Margin a candidate action value must clear to replace the incumbent.
/// Guards the argmax against float drift between equivalent actions.
pub(crate) const CHOICE_TOLERANCE: f64 = 1e-6;

/// Outcome of a grid value-iteration run.
#[derive(Debug)]
pub(crate) struct GridValues {
    /// Converged (or best-effort) values on the grid beliefs.
    pub values: HashMap<Belief, f64>,
    /// Number of sweeps performed.
    pub iters: u32,
    /// Whether the termination criterion was met.
    pub converged: bool,
    /// Final sup-norm residual between the last two sweeps.
    pub residual: f64,
}

/// Run synchronous Bellman sweeps until convergence or the iteration cap.
///
/// `immediate_rewards` is the memoized R̄(b, a) table for the reward
/// variant and `None` for the probability variant; `target_value` is the
/// value pinned on target-observation beliefs (1 for probabilities, 0 for
/// rewards).
pub(crate) fn iterate_grid(
    grid_points: &[Belief],
    belief_mdp: &[BeliefTransitions],
    immediate_rewards: Option<&[Vec<f64>]>,
    target_obs: &[bool],
    target_value: f64,
    config: &Config,
    cancel: &CancelToken,
) -> Result<GridValues> {
    let mut values: HashMap<Belief, f64> = grid_points
        .iter()
        .map(|belief| (belief.clone(), 0.0))
        .collect();
    let mut backup = values.clone();

    let mut iters = 0;
    let mut residual = 0.0;
    // An empty grid means every observation is a target observation; there
    // is nothing to iterate and the result is exact.
    let mut converged = grid_points.is_empty();

    while !converged && iters < config.max_iters {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        for (index, belief) in grid_points.iter().enumerate() {
            let mut best = config.direction.worst();
            for (choice, successors) in belief_mdp[index].iter().enumerate() {
                let mut q = immediate_rewards.map_or(0.0, |rewards| rewards[index][choice]);
                for (next_belief, prob) in successors {
                    q += prob
                        * approximate_value(
                            next_belief,
                            &backup,
                            target_obs,
                            target_value,
                            config.resolution,
                        )?;
                }
                if config.direction.strictly_better(q, best, CHOICE_TOLERANCE) {
                    best = q;
                }
            }
            values.insert(belief.clone(), best);
        }
        residual = utils::sup_norm_diff(&values, &backup, config.term_crit.is_relative());
        converged = utils::maps_are_close(
            &values,
            &backup,
            config.term_crit_param,
            config.term_crit.is_relative(),
        );
        backup.clone_from(&values);
        iters += 1;
    }

    Ok(GridValues {
        values,
        iters,
        converged,
        residual,
    })
}

/// Grid-based approximate value of an arbitrary belief: the target value on
/// target observations, interpolation everywhere else.
pub(crate) fn approximate_value(
    belief: &Belief,
    values: &HashMap<Belief, f64>,
    target_obs: &[bool],
    target_value: f64,
    resolution: u32,
) -> Result<f64> {
    if target_obs[belief.observation()] {
        Ok(target_value)
    } else {
        interpolate(belief, values, resolution)
    }
}

/// Approximate a belief's value by barycentric interpolation of grid
/// values over its subsimplex.
///
/// # Errors
///
/// Fails with [`Error::Internal`] when a vertex carrying weight is missing
/// from the value map; decomposition must only produce grid vertices.
pub(crate) fn interpolate(
    belief: &Belief,
    values: &HashMap<Belief, f64>,
    resolution: u32,
) -> Result<f64> {
    let decomposition = grid::decompose(belief, resolution)?;
    let mut total = 0.0;
    for (j, &weight) in decomposition.weights().iter().enumerate() {
        if weight < WEIGHT_CUTOFF {
            continue;
        }
        let vertex = decomposition.vertex_belief(j);
        let value = values.get(&vertex).ok_or_else(|| {
            Error::internal(format!(
                "interpolation vertex {:?} is not a grid point",
                decomposition.vertex_coords(j)
            ))
        })?;
        total += weight * value;
    }
    Ok(total)
}
