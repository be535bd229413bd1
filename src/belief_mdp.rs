//! Belief-MDP construction over grid points.
//!
//! For every grid belief and every choice of its observation class, the
//! builder computes the distribution over successor beliefs induced by
//! taking the choice and then conditioning on each possible observation.
//! Rows are ordered by ascending successor observation and masses below the
//! pruning threshold are dropped, so construction and every float sum over
//! a row are fully deterministic.

use crate::{belief::Belief, error::Result, ports::Pomdp};

/// Successor-observation masses below this are pruned.
const PROB_CUTOFF: f64 = 1e-12;

/// Per-choice distributions over successor beliefs for one source belief.
/// Each row lists (successor belief, probability) by ascending successor
/// observation.
pub type BeliefTransitions = Vec<Vec<(Belief, f64)>>;

/// Build the belief MDP restricted to the given source beliefs.
///
/// # Errors
///
/// Propagates [`crate::Error::Internal`] from posterior construction; a
/// failure means a successor observation was reported with zero mass.
pub fn build_belief_mdp<P: Pomdp + ?Sized>(
    pomdp: &P,
    beliefs: &[Belief],
) -> Result<Vec<BeliefTransitions>> {
    beliefs
        .iter()
        .map(|belief| build_belief_mdp_state(pomdp, belief))
        .collect()
}

/// Build the outgoing distributions of a single belief, one per choice.
pub fn build_belief_mdp_state<P: Pomdp + ?Sized>(
    pomdp: &P,
    belief: &Belief,
) -> Result<BeliefTransitions> {
    let dist = belief.to_distribution(pomdp);
    let num_choices = pomdp.num_choices_for_observation(belief.observation());
    let mut transitions = Vec::with_capacity(num_choices);
    for choice in 0..num_choices {
        let mut successors = Vec::new();
        for (next_observation, prob) in pomdp.observation_probs_after_choice(&dist, choice) {
            if prob < PROB_CUTOFF {
                continue;
            }
            let next_belief =
                pomdp.belief_after_choice_and_observation(belief, choice, next_observation)?;
            successors.push((next_belief, prob));
        }
        transitions.push(successors);
    }
    Ok(transitions)
}
