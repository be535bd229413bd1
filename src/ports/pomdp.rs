//! POMDP port - the model contract consumed by the grid engine.
//!
//! Implementors provide the observation structure and transition kernel;
//! the belief-level operations (push-forward, observation partitioning,
//! Bayesian posterior, expected immediate reward) are derived here so every
//! model representation gets them consistently.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    belief::Belief,
    error::{Error, Result, UnsupportedFeature},
};

/// A partially observable Markov decision process.
///
/// States carry an observation class (what the agent can see) and an
/// unobservation index (the hidden refinement within the class). Two states
/// are observationally indistinguishable iff they share an observation, and
/// all states of a class offer the same ordered list of choices.
pub trait Pomdp {
    /// Number of states.
    fn num_states(&self) -> usize;

    /// Number of observation classes.
    fn num_observations(&self) -> usize;

    /// Size of the global unobservation index space.
    fn num_unobservations(&self) -> usize;

    /// Observation class of a state.
    fn observation(&self, state: usize) -> usize;

    /// Hidden refinement index of a state.
    fn unobservation(&self, state: usize) -> usize;

    /// Initial states of the model.
    fn initial_states(&self) -> &[usize];

    /// Number of choices available in the given observation class.
    fn num_choices_for_observation(&self, observation: usize) -> usize;

    /// Action label of a choice, for strategy export.
    fn action_label(&self, observation: usize, choice: usize) -> &str;

    /// Transition distribution of a state under a choice.
    fn transitions(&self, state: usize, choice: usize) -> &[(usize, f64)];

    /// The initial belief: a point mass on the unique initial state.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Unsupported`] when the model has more than one
    /// initial state.
    fn initial_belief(&self) -> Result<Belief> {
        match self.initial_states() {
            [initial] => Ok(Belief::point(self, *initial)),
            _ => Err(Error::Unsupported(UnsupportedFeature::MultipleInitialStates)),
        }
    }

    /// Push a distribution over states through the transition kernel.
    fn distribution_after_choice(&self, dist: &[f64], choice: usize) -> Vec<f64> {
        let mut next = vec![0.0; self.num_states()];
        for (state, &mass) in dist.iter().enumerate() {
            if mass <= 0.0 {
                continue;
            }
            for &(successor, prob) in self.transitions(state, choice) {
                next[successor] += mass * prob;
            }
        }
        next
    }

    /// Probability of each successor observation after taking a choice from
    /// the given distribution over states. Keys ascend by observation index.
    fn observation_probs_after_choice(&self, dist: &[f64], choice: usize) -> BTreeMap<usize, f64> {
        let next = self.distribution_after_choice(dist, choice);
        let mut probs = BTreeMap::new();
        for (successor, &mass) in next.iter().enumerate() {
            if mass > 0.0 {
                *probs.entry(self.observation(successor)).or_insert(0.0) += mass;
            }
        }
        probs
    }

    /// Bayesian posterior belief after taking a choice and observing
    /// `next_observation`.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::Internal`] when the observation has zero
    /// probability under the choice, which indicates a bug in the caller.
    fn belief_after_choice_and_observation(
        &self,
        belief: &Belief,
        choice: usize,
        next_observation: usize,
    ) -> Result<Belief> {
        let next = self.distribution_after_choice(&belief.to_distribution(self), choice);
        let mut bu = vec![0.0; self.num_unobservations()];
        let mut total = 0.0;
        for (successor, &mass) in next.iter().enumerate() {
            if self.observation(successor) == next_observation {
                bu[self.unobservation(successor)] += mass;
                total += mass;
            }
        }
        if total <= 0.0 {
            return Err(Error::internal(format!(
                "posterior for observation {next_observation} under choice {choice} has zero mass"
            )));
        }
        for value in &mut bu {
            *value /= total;
        }
        Ok(Belief::new(next_observation, bu))
    }

    /// Expected immediate reward of a choice under a belief.
    fn reward_after_choice(&self, belief: &Belief, choice: usize, rewards: &Rewards) -> f64 {
        belief
            .to_distribution(self)
            .iter()
            .enumerate()
            .filter(|&(_, &mass)| mass > 0.0)
            .map(|(state, &mass)| mass * rewards.reward(state, choice))
            .sum()
    }
}

/// One-step rewards indexed by state and choice.
///
/// Missing entries read as zero, so sparse reward structures stay compact.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rewards {
    state_choice: Vec<Vec<f64>>,
}

impl Rewards {
    /// Rewards from an explicit per-state, per-choice table.
    pub fn new(state_choice: Vec<Vec<f64>>) -> Self {
        Rewards { state_choice }
    }

    /// The reward of taking `choice` in `state` (zero when absent).
    pub fn reward(&self, state: usize, choice: usize) -> f64 {
        self.state_choice
            .get(state)
            .and_then(|choices| choices.get(choice))
            .copied()
            .unwrap_or(0.0)
    }
}
