//! Explicit-state POMDP adapter.
//!
//! The model stores per-state observation structure and per-choice
//! transition lists directly, serializes to JSON for file-based workflows,
//! and validates its own consistency on construction and load. A
//! fully-observable constructor wraps an explicit MDP or DTMC as a POMDP
//! whose observation reveals the state, which is how plain Markov models
//! enter the grid engine.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    ports::Pomdp,
};

/// Observation structure of a single state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateInfo {
    /// Observation class of the state.
    pub observation: usize,
    /// Hidden refinement index within the class.
    pub unobservation: usize,
}

/// An observation class: its ordered action labels, shared by all states of
/// the class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationInfo {
    pub actions: Vec<String>,
}

/// An explicit-state POMDP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplicitPomdp {
    states: Vec<StateInfo>,
    observations: Vec<ObservationInfo>,
    num_unobservations: usize,
    initial_states: Vec<usize>,
    /// Transition lists indexed by state, then choice.
    transitions: Vec<Vec<Vec<(usize, f64)>>>,
}

impl ExplicitPomdp {
    /// Build and validate an explicit POMDP.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModel`] describing the first inconsistency
    /// found.
    pub fn new(
        states: Vec<StateInfo>,
        observations: Vec<ObservationInfo>,
        initial_states: Vec<usize>,
        transitions: Vec<Vec<Vec<(usize, f64)>>>,
    ) -> Result<Self> {
        let num_unobservations = states
            .iter()
            .map(|state| state.unobservation + 1)
            .max()
            .unwrap_or(0);
        let pomdp = ExplicitPomdp {
            states,
            observations,
            num_unobservations,
            initial_states,
            transitions,
        };
        pomdp.validate()?;
        Ok(pomdp)
    }

    /// Wrap an explicit MDP as a POMDP whose observation reveals the state.
    ///
    /// `transitions` is indexed by state then choice; `action_labels` gives
    /// each state's choice labels. Observation classes coincide with states
    /// and the refinement space collapses to a single index.
    pub fn fully_observable(
        transitions: Vec<Vec<Vec<(usize, f64)>>>,
        action_labels: Vec<Vec<String>>,
        initial_state: usize,
    ) -> Result<Self> {
        let states = (0..transitions.len())
            .map(|state| StateInfo {
                observation: state,
                unobservation: 0,
            })
            .collect();
        let observations = action_labels
            .into_iter()
            .map(|actions| ObservationInfo { actions })
            .collect();
        ExplicitPomdp::new(states, observations, vec![initial_state], transitions)
    }

    /// Check internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidModel`] for index ranges, duplicated
    /// (observation, refinement) pairs, choice-count mismatches, or
    /// unnormalized transition rows.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Error::InvalidModel { message };
        let num_states = self.states.len();
        if num_states == 0 {
            return Err(invalid("model has no states".into()));
        }
        if self.transitions.len() != num_states {
            return Err(invalid(format!(
                "expected {} transition entries, got {}",
                num_states,
                self.transitions.len()
            )));
        }
        if self.initial_states.is_empty() {
            return Err(invalid("model has no initial state".into()));
        }

        let mut seen = vec![false; self.observations.len() * self.num_unobservations];
        for (state, info) in self.states.iter().enumerate() {
            if info.observation >= self.observations.len() {
                return Err(invalid(format!(
                    "state {state} has out-of-range observation {}",
                    info.observation
                )));
            }
            if info.unobservation >= self.num_unobservations {
                return Err(invalid(format!(
                    "state {state} has out-of-range unobservation {}",
                    info.unobservation
                )));
            }
            let slot = info.observation * self.num_unobservations + info.unobservation;
            if seen[slot] {
                return Err(invalid(format!(
                    "state {state} duplicates observation pair ({}, {})",
                    info.observation, info.unobservation
                )));
            }
            seen[slot] = true;

            let num_choices = self.observations[info.observation].actions.len();
            if num_choices == 0 {
                return Err(invalid(format!(
                    "observation class {} of state {state} offers no actions",
                    info.observation
                )));
            }
            if self.transitions[state].len() != num_choices {
                return Err(invalid(format!(
                    "state {state} has {} choices but its observation class has {num_choices}",
                    self.transitions[state].len()
                )));
            }
            for (choice, row) in self.transitions[state].iter().enumerate() {
                let mut total = 0.0;
                for &(successor, prob) in row {
                    if successor >= num_states {
                        return Err(invalid(format!(
                            "state {state} choice {choice} targets missing state {successor}"
                        )));
                    }
                    if !(prob > 0.0 && prob <= 1.0 + 1e-9) {
                        return Err(invalid(format!(
                            "state {state} choice {choice} has probability {prob}"
                        )));
                    }
                    total += prob;
                }
                if (total - 1.0).abs() > 1e-9 {
                    return Err(invalid(format!(
                        "state {state} choice {choice} sums to {total}"
                    )));
                }
            }
        }

        for &initial in &self.initial_states {
            if initial >= num_states {
                return Err(invalid(format!("initial state {initial} out of range")));
            }
        }
        Ok(())
    }
}

impl Pomdp for ExplicitPomdp {
    fn num_states(&self) -> usize {
        self.states.len()
    }

    fn num_observations(&self) -> usize {
        self.observations.len()
    }

    fn num_unobservations(&self) -> usize {
        self.num_unobservations
    }

    fn observation(&self, state: usize) -> usize {
        self.states[state].observation
    }

    fn unobservation(&self, state: usize) -> usize {
        self.states[state].unobservation
    }

    fn initial_states(&self) -> &[usize] {
        &self.initial_states
    }

    fn num_choices_for_observation(&self, observation: usize) -> usize {
        self.observations[observation].actions.len()
    }

    fn action_label(&self, observation: usize, choice: usize) -> &str {
        &self.observations[observation].actions[choice]
    }

    fn transitions(&self, state: usize, choice: usize) -> &[(usize, f64)] {
        &self.transitions[state][choice]
    }
}

/// A model file: the POMDP plus the query ingredients stored alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub pomdp: ExplicitPomdp,
    /// Target state indices.
    pub target: Vec<usize>,
    /// Optional per-state, per-choice one-step rewards.
    #[serde(default)]
    pub rewards: Option<Vec<Vec<f64>>>,
}

impl ModelFile {
    /// Load and validate a JSON model file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|source| Error::io(format!("open model file {}", path.display()), source))?;
        let model: ModelFile = serde_json::from_reader(BufReader::new(file))?;
        model.pomdp.validate()?;
        Ok(model)
    }

    /// Write the model as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)
            .map_err(|source| Error::io(format!("create model file {}", path.display()), source))?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}
