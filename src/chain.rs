//! Strategy-induced Markov chains.
//!
//! Belief-to-belief transitions form a cyclic graph, so the chain is an
//! arena of integer-indexed states rather than an owned pointer structure.
//! Each state carries one outgoing distribution (the greedy action's
//! successor distribution), the chosen action's label for export, a target
//! flag, and a state reward used by the reward variant. State 0 is the
//! initial state.

/// A finite Markov chain induced by a strategy on the belief MDP.
#[derive(Debug, Clone, Default)]
pub struct StrategyChain {
    transitions: Vec<Vec<(usize, f64)>>,
    action_labels: Vec<Option<String>>,
    target: Vec<bool>,
    rewards: Vec<f64>,
}

impl StrategyChain {
    /// An empty chain.
    pub fn new() -> Self {
        StrategyChain::default()
    }

    /// Append a fresh state with no outgoing distribution and return its
    /// index.
    pub fn add_state(&mut self) -> usize {
        self.transitions.push(Vec::new());
        self.action_labels.push(None);
        self.target.push(false);
        self.rewards.push(0.0);
        self.transitions.len() - 1
    }

    /// Attach the chosen action's successor distribution to a state.
    pub fn set_choice(
        &mut self,
        state: usize,
        action_label: impl Into<String>,
        distribution: Vec<(usize, f64)>,
    ) {
        self.transitions[state] = distribution;
        self.action_labels[state] = Some(action_label.into());
    }

    /// Mark a state as a target state.
    pub fn mark_target(&mut self, state: usize) {
        self.target[state] = true;
    }

    /// Set the state's one-step reward.
    pub fn set_reward(&mut self, state: usize, reward: f64) {
        self.rewards[state] = reward;
    }

    /// Number of states.
    pub fn num_states(&self) -> usize {
        self.transitions.len()
    }

    /// Total number of transitions across all states.
    pub fn num_transitions(&self) -> usize {
        self.transitions.iter().map(Vec::len).sum()
    }

    /// Outgoing distribution of a state. Empty for target and other
    /// absorbing states.
    pub fn transitions(&self, state: usize) -> &[(usize, f64)] {
        &self.transitions[state]
    }

    /// Label of the action chosen at a state, if any.
    pub fn action_label(&self, state: usize) -> Option<&str> {
        self.action_labels[state].as_deref()
    }

    /// Whether a state is a target state.
    pub fn is_target(&self, state: usize) -> bool {
        self.target[state]
    }

    /// The state's one-step reward.
    pub fn reward(&self, state: usize) -> f64 {
        self.rewards[state]
    }

    /// Indices of all target states.
    pub fn target_states(&self) -> Vec<usize> {
        (0..self.num_states())
            .filter(|&state| self.target[state])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::StrategyChain;

    #[test]
    fn arena_indices_are_dense_and_stable() {
        let mut chain = StrategyChain::new();
        assert_eq!(chain.add_state(), 0);
        assert_eq!(chain.add_state(), 1);
        assert_eq!(chain.add_state(), 2);

        chain.set_choice(0, "go", vec![(1, 0.5), (2, 0.5)]);
        chain.mark_target(2);
        chain.set_reward(0, -1.0);

        assert_eq!(chain.num_states(), 3);
        assert_eq!(chain.num_transitions(), 2);
        assert_eq!(chain.action_label(0), Some("go"));
        assert_eq!(chain.action_label(1), None);
        assert!(chain.is_target(2));
        assert_eq!(chain.reward(0), -1.0);
        assert_eq!(chain.target_states(), vec![2]);
    }
}
