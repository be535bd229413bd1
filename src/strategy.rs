//! Greedy strategy extraction from converged grid values.
//!
//! Starting from the initial belief, a breadth-first walk follows the
//! action that optimizes the one-step lookahead under the converged value
//! function. Every visited belief becomes a chain state; target beliefs are
//! marked and not expanded. Ties within the comparison tolerance resolve to
//! the last action considered, so the extracted policy is deterministic but
//! not unique across equivalent implementations.

use std::collections::{HashMap, VecDeque};

use crate::{
    belief::Belief,
    belief_mdp,
    chain::StrategyChain,
    config::Config,
    error::{Error, Result},
    ports::{Pomdp, Rewards},
    value_iteration::{self, CHOICE_TOLERANCE},
};

/// A strategy-induced chain together with the belief behind each state.
#[derive(Debug)]
pub struct ExtractedStrategy {
    /// The induced Markov chain; state 0 corresponds to the initial belief.
    pub chain: StrategyChain,
    /// The belief of each chain state, indexed like the chain.
    pub beliefs: Vec<Belief>,
}

/// Explore the beliefs reachable under the greedy policy and build the
/// induced Markov chain.
pub(crate) fn extract_strategy<P: Pomdp + ?Sized>(
    pomdp: &P,
    values: &HashMap<Belief, f64>,
    target_obs: &[bool],
    rewards: Option<&Rewards>,
    target_value: f64,
    config: &Config,
) -> Result<ExtractedStrategy> {
    let mut chain = StrategyChain::new();
    let mut beliefs: Vec<Belief> = Vec::new();
    let mut index_of: HashMap<Belief, usize> = HashMap::new();
    let mut queue: VecDeque<usize> = VecDeque::new();

    let initial = pomdp.initial_belief()?;
    index_of.insert(initial.clone(), chain.add_state());
    beliefs.push(initial);
    queue.push_back(0);

    while let Some(src) = queue.pop_front() {
        let belief = beliefs[src].clone();
        if target_obs[belief.observation()] {
            chain.mark_target(src);
            continue;
        }

        let transitions = belief_mdp::build_belief_mdp_state(pomdp, &belief)?;
        let mut chosen_value = config.direction.worst();
        let mut chosen_choice = None;
        for (choice, successors) in transitions.iter().enumerate() {
            let mut q = rewards.map_or(0.0, |rewards| {
                pomdp.reward_after_choice(&belief, choice, rewards)
            });
            for (next_belief, prob) in successors {
                q += prob
                    * value_iteration::approximate_value(
                        next_belief,
                        values,
                        target_obs,
                        target_value,
                        config.resolution,
                    )?;
            }
            if config
                .direction
                .strictly_better(q, chosen_value, CHOICE_TOLERANCE)
            {
                chosen_value = q;
                chosen_choice = Some(choice);
            } else if (q - chosen_value).abs() < CHOICE_TOLERANCE {
                // Equivalent action values resolve to the last one seen.
                chosen_choice = Some(choice);
            }
        }
        let chosen_choice = chosen_choice.ok_or_else(|| {
            Error::internal(format!(
                "no action available in observation class {}",
                belief.observation()
            ))
        })?;

        let mut distribution = Vec::with_capacity(transitions[chosen_choice].len());
        for (next_belief, prob) in &transitions[chosen_choice] {
            let dest = match index_of.get(next_belief) {
                Some(&dest) => dest,
                None => {
                    let dest = chain.add_state();
                    index_of.insert(next_belief.clone(), dest);
                    beliefs.push(next_belief.clone());
                    queue.push_back(dest);
                    dest
                }
            };
            distribution.push((dest, *prob));
        }
        chain.set_choice(
            src,
            pomdp.action_label(belief.observation(), chosen_choice),
            distribution,
        );
        if let Some(rewards) = rewards {
            chain.set_reward(
                src,
                pomdp.reward_after_choice(&belief, chosen_choice, rewards),
            );
        }
    }

    Ok(ExtractedStrategy { chain, beliefs })
}
