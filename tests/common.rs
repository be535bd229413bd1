//! Common test utilities for the lovejoy test suite.
//!
//! Provides a seeded Dirichlet sampler for decomposition property tests and
//! the shared example models used across the integration tests.

use lovejoy::{ExplicitPomdp, ObservationInfo, Rewards, StateInfo};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Gamma};

/// Draw a random belief over `dim` refinements: Dir(α) via normalized
/// Gamma(αᵢ, 1) draws, with a symmetric concentration of 1 so the samples
/// spread over the whole simplex.
pub fn sample_belief_coords(dim: usize, rng: &mut StdRng) -> Vec<f64> {
    let gamma = Gamma::new(1.0, 1.0).expect("gamma parameters valid");
    let mut coords: Vec<f64> = (0..dim).map(|_| gamma.sample(rng)).collect();
    let total: f64 = coords.iter().sum();
    for coord in &mut coords {
        *coord /= total;
    }
    coords
}

/// The tiger problem as an explicit POMDP.
///
/// State 0 is a start state whose first listen assigns the tiger position;
/// states 1-4 combine the tiger position (hidden refinement) with the last
/// heard signal (observation); state 5 is the absorbing "opened" state and
/// the reachability target. Listening costs 1 and reports the correct side
/// with probability 0.85; opening the empty door pays 10, opening the tiger
/// door costs 100.
pub fn tiger() -> (ExplicitPomdp, Rewards, Vec<usize>) {
    let room_actions = || ObservationInfo {
        actions: vec!["listen".into(), "open-left".into(), "open-right".into()],
    };
    let listen_left = vec![(1, 0.85), (3, 0.15)];
    let listen_right = vec![(2, 0.15), (4, 0.85)];
    let open = vec![(5, 1.0)];

    let pomdp = ExplicitPomdp::new(
        vec![
            // start
            StateInfo {
                observation: 0,
                unobservation: 0,
            },
            // tiger left / heard left
            StateInfo {
                observation: 1,
                unobservation: 0,
            },
            // tiger right / heard left
            StateInfo {
                observation: 1,
                unobservation: 1,
            },
            // tiger left / heard right
            StateInfo {
                observation: 2,
                unobservation: 0,
            },
            // tiger right / heard right
            StateInfo {
                observation: 2,
                unobservation: 1,
            },
            // opened
            StateInfo {
                observation: 3,
                unobservation: 0,
            },
        ],
        vec![
            room_actions(),
            room_actions(),
            room_actions(),
            ObservationInfo {
                actions: vec!["done".into()],
            },
        ],
        vec![0],
        vec![
            vec![
                vec![(1, 0.425), (2, 0.075), (3, 0.075), (4, 0.425)],
                open.clone(),
                open.clone(),
            ],
            vec![listen_left.clone(), open.clone(), open.clone()],
            vec![listen_right.clone(), open.clone(), open.clone()],
            vec![listen_left, open.clone(), open.clone()],
            vec![listen_right, open.clone(), open.clone()],
            vec![vec![(5, 1.0)]],
        ],
    )
    .expect("tiger model is well-formed");

    let rewards = Rewards::new(vec![
        vec![-1.0, -45.0, -45.0],
        vec![-1.0, -100.0, 10.0],
        vec![-1.0, 10.0, -100.0],
        vec![-1.0, -100.0, 10.0],
        vec![-1.0, 10.0, -100.0],
        vec![0.0],
    ]);

    (pomdp, rewards, vec![5])
}

/// Optimal expected reward of the tiger problem from the start state.
///
/// Under the optimal threshold strategy (keep listening until the signals
/// disagree by three, then open the indicated door) the value works out to
/// 5.1599190 to the printed precision.
pub const TIGER_OPTIMAL_REWARD: f64 = 5.1599190;

/// A six-state robot gridworld DTMC, fully observable.
///
/// State 5 is the goal; state 3 is a sink. The maximum (and, the chain
/// being deterministic in its single action, minimum) probability of
/// reaching the goal from state 0 is
/// 0.8 * (0.1 * 0.1) + 0.1 * (1.0 * 0.1) = 0.018.
pub fn gridworld() -> (ExplicitPomdp, Vec<usize>) {
    let rows = vec![
        vec![vec![(1, 0.8), (4, 0.1), (3, 0.1)]],
        vec![vec![(2, 0.1), (3, 0.9)]],
        vec![vec![(5, 0.1), (3, 0.9)]],
        vec![vec![(3, 1.0)]],
        vec![vec![(2, 1.0)]],
        vec![vec![(5, 1.0)]],
    ];
    let labels = vec![vec!["move".to_string()]; 6];
    let pomdp = ExplicitPomdp::fully_observable(rows, labels, 0)
        .expect("gridworld model is well-formed");
    (pomdp, vec![5])
}

/// Exact goal-reachability probability of [`gridworld`] from state 0.
pub const GRIDWORLD_REACH_PROB: f64 = 0.018;

/// A single observation class with `n` hidden refinements and a self-loop
/// action, for exercising grid enumeration and decomposition.
pub fn cluster(n: usize) -> ExplicitPomdp {
    let states = (0..n)
        .map(|i| StateInfo {
            observation: 0,
            unobservation: i,
        })
        .collect();
    let transitions = (0..n).map(|i| vec![vec![(i, 1.0)]]).collect();
    ExplicitPomdp::new(
        states,
        vec![ObservationInfo {
            actions: vec!["stay".into()],
        }],
        vec![0],
        transitions,
    )
    .expect("cluster model is well-formed")
}
