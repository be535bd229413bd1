//! Properties of the Freudenthal grid and its barycentric decomposition.

use std::collections::HashSet;

use lovejoy::{
    Belief, Pomdp,
    grid::{decompose, enumerate_grid_points},
};
use rand::{SeedableRng, rngs::StdRng};

mod common;

/// Weights below the interpolation cutoff may sit on off-grid artifacts.
const WEIGHT_CUTOFF: f64 = 1e-6;

fn binomial(n: usize, k: usize) -> usize {
    let mut result = 1usize;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}

#[test]
fn grid_point_counts_match_the_lattice() {
    for n in 1..=4usize {
        for resolution in [2u32, 4, 8] {
            let pomdp = common::cluster(n);
            let points = enumerate_grid_points(&pomdp, &[true], resolution);
            let expected = binomial(resolution as usize + n - 1, n - 1);
            assert_eq!(points.len(), expected, "n={n} M={resolution}");
        }
    }
}

#[test]
fn grid_points_are_normalized_lattice_beliefs() {
    let pomdp = common::cluster(3);
    let resolution = 6;
    for point in enumerate_grid_points(&pomdp, &[true], resolution) {
        let total: f64 = point.refinements().iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        for &coord in point.refinements() {
            assert!(coord >= 0.0);
            let scaled = coord * f64::from(resolution);
            assert!(
                (scaled - scaled.round()).abs() < 1e-9,
                "coordinate {coord} is not a multiple of 1/{resolution}"
            );
        }
    }
}

#[test]
fn decomposition_is_a_left_inverse_of_enumeration() {
    for n in 1..=4usize {
        let pomdp = common::cluster(n);
        let resolution = 4;
        for vertex in enumerate_grid_points(&pomdp, &[true], resolution) {
            let decomposition = decompose(&vertex, resolution).unwrap();
            // A grid vertex is its own subsimplex corner with unit weight.
            assert_eq!(decomposition.weights()[0], 1.0);
            assert_eq!(decomposition.vertex_belief(0), vertex);
            for &weight in &decomposition.weights()[1..] {
                assert_eq!(weight, 0.0);
            }
        }
    }
}

#[test]
fn random_beliefs_reconstruct_within_tolerance() {
    let mut rng = StdRng::seed_from_u64(20260802);
    for n in [2usize, 3, 4] {
        let pomdp = common::cluster(n);
        let grid: HashSet<Belief> = enumerate_grid_points(&pomdp, &[true], 8).into_iter().collect();
        for _ in 0..200 {
            let bu = common::sample_belief_coords(n, &mut rng);
            let belief = Belief::new(0, bu.clone());
            let decomposition = decompose(&belief, 8).unwrap();

            let weights = decomposition.weights();
            let total: f64 = weights.iter().sum();
            assert!((total - 1.0).abs() < 1e-9);
            assert!(weights.iter().all(|&weight| weight >= 0.0));

            for (i, &coord) in bu.iter().enumerate() {
                let rebuilt: f64 = weights
                    .iter()
                    .enumerate()
                    .map(|(j, &weight)| weight * decomposition.vertex_coords(j)[i])
                    .sum();
                assert!(
                    (coord - rebuilt).abs() <= 1e-4,
                    "coordinate {i} drifted: {coord} vs {rebuilt}"
                );
            }

            for (j, &weight) in weights.iter().enumerate() {
                if weight >= WEIGHT_CUTOFF {
                    assert!(
                        grid.contains(&decomposition.vertex_belief(j)),
                        "carried vertex is not a grid point"
                    );
                }
            }
        }
    }
}

#[test]
fn posterior_beliefs_decompose_onto_the_tiger_grid() {
    // The beliefs reachable in the tiger problem are produced by Bayesian
    // updates, not by grid arithmetic; they still have to land on grid
    // vertices when decomposed.
    let (pomdp, _, _) = common::tiger();
    let resolution = 10;
    let unknown = vec![true, true, true, false];
    let grid: HashSet<Belief> = enumerate_grid_points(&pomdp, &unknown, resolution)
        .into_iter()
        .collect();

    let initial = pomdp.initial_belief().unwrap();
    let dist = initial.to_distribution(&pomdp);
    for (observation, _) in pomdp.observation_probs_after_choice(&dist, 0) {
        let posterior = pomdp
            .belief_after_choice_and_observation(&initial, 0, observation)
            .unwrap();
        let decomposition = decompose(&posterior, resolution).unwrap();
        for (j, &weight) in decomposition.weights().iter().enumerate() {
            if weight >= WEIGHT_CUTOFF {
                assert!(grid.contains(&decomposition.vertex_belief(j)));
            }
        }
    }
}
