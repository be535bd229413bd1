//! Strategy export artifacts and model file round-trips.

use std::fs;

use lovejoy::{ChainValueIteration, Config, Direction, ModelChecker, ModelFile};
use tempfile::TempDir;

mod common;

#[test]
fn export_writes_transitions_and_graph() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let base = temp_dir.path().join("strategy.tra");

    let (pomdp, rewards, target) = common::tiger();
    let config = Config::new(Direction::Max)
        .with_resolution(10)
        .with_strategy_export(&base);
    let solver = ChainValueIteration::from_config(&config);
    let result = ModelChecker::new(config, solver)
        .check_reach_rewards(&pomdp, &rewards, &target)
        .unwrap();

    let listing = fs::read_to_string(&base).unwrap();
    let header: Vec<usize> = listing
        .lines()
        .next()
        .unwrap()
        .split_whitespace()
        .map(|field| field.parse().unwrap())
        .collect();
    assert_eq!(header[0], result.strategy.chain.num_states());
    assert_eq!(header[2], result.strategy.chain.num_transitions());
    // One line per transition after the header.
    assert_eq!(listing.lines().count(), header[2] + 1);
    assert!(listing.contains("listen"));

    let graph = fs::read_to_string(temp_dir.path().join("strategy.tra.dot")).unwrap();
    assert!(graph.starts_with("digraph strategy {"));
    assert!(graph.contains("doublecircle"));
    assert!(graph.contains("o=3"));
}

#[test]
fn model_files_round_trip_through_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("tiger.json");

    let (pomdp, _, target) = common::tiger();
    let model = ModelFile {
        pomdp,
        target,
        rewards: None,
    };
    model.save(&path).unwrap();
    let reloaded = ModelFile::load(&path).unwrap();

    let solve = |model: &ModelFile| {
        let config = Config::new(Direction::Max).with_resolution(6);
        let solver = ChainValueIteration::from_config(&config);
        ModelChecker::new(config, solver)
            .check_reach_probs(&model.pomdp, &model.target)
            .unwrap()
            .value
    };
    assert_eq!(solve(&model), solve(&reloaded));
}
