//! CLI infrastructure for the lovejoy solver
//!
//! This module provides the command-line interface for solving reachability
//! objectives on POMDP model files and inspecting their grid statistics.

pub mod commands;
pub mod output;
