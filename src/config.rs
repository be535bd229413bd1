//! Configuration for the grid-based checker.
//!
//! The checker is driven by an immutable [`Config`] built in the
//! builder style; construction never fails, validation happens once when a
//! check starts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Optimization direction of the objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Minimize over observation-based strategies.
    Min,
    /// Maximize over observation-based strategies.
    #[default]
    Max,
}

impl Direction {
    /// Neutral starting value for an optimization in this direction.
    pub(crate) fn worst(self) -> f64 {
        match self {
            Direction::Min => f64::INFINITY,
            Direction::Max => f64::NEG_INFINITY,
        }
    }

    /// Whether `candidate` improves on `incumbent` by more than `margin`.
    pub(crate) fn strictly_better(self, candidate: f64, incumbent: f64, margin: f64) -> bool {
        match self {
            Direction::Min => incumbent - candidate > margin,
            Direction::Max => candidate - incumbent > margin,
        }
    }
}

/// Termination criterion for iterative solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermCrit {
    /// Sup-norm change bounded absolutely.
    Absolute,
    /// Sup-norm change bounded relative to the previous values.
    #[default]
    Relative,
}

impl TermCrit {
    /// Whether this criterion normalizes by the previous values.
    pub fn is_relative(self) -> bool {
        matches!(self, TermCrit::Relative)
    }
}

/// Configuration for a grid-based check.
///
/// # Examples
///
/// ```
/// use lovejoy::{Config, Direction, TermCrit};
///
/// let config = Config::new(Direction::Max)
///     .with_resolution(8)
///     .with_term_crit(TermCrit::Absolute, 1e-8)
///     .with_max_iters(50_000);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Grid resolution M; every vertex coordinate is a multiple of 1/M.
    pub resolution: u32,
    /// Iteration cap for the grid value iteration.
    pub max_iters: u32,
    /// Termination criterion.
    pub term_crit: TermCrit,
    /// Termination threshold.
    pub term_crit_param: f64,
    /// Whether hitting the iteration cap is an error or only loosens the
    /// reported accuracy.
    pub error_on_non_converge: bool,
    /// Optimization direction.
    pub direction: Direction,
    /// Base path for strategy export; `.tra` and `.dot` files are derived
    /// from it.
    pub export_strategy: Option<PathBuf>,
}

impl Config {
    /// Configuration with default numerics for the given direction.
    pub fn new(direction: Direction) -> Self {
        Config {
            resolution: 10,
            max_iters: 10_000,
            term_crit: TermCrit::default(),
            term_crit_param: 1e-6,
            error_on_non_converge: true,
            direction,
            export_strategy: None,
        }
    }

    /// Set the grid resolution.
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the iteration cap.
    pub fn with_max_iters(mut self, max_iters: u32) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the termination criterion and its threshold.
    pub fn with_term_crit(mut self, term_crit: TermCrit, param: f64) -> Self {
        self.term_crit = term_crit;
        self.term_crit_param = param;
        self
    }

    /// Tolerate non-convergence, loosening the reported accuracy instead of
    /// failing.
    pub fn tolerate_non_convergence(mut self) -> Self {
        self.error_on_non_converge = false;
        self
    }

    /// Export the extracted strategy next to the given base path.
    pub fn with_strategy_export(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_strategy = Some(path.into());
        self
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a resolution below 2 or a
    /// non-positive termination threshold.
    pub fn validate(&self) -> Result<()> {
        if self.resolution < 2 {
            return Err(Error::InvalidConfiguration {
                message: format!("grid resolution must be at least 2, got {}", self.resolution),
            });
        }
        if !(self.term_crit_param > 0.0 && self.term_crit_param.is_finite()) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "termination threshold must be positive and finite, got {}",
                    self.term_crit_param
                ),
            });
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(Direction::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = Config::new(Direction::Min)
            .with_resolution(4)
            .with_max_iters(7)
            .with_term_crit(TermCrit::Absolute, 1e-3)
            .tolerate_non_convergence();
        assert_eq!(config.direction, Direction::Min);
        assert_eq!(config.resolution, 4);
        assert_eq!(config.max_iters, 7);
        assert_eq!(config.term_crit, TermCrit::Absolute);
        assert!(!config.error_on_non_converge);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn coarse_resolutions_are_rejected() {
        assert!(Config::new(Direction::Max).with_resolution(1).validate().is_err());
    }

    #[test]
    fn direction_comparisons_respect_the_margin() {
        assert!(Direction::Max.strictly_better(1.0, 0.0, 1e-6));
        assert!(!Direction::Max.strictly_better(1.0, 1.0 - 1e-9, 1e-6));
        assert!(Direction::Min.strictly_better(0.0, 1.0, 1e-6));
        assert!(!Direction::Min.strictly_better(1.0, 0.0, 1e-6));
    }
}
