//! Accuracy metadata attached to computed values.
//!
//! Every value the checker reports carries an error half-width, either
//! absolute or relative to the value's magnitude. Two-sided results are
//! assembled from an interval whose ends come from independently-accurate
//! bounds.

use serde::{Deserialize, Serialize};

/// An error half-width around a reported value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Accuracy {
    /// The half-width itself.
    pub error: f64,
    /// Whether `error` is relative to the value's magnitude.
    pub relative: bool,
}

impl Accuracy {
    /// An absolute error bound.
    pub fn absolute(error: f64) -> Self {
        Accuracy {
            error,
            relative: false,
        }
    }

    /// An error bound relative to the value's magnitude.
    pub fn relative(error: f64) -> Self {
        Accuracy {
            error,
            relative: true,
        }
    }

    /// Accuracy implied by a value-iteration run that stopped with the
    /// given final sup-norm residual.
    pub fn from_value_iteration(residual: f64, relative: bool) -> Self {
        Accuracy {
            error: residual,
            relative,
        }
    }

    /// The absolute error this bound implies for a concrete value.
    pub fn absolute_error(&self, value: f64) -> f64 {
        if self.relative {
            self.error * value.abs()
        } else {
            self.error
        }
    }

    /// Lower end of the bound around `value`.
    pub fn lower_bound(&self, value: f64) -> f64 {
        value - self.absolute_error(value)
    }

    /// Upper end of the bound around `value`.
    pub fn upper_bound(&self, value: f64) -> f64 {
        value + self.absolute_error(value)
    }

    /// The interval this bound spans around `value`.
    pub fn interval(&self, value: f64) -> Interval {
        Interval {
            lower: self.lower_bound(value),
            upper: self.upper_bound(value),
        }
    }
}

/// A closed interval bracketing a true value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub upper: f64,
}

impl Interval {
    /// Whether the interval contains `value`.
    pub fn contains(&self, value: f64) -> bool {
        self.lower <= value && value <= self.upper
    }

    /// The interval's midpoint.
    pub fn midpoint(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    /// Half the interval's width.
    pub fn half_width(&self) -> f64 {
        (self.upper - self.lower) / 2.0
    }
}

/// Combine a two-sided bound into a reported value plus accuracy.
///
/// Each end is first widened by its own accuracy; the reported value is the
/// midpoint of the widened interval and the accuracy is its absolute
/// half-width.
pub fn value_and_accuracy_from_interval(
    lower: f64,
    lower_accuracy: Accuracy,
    upper: f64,
    upper_accuracy: Accuracy,
) -> (f64, Accuracy, Interval) {
    let interval = Interval {
        lower: lower_accuracy.lower_bound(lower),
        upper: upper_accuracy.upper_bound(upper),
    };
    (
        interval.midpoint(),
        Accuracy::absolute(interval.half_width()),
        interval,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_error_scales_with_magnitude() {
        let accuracy = Accuracy::relative(0.01);
        assert!((accuracy.absolute_error(200.0) - 2.0).abs() < 1e-12);
        assert_eq!(accuracy.absolute_error(0.0), 0.0);
    }

    #[test]
    fn interval_assembly_widens_both_ends() {
        let (value, accuracy, interval) = value_and_accuracy_from_interval(
            0.4,
            Accuracy::absolute(0.1),
            0.6,
            Accuracy::absolute(0.1),
        );
        assert!((interval.lower - 0.3).abs() < 1e-12);
        assert!((interval.upper - 0.7).abs() < 1e-12);
        assert!((value - 0.5).abs() < 1e-12);
        assert!((accuracy.error - 0.2).abs() < 1e-12);
        assert!(interval.contains(value));
    }
}
