//! Belief states over partially observable models.
//!
//! A [`Belief`] pairs the current observation class with a distribution over
//! the hidden refinements consistent with it. Beliefs key the hash maps that
//! store grid values, so equality and hashing are bit-exact on the float
//! payload: grid vertices are always produced by the same integer-then-divide
//! arithmetic and therefore compare equal across construction sites.

use std::fmt::Write as _;

use crate::ports::Pomdp;

/// A belief state: an observation class plus a distribution over the hidden
/// refinements of that class.
///
/// `bu` is indexed by the global unobservation index; entries for
/// refinements outside the observation class are zero. Invariants: all
/// entries are non-negative and sum to 1. Beliefs are immutable once built.
#[derive(Debug, Clone)]
pub struct Belief {
    so: usize,
    bu: Vec<f64>,
}

impl Belief {
    /// Create a belief from an observation class and a refinement
    /// distribution over the global unobservation index space.
    pub fn new(so: usize, bu: Vec<f64>) -> Self {
        debug_assert!(bu.iter().all(|&p| p >= 0.0));
        debug_assert!((bu.iter().sum::<f64>() - 1.0).abs() < 1e-9);
        Belief { so, bu }
    }

    /// Point-mass belief on a single state of the given model.
    pub fn point<P: Pomdp + ?Sized>(pomdp: &P, state: usize) -> Self {
        let mut bu = vec![0.0; pomdp.num_unobservations()];
        bu[pomdp.unobservation(state)] = 1.0;
        Belief {
            so: pomdp.observation(state),
            bu,
        }
    }

    /// The observation class this belief is conditioned on.
    pub fn observation(&self) -> usize {
        self.so
    }

    /// The refinement distribution, indexed by global unobservation index.
    pub fn refinements(&self) -> &[f64] {
        &self.bu
    }

    /// Expand into a distribution over the model's full state space.
    pub fn to_distribution<P: Pomdp + ?Sized>(&self, pomdp: &P) -> Vec<f64> {
        let mut dist = vec![0.0; pomdp.num_states()];
        for (state, slot) in dist.iter_mut().enumerate() {
            if pomdp.observation(state) == self.so {
                *slot = self.bu[pomdp.unobservation(state)];
            }
        }
        dist
    }

    /// Human-readable rendering listing the states carrying mass.
    pub fn describe<P: Pomdp + ?Sized>(&self, pomdp: &P) -> String {
        let mut out = format!("o={} {{", self.so);
        let mut first = true;
        for state in 0..pomdp.num_states() {
            if pomdp.observation(state) != self.so {
                continue;
            }
            let mass = self.bu[pomdp.unobservation(state)];
            if mass <= 0.0 {
                continue;
            }
            if !first {
                out.push_str(", ");
            }
            let _ = write!(out, "s{state}={mass:.6}");
            first = false;
        }
        out.push('}');
        out
    }
}

// Bit-exact equality so beliefs can key the grid value maps. NaN never
// appears in a belief, so reflexivity holds.
impl PartialEq for Belief {
    fn eq(&self, other: &Self) -> bool {
        self.so == other.so
            && self.bu.len() == other.bu.len()
            && self
                .bu
                .iter()
                .zip(&other.bu)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for Belief {}

impl std::hash::Hash for Belief {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.so.hash(state);
        for value in &self.bu {
            value.to_bits().hash(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::Belief;

    #[test]
    fn bit_identical_beliefs_share_a_map_slot() {
        let a = Belief::new(1, vec![0.0, 1.0 / 3.0, 2.0 / 3.0]);
        let b = Belief::new(1, vec![0.0, 1.0 / 3.0, 2.0 / 3.0]);
        assert_eq!(a, b);

        let mut values = HashMap::new();
        values.insert(a, 0.25);
        assert_eq!(values.get(&b), Some(&0.25));
    }

    #[test]
    fn observation_class_distinguishes_beliefs() {
        let a = Belief::new(0, vec![1.0, 0.0]);
        let b = Belief::new(1, vec![1.0, 0.0]);
        assert_ne!(a, b);
    }

    #[test]
    fn arithmetic_on_entries_breaks_equality() {
        // 0.1 + 0.2 is not the literal 0.3, which is exactly why grid
        // vertices must be built by integer arithmetic then division.
        let a = Belief::new(0, vec![0.1 + 0.2, 0.7]);
        let b = Belief::new(0, vec![0.3, 0.7]);
        assert_ne!(a, b);
    }
}
