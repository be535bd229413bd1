//! Numeric helpers shared by the grid engine and the chain solver.

use std::collections::HashMap;
use std::hash::Hash;

/// Check whether two values agree up to `epsilon`, absolutely or relatively.
///
/// The relative test normalizes by the magnitude of `reference`; when the
/// reference is zero it falls back to the absolute test.
///
/// # Examples
///
/// ```
/// use lovejoy::utils::values_are_close;
///
/// assert!(values_are_close(1.0000001, 1.0, 1e-6, true));
/// assert!(!values_are_close(1.1, 1.0, 1e-6, false));
/// ```
pub fn values_are_close(value: f64, reference: f64, epsilon: f64, relative: bool) -> bool {
    let diff = (value - reference).abs();
    if relative && reference != 0.0 {
        diff / reference.abs() <= epsilon
    } else {
        diff <= epsilon
    }
}

/// Sup-norm difference between two equally-keyed value maps.
///
/// Entries are compared pairwise; with `relative` set, each difference is
/// normalized by the magnitude of the entry in `reference`. Keys missing
/// from `reference` contribute their absolute value in `values`.
pub fn sup_norm_diff<K>(values: &HashMap<K, f64>, reference: &HashMap<K, f64>, relative: bool) -> f64
where
    K: Eq + Hash,
{
    let mut max_diff = 0.0f64;
    for (key, &value) in values {
        let prev = reference.get(key).copied().unwrap_or(0.0);
        let mut diff = (value - prev).abs();
        if relative && prev != 0.0 {
            diff /= prev.abs();
        }
        max_diff = max_diff.max(diff);
    }
    max_diff
}

/// Whether every entry of `values` is close to its counterpart in `reference`.
pub fn maps_are_close<K>(
    values: &HashMap<K, f64>,
    reference: &HashMap<K, f64>,
    epsilon: f64,
    relative: bool,
) -> bool
where
    K: Eq + Hash,
{
    values.iter().all(|(key, &value)| {
        let prev = reference.get(key).copied().unwrap_or(0.0);
        values_are_close(value, prev, epsilon, relative)
    })
}

/// Sup-norm difference between two equal-length slices.
pub fn slice_sup_norm_diff(values: &[f64], reference: &[f64], relative: bool) -> f64 {
    debug_assert_eq!(values.len(), reference.len());
    let mut max_diff = 0.0f64;
    for (&value, &prev) in values.iter().zip(reference) {
        let mut diff = (value - prev).abs();
        if relative && prev != 0.0 {
            diff /= prev.abs();
        }
        max_diff = max_diff.max(diff);
    }
    max_diff
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_closeness() {
        assert!(values_are_close(0.5, 0.5 + 1e-9, 1e-6, false));
        assert!(!values_are_close(0.5, 0.5 + 1e-3, 1e-6, false));
    }

    #[test]
    fn relative_closeness_falls_back_on_zero_reference() {
        assert!(values_are_close(1e-9, 0.0, 1e-6, true));
        assert!(!values_are_close(1e-3, 0.0, 1e-6, true));
    }

    #[test]
    fn map_residual_tracks_largest_entry() {
        let mut values = HashMap::new();
        let mut reference = HashMap::new();
        values.insert("a", 1.0);
        values.insert("b", 2.5);
        reference.insert("a", 1.0);
        reference.insert("b", 2.0);
        assert_eq!(sup_norm_diff(&values, &reference, false), 0.5);
        assert_eq!(sup_norm_diff(&values, &reference, true), 0.25);
        assert!(maps_are_close(&values, &reference, 0.6, false));
        assert!(!maps_are_close(&values, &reference, 0.1, false));
    }
}
