//! Freudenthal discretization of the belief simplex.
//!
//! The belief space of each observation class is a standard simplex over the
//! class's hidden refinements. At resolution M the Freudenthal triangulation
//! places vertices at all points whose coordinates are multiples of 1/M, and
//! any interior belief decomposes into a convex combination of at most n
//! vertices of one subsimplex. Vertices are produced by integer arithmetic
//! followed by a single division by M, so the same vertex is bit-identical
//! no matter which code path built it; this is what lets vertices key the
//! value maps.

use crate::{
    belief::Belief,
    error::{Error, Result},
    ports::Pomdp,
};

/// Barycentric weights below this threshold are treated as zero when
/// interpolating, so their (possibly off-grid) vertices are never looked up.
pub(crate) const WEIGHT_CUTOFF: f64 = 1e-6;

/// Maximum per-coordinate reconstruction error tolerated by the
/// decomposition self-check.
const RECONSTRUCTION_TOLERANCE: f64 = 1e-4;

/// A subsimplex decomposition of a belief: at most n grid vertices and the
/// barycentric weights combining them back into the original belief.
///
/// Vertices carrying a weight below [`WEIGHT_CUTOFF`] may lie outside the
/// simplex; they are artifacts of the corner walk and contribute nothing.
#[derive(Debug, Clone)]
pub struct Decomposition {
    so: usize,
    vertices: Vec<Vec<f64>>,
    weights: Vec<f64>,
}

impl Decomposition {
    /// The barycentric weights, summing to 1.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Raw simplex coordinates of vertex `j`.
    pub fn vertex_coords(&self, j: usize) -> &[f64] {
        &self.vertices[j]
    }

    /// Vertex `j` as a belief in the decomposed observation class.
    ///
    /// Only meaningful for vertices whose weight is at least
    /// [`WEIGHT_CUTOFF`]; zero-weight artifacts need not be valid beliefs.
    pub fn vertex_belief(&self, j: usize) -> Belief {
        Belief::new(self.so, self.vertices[j].clone())
    }
}

/// Enumerate the grid vertices of every observation class marked in
/// `unknown_obs`, at the given resolution.
///
/// For a class with n refinements this produces one vertex per monotone
/// integer assignment M = g₁ ≥ g₂ ≥ … ≥ gₙ ≥ 0, with simplex coordinates
/// (gᵢ − gᵢ₊₁)/M and gₙ/M.
pub fn enumerate_grid_points<P: Pomdp + ?Sized>(
    pomdp: &P,
    unknown_obs: &[bool],
    resolution: u32,
) -> Vec<Belief> {
    let num_unobservations = pomdp.num_unobservations();
    let mut grid_points = Vec::new();
    for (so, _) in unknown_obs.iter().enumerate().filter(|&(_, &unknown)| unknown) {
        let refinements: Vec<usize> = (0..pomdp.num_states())
            .filter(|&state| pomdp.observation(state) == so)
            .map(|state| pomdp.unobservation(state))
            .collect();
        if refinements.is_empty() {
            continue;
        }
        for assignment in monotone_assignments(resolution, refinements.len()) {
            let coords = simplex_coords(&assignment, resolution);
            let mut bu = vec![0.0; num_unobservations];
            for (&refinement, coord) in refinements.iter().zip(coords) {
                bu[refinement] = coord;
            }
            grid_points.push(Belief::new(so, bu));
        }
    }
    grid_points
}

/// Decompose a belief into grid vertices of its observation class plus
/// barycentric weights (Freudenthal corner walk).
///
/// # Errors
///
/// Fails with [`Error::Internal`] when the reconstructed point drifts more
/// than 10⁻⁴ from the input in any coordinate; that indicates a bug, not a
/// property of the input.
pub fn decompose(belief: &Belief, resolution: u32) -> Result<Decomposition> {
    let b = belief.refinements();
    let n = b.len();
    let m = f64::from(resolution);

    // Suffix sums scaled by M, rounded to 6 decimals to absorb float error
    // accumulated by the belief updates that produced b.
    let mut x = vec![0.0; n];
    let mut v = vec![0i64; n];
    let mut d = vec![0.0; n];
    for i in 0..n {
        let suffix: f64 = b[i..].iter().map(|&p| m * p).sum();
        x[i] = (suffix * 1e6).round() / 1e6;
        v[i] = x[i].floor() as i64;
        d[i] = x[i] - x[i].floor();
    }

    let permutation = sorted_permutation(&d);

    // Walk the subsimplex corners: start at the floored point and bump one
    // coordinate per step, in decreasing order of fractional part.
    let mut vertices = Vec::with_capacity(n);
    let mut q = v;
    vertices.push(simplex_coords_signed(&q, resolution));
    for &index in &permutation[..n.saturating_sub(1)] {
        q[index] += 1;
        vertices.push(simplex_coords_signed(&q, resolution));
    }

    // Telescoping weights from the fractional parts.
    let mut weights = vec![0.0; n];
    let mut tail = 0.0;
    for i in 1..n {
        let lambda = d[permutation[i - 1]] - d[permutation[i]];
        weights[i] = lambda;
        tail += lambda;
    }
    weights[0] = 1.0 - tail;

    for (i, &coord) in b.iter().enumerate() {
        let reconstructed: f64 = weights
            .iter()
            .zip(&vertices)
            .map(|(&lambda, vertex)| lambda * vertex[i])
            .sum();
        if (coord - reconstructed).abs() > RECONSTRUCTION_TOLERANCE {
            return Err(Error::internal(format!(
                "subsimplex decomposition drifted at coordinate {i}: {coord} vs {reconstructed}"
            )));
        }
    }

    Ok(Decomposition {
        so: belief.observation(),
        vertices,
        weights,
    })
}

/// All integer vectors of the given length with resolution = g₁ ≥ g₂ ≥ … ≥ 0.
fn monotone_assignments(resolution: u32, length: usize) -> Vec<Vec<u32>> {
    let mut out = Vec::new();
    let mut prefix = Vec::with_capacity(length);
    prefix.push(resolution);
    fill_assignments(&mut prefix, length, &mut out);
    out
}

fn fill_assignments(prefix: &mut Vec<u32>, length: usize, out: &mut Vec<Vec<u32>>) {
    if prefix.len() == length {
        out.push(prefix.clone());
        return;
    }
    let bound = *prefix.last().expect("prefix starts non-empty");
    for value in 0..=bound {
        prefix.push(value);
        fill_assignments(prefix, length, out);
        prefix.pop();
    }
}

/// Convert a monotone integer vector to simplex coordinates.
fn simplex_coords(assignment: &[u32], resolution: u32) -> Vec<f64> {
    let m = f64::from(resolution);
    let n = assignment.len();
    let mut coords = Vec::with_capacity(n);
    for i in 0..n - 1 {
        coords.push(f64::from(assignment[i] - assignment[i + 1]) / m);
    }
    coords.push(f64::from(assignment[n - 1]) / m);
    coords
}

/// Signed variant used by the corner walk, where zero-weight artifacts can
/// momentarily leave the simplex.
fn simplex_coords_signed(assignment: &[i64], resolution: u32) -> Vec<f64> {
    let m = f64::from(resolution);
    let n = assignment.len();
    let mut coords = Vec::with_capacity(n);
    for i in 0..n - 1 {
        coords.push((assignment[i] - assignment[i + 1]) as f64 / m);
    }
    coords.push(assignment[n - 1] as f64 / m);
    coords
}

/// Permutation sorting indices by fractional part, descending; indices with
/// a zero fractional part trail in ascending order.
fn sorted_permutation(fractions: &[f64]) -> Vec<usize> {
    let mut nonzero: Vec<usize> = (0..fractions.len())
        .filter(|&i| fractions[i] != 0.0)
        .collect();
    nonzero.sort_by(|&a, &b| {
        fractions[b]
            .partial_cmp(&fractions[a])
            .expect("fractional parts are finite")
    });
    let zero = (0..fractions.len()).filter(|&i| fractions[i] == 0.0);
    nonzero.extend(zero);
    nonzero
}
