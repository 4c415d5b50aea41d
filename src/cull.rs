//! Post-hoc culling: groups solutions by their site-kind counts, then
//! within each group drops solutions whose oxygen layout is a
//! near-duplicate (under periodic wrap) of one already kept.
//!
//! Grounded on the margin-based `nearly_in` dedup from the original
//! culling pass: two solutions are duplicates if the sorted multiset of
//! their pairwise oxygen-oxygen distances agrees elementwise within
//! `margin`.

use crate::bitlattice::BitLattice;
use crate::decode::{decode, DecodedSolution};
use crate::solver::Solution;
use std::collections::BTreeMap;

/// Size of the periodic cell in each direction, used to take the minimum
/// image when comparing two oxygen positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    /// Period along x, Å.
    pub x: f64,
    /// Period along y, Å.
    pub y: f64,
}

/// Minimum-image displacement between two points under periodic wrap.
fn periodic_delta(a: (f64, f64), b: (f64, f64), cell: CellSize) -> (f64, f64) {
    let mut dx = a.0 - b.0;
    let mut dy = a.1 - b.1;
    if dx.abs() > cell.x / 2.0 {
        dx -= cell.x * dx.signum();
    }
    if dy.abs() > cell.y / 2.0 {
        dy -= cell.y * dy.signum();
    }
    (dx, dy)
}

fn all_oxygen_locations(decoded: &DecodedSolution) -> Vec<(f64, f64)> {
    decoded
        .tris
        .iter()
        .chain(&decoded.mids)
        .chain(&decoded.singles)
        .copied()
        .collect()
}

/// Sorted multiset of pairwise oxygen-oxygen distances (periodic minimum
/// image), used as a geometry fingerprint for deduplication.
fn distance_fingerprint(decoded: &DecodedSolution, cell: CellSize) -> Vec<f64> {
    let locations = all_oxygen_locations(decoded);
    let mut distances = Vec::with_capacity(locations.len() * locations.len().saturating_sub(1) / 2);
    for i in 0..locations.len() {
        for j in (i + 1)..locations.len() {
            let (dx, dy) = periodic_delta(locations[i], locations[j], cell);
            distances.push((dx * dx + dy * dy).sqrt());
        }
    }
    distances.sort_by(|a, b| a.partial_cmp(b).expect("distances are always finite"));
    distances
}

fn fingerprints_match(a: &[f64], b: &[f64], margin: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= margin)
}

/// Key used to bucket solutions before the expensive pairwise comparison:
/// solutions with different site-kind counts can never be geometric
/// duplicates of one another.
fn counts_key(lattice: &BitLattice, solution: &Solution) -> (usize, usize, usize) {
    let decoded = decode(lattice, solution).expect("solution indexes the same lattice");
    (decoded.tris.len(), decoded.mids.len(), decoded.singles.len())
}

/// Cull near-duplicate solutions.
///
/// Solutions are first grouped by `(tri_count, mid_count, single_count)`;
/// within each group, a solution is kept only if its distance fingerprint
/// doesn't match (within `margin`) one already kept in that group. Input
/// order is preserved among survivors.
pub fn cull(lattice: &BitLattice, solutions: &[Solution], cell: CellSize, margin: f64) -> Vec<Solution> {
    let mut groups: BTreeMap<(usize, usize, usize), Vec<usize>> = BTreeMap::new();
    for (index, solution) in solutions.iter().enumerate() {
        groups.entry(counts_key(lattice, solution)).or_default().push(index);
    }

    let mut kept_indices = Vec::new();
    for indices in groups.into_values() {
        let mut kept_fingerprints: Vec<Vec<f64>> = Vec::new();
        for index in indices {
            let decoded = decode(lattice, &solutions[index]).expect("solution indexes the same lattice");
            let fingerprint = distance_fingerprint(&decoded, cell);
            let is_duplicate = kept_fingerprints
                .iter()
                .any(|kept| fingerprints_match(kept, &fingerprint, margin));
            if !is_duplicate {
                kept_fingerprints.push(fingerprint);
                kept_indices.push(index);
            }
        }
    }

    kept_indices.sort_unstable();
    kept_indices.into_iter().map(|i| solutions[i].clone()).collect()
}
