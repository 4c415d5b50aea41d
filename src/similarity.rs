//! Similarity/symmetry filter: groups sites that are geometrically
//! interchangeable (same pairwise distance multiset to every other site,
//! within tolerance) and keeps only one representative of each equivalence
//! class admissible to the solver. Disabled by default; the no-rings filter
//! is the structural workhorse and this is an optional extra reduction.

use crate::bitlattice::BitLattice;
use fixedbitset::FixedBitSet;

/// Compute an admissible mask keeping exactly one representative per
/// similarity class of site, using `(x, y)` locations already present on
/// each compiled site and `tolerance` (typically `difference_distance`,
/// default 0.05 Å) as the equivalence threshold.
///
/// Two sites are judged equivalent when the sorted multiset of their
/// distances to every other site matches within `tolerance`, elementwise.
/// This is an O(n^2 log n) comparison; fine for the site counts this solver
/// is meant to operate on (tens to low hundreds).
pub fn similarity_admissible_mask(lattice: &BitLattice, tolerance: f64) -> FixedBitSet {
    let locations: Vec<(f64, f64)> = lattice.sites.iter().map(|c| c.site.location()).collect();
    let n = locations.len();

    let profiles: Vec<Vec<f64>> = (0..n)
        .map(|i| {
            let mut distances: Vec<f64> = (0..n)
                .filter(|&j| j != i)
                .map(|j| distance(locations[i], locations[j]))
                .collect();
            distances.sort_by(|a, b| a.partial_cmp(b).expect("distances are always finite"));
            distances
        })
        .collect();

    let mut admissible = FixedBitSet::with_capacity(n);
    let mut assigned = vec![false; n];
    for i in 0..n {
        if assigned[i] {
            continue;
        }
        admissible.insert(i);
        assigned[i] = true;
        for j in (i + 1)..n {
            if !assigned[j] && profiles_match(&profiles[i], &profiles[j], tolerance) {
                assigned[j] = true; // equivalent to i; i remains the sole representative
            }
        }
    }
    admissible
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (a.0 - b.0, a.1 - b.1);
    (dx * dx + dy * dy).sqrt()
}

fn profiles_match(a: &[f64], b: &[f64], tolerance: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() <= tolerance)
}
