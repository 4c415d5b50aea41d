//! No-rings structural filter.
//!
//! From the canonical-point adjacency graph (derived from qualifying Mid
//! sites), detect every chordless cycle of length 4, 5, or 6. For each such
//! cycle, any Mid or Tri site whose attachment set is entirely contained in
//! the cycle's point set would close that ring if selected alongside the
//! other sites spanning it, so the set of such sites becomes one forbidden
//! combination: a solution may select at most all-but-one of them.

use crate::bitlattice::BitLattice;
use fixedbitset::FixedBitSet;
use std::collections::BTreeSet;

/// Build the adjacency graph over canonical lattice points implied by a
/// bit-lattice's Mid sites (the Mid sites are exactly the qualifying
/// neighbor edges).
fn adjacency(lattice: &BitLattice, n_points: usize) -> Vec<BTreeSet<usize>> {
    let mut adjacency = vec![BTreeSet::new(); n_points];
    for site in &lattice.sites[lattice.mids_start..lattice.singles_start] {
        let bits: Vec<usize> = site.attach_mask.ones().collect();
        let (a, b) = (bits[0], bits[1]);
        adjacency[a].insert(b);
        adjacency[b].insert(a);
    }
    adjacency
}

/// Find every chordless (minimal) cycle of length 4, 5, or 6 in the
/// adjacency graph, each reported once as an ascending-from-minimum vertex
/// list.
fn find_minimal_rings(adjacency: &[BTreeSet<usize>]) -> Vec<Vec<usize>> {
    let mut rings = Vec::new();
    for start in 0..adjacency.len() {
        let mut path = vec![start];
        extend_path(adjacency, start, &mut path, &mut rings);
    }
    rings
}

fn extend_path(
    adjacency: &[BTreeSet<usize>],
    start: usize,
    path: &mut Vec<usize>,
    rings: &mut Vec<Vec<usize>>,
) {
    // `path` already includes `start` as its first element, so a closed
    // cycle has exactly `path.len()` vertices.
    if (4..=6).contains(&path.len()) {
        let tail = *path.last().unwrap();
        if adjacency[tail].contains(&start)
            && path[1] < *path.last().unwrap()
            && !has_chord(adjacency, path)
        {
            rings.push(path.clone());
        }
    }
    if path.len() >= 6 {
        return;
    }
    let tail = *path.last().unwrap();
    for &next in &adjacency[tail] {
        // Only extend to vertices greater than `start`: this both dedups the
        // two traversal directions of the same cycle and guarantees `start`
        // is the minimum vertex, so each minimal ring is reported once.
        if next <= start || path.contains(&next) {
            continue;
        }
        path.push(next);
        extend_path(adjacency, start, path, rings);
        path.pop();
    }
}

/// True if `path` (a candidate cycle, first and last vertex implicitly
/// joined) has a chord: an edge between two non-consecutive vertices.
fn has_chord(adjacency: &[BTreeSet<usize>], path: &[usize]) -> bool {
    let n = path.len();
    for i in 0..n {
        for j in (i + 2)..n {
            if i == 0 && j == n - 1 {
                continue; // the closing edge of the cycle itself, not a chord
            }
            if adjacency[path[i]].contains(&path[j]) {
                return true;
            }
        }
    }
    false
}

/// Compute forbidden site-index masks for every minimal 4/5/6-ring: the set
/// of Mid/Tri sites whose attachment set is a subset of the ring's point
/// set. Rings whose forbidden set would have fewer than 2 sites are skipped
/// (a single-site mask would forbid ever selecting that site at all, which
/// is not the intended ring-closure semantics).
pub fn forbidden_masks(lattice: &BitLattice, n_points: usize) -> Vec<FixedBitSet> {
    let adjacency = adjacency(lattice, n_points);
    let rings = find_minimal_rings(&adjacency);

    let mut ring_point_masks = Vec::with_capacity(rings.len());
    for ring in &rings {
        let mut mask = FixedBitSet::with_capacity(n_points);
        for &point in ring {
            mask.insert(point);
        }
        ring_point_masks.push(mask);
    }

    let mut forbidden = Vec::new();
    for ring_mask in &ring_point_masks {
        let mut closing_sites = FixedBitSet::with_capacity(lattice.len());
        for (index, site) in lattice
            .sites
            .iter()
            .enumerate()
            .take(lattice.singles_start)
        {
            if is_subset(&site.attach_mask, ring_mask) {
                closing_sites.insert(index);
            }
        }
        if closing_sites.count_ones(..) >= 2 {
            forbidden.push(closing_sites);
        }
    }
    forbidden
}

fn is_subset(attach_mask: &FixedBitSet, ring_mask: &FixedBitSet) -> bool {
    attach_mask.ones().all(|bit| ring_mask.contains(bit))
}
