//! Neighbor relation derivation.
//!
//! Producing the neighbor list via a spatial index (a k-d tree radius
//! query) is explicitly out of scope for this crate; that is the job of an
//! external collaborator. What lives here is a small convenience path:
//! accept either an explicit set of pairs, or derive one on demand from raw
//! points and a cutoff radius via brute force. Brute force is O(n^2) and is
//! a correctness convenience, not a performance claim; real spatial
//! indexing stays external.

use itertools::Itertools;
use std::collections::BTreeSet;

/// An undirected neighbor relation: pairs of point indices `(i, j)` with
/// `i < j` that are adjacent within a cutoff radius.
#[derive(Debug, Clone, Default)]
pub struct NeighborRelation {
    pairs: BTreeSet<(usize, usize)>,
}

impl NeighborRelation {
    /// Build a neighbor relation from an explicit set of index pairs.
    /// Pairs are normalized so the smaller index comes first; self-pairs
    /// are dropped.
    pub fn from_pairs<I: IntoIterator<Item = (usize, usize)>>(pairs: I) -> Self {
        let pairs = pairs
            .into_iter()
            .filter(|&(i, j)| i != j)
            .map(|(i, j)| if i < j { (i, j) } else { (j, i) })
            .collect();
        Self { pairs }
    }

    /// Derive a neighbor relation from raw 2D points and a cutoff radius,
    /// by brute-force pairwise distance check.
    ///
    /// `cutoff` is typically `nearest_neighbor_distance * 1.1` for the
    /// site-generator fan-out step, or the `creation_distance_margin`
    /// (default 3.5 Å) for the overall neighbor cutoff.
    pub fn from_radius(points: &[(f64, f64)], cutoff: f64) -> Self {
        let cutoff_sq = cutoff * cutoff;
        let pairs = (0..points.len())
            .tuple_combinations()
            .filter(|&(i, j)| {
                let (xi, yi) = points[i];
                let (xj, yj) = points[j];
                let dx = xi - xj;
                let dy = yi - yj;
                dx * dx + dy * dy <= cutoff_sq
            })
            .collect();
        Self { pairs }
    }

    /// All pairs, each with the smaller index first, in ascending order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs.iter().copied()
    }

    /// True if `(i, j)` (in either order) is a neighbor pair.
    pub fn contains(&self, i: usize, j: usize) -> bool {
        let key = if i < j { (i, j) } else { (j, i) };
        self.pairs.contains(&key)
    }

    /// Number of neighbor pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// True if there are no neighbor pairs.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
