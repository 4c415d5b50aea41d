//! Lattice point model: canonical points and their periodic (ghost) images.
//!
//! A ghost point carries only the index of its canonical link; it has no
//! independent binding state. This follows an arena-of-records design: no
//! back-pointers, no cyclic ownership, just a flat `Vec<LatticePoint>` plus
//! an integer link for ghosts.

use crate::error::{OxLatticeError, Result};
use serde::{Deserialize, Serialize};

/// A single previous-layer attachment point in 2D, or its periodic image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatticePoint {
    /// X coordinate in Ångströms.
    pub x: f64,
    /// Y coordinate in Ångströms.
    pub y: f64,
    /// Whether this point is a periodic image of another point.
    pub ghost: bool,
    /// Index into the same point list of the canonical point this ghost
    /// images. Required when `ghost` is `true`; ignored otherwise.
    pub link: Option<usize>,
}

impl LatticePoint {
    /// Construct a canonical (non-ghost) point.
    pub fn canonical(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ghost: false,
            link: None,
        }
    }

    /// Construct a ghost point linked to the canonical point at `link`.
    pub fn ghost(x: f64, y: f64, link: usize) -> Self {
        Self {
            x,
            y,
            ghost: true,
            link: Some(link),
        }
    }

    /// (x, y) as a 2-tuple, for plotting/export convenience.
    pub fn location(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

/// An ordered set of lattice points, validated and ready for site generation.
///
/// Canonical indices into this set are what every `Site::attach` bitmask
/// refers to; ghost points exist only to make edges across the periodic
/// boundary explicit and never carry independent binding state.
#[derive(Debug, Clone)]
pub struct PointSet {
    points: Vec<LatticePoint>,
    /// For each point index, the canonical index it resolves to (itself,
    /// for canonical points).
    canonical_of: Vec<usize>,
}

impl PointSet {
    /// Build and validate a point set.
    ///
    /// Points are sorted by `100*x + y` to give a deterministic total order;
    /// this order defines canonical indices. A ghost's `link` is
    /// interpreted as an index into `points` as *given* (before sorting),
    /// since callers name the canonical point by its position in the
    /// sequence they're handing over, not by a final order they have no way
    /// to predict.
    ///
    /// # Errors
    ///
    /// Returns [`OxLatticeError::NonFiniteCoordinate`] if any coordinate is
    /// NaN or infinite, or [`OxLatticeError::InvalidGhostLink`] if a ghost's
    /// `link` is missing, out of bounds, or itself points at a ghost.
    pub fn build(points: Vec<LatticePoint>) -> Result<Self> {
        for (index, point) in points.iter().enumerate() {
            if !point.x.is_finite() || !point.y.is_finite() {
                return Err(OxLatticeError::NonFiniteCoordinate { index });
            }
        }

        let mut indexed: Vec<(usize, LatticePoint)> = points.into_iter().enumerate().collect();
        indexed.sort_by(|a, b| {
            sort_key(&a.1)
                .partial_cmp(&sort_key(&b.1))
                .expect("non-finite coordinates already rejected above")
        });

        let mut old_to_new = vec![0usize; indexed.len()];
        for (new_index, (old_index, _)) in indexed.iter().enumerate() {
            old_to_new[*old_index] = new_index;
        }
        let points: Vec<LatticePoint> = indexed.into_iter().map(|(_, point)| point).collect();

        let mut canonical_of = vec![0usize; points.len()];
        for (new_index, point) in points.iter().enumerate() {
            if point.ghost {
                let old_link = point
                    .link
                    .ok_or(OxLatticeError::InvalidGhostLink { index: new_index, link: new_index })?;
                if old_link >= old_to_new.len() {
                    return Err(OxLatticeError::InvalidGhostLink { index: new_index, link: old_link });
                }
                let new_link = old_to_new[old_link];
                if points[new_link].ghost {
                    return Err(OxLatticeError::InvalidGhostLink { index: new_index, link: new_link });
                }
                canonical_of[new_index] = new_link;
            } else {
                canonical_of[new_index] = new_index;
            }
        }

        Ok(Self {
            points,
            canonical_of,
        })
    }

    /// All points (canonical and ghost), in canonical-index order.
    pub fn points(&self) -> &[LatticePoint] {
        &self.points
    }

    /// Number of points total (canonical + ghost).
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if there are no points at all.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of canonical (non-ghost) points, i.e. the `N` a `BitLattice`
    /// is compiled over.
    pub fn canonical_len(&self) -> usize {
        self.points.iter().filter(|point| !point.ghost).count()
    }

    /// Resolve a point index (canonical or ghost) to its canonical index.
    pub fn canonical(&self, index: usize) -> usize {
        self.canonical_of[index]
    }

    /// Iterate over the canonical indices, in order, each exactly once.
    pub fn canonical_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, point)| !point.ghost)
            .map(|(index, _)| index)
    }
}

fn sort_key(point: &LatticePoint) -> f64 {
    100.0 * point.x + point.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_non_finite_coordinates() {
        let points = vec![LatticePoint::canonical(f64::NAN, 0.0)];
        assert!(matches!(
            PointSet::build(points),
            Err(OxLatticeError::NonFiniteCoordinate { index: 0 })
        ));
    }

    #[test]
    fn rejects_ghost_without_link() {
        let mut ghost = LatticePoint::canonical(1.0, 1.0);
        ghost.ghost = true;
        ghost.link = None;
        let points = vec![LatticePoint::canonical(0.0, 0.0), ghost];
        assert!(matches!(
            PointSet::build(points),
            Err(OxLatticeError::InvalidGhostLink { .. })
        ));
    }

    #[test]
    fn rejects_ghost_linking_to_ghost() {
        let canonical = LatticePoint::canonical(0.0, 0.0);
        let ghost_a = LatticePoint::ghost(1.0, 0.0, 1); // will point at ghost_b below
        let ghost_b = LatticePoint::ghost(2.0, 0.0, 1);
        let points = vec![canonical, ghost_a, ghost_b];
        assert!(matches!(
            PointSet::build(points),
            Err(OxLatticeError::InvalidGhostLink { .. })
        ));
    }

    #[test]
    fn canonical_resolves_to_self_for_canonical_points() {
        let points = vec![
            LatticePoint::canonical(0.0, 0.0),
            LatticePoint::canonical(1.0, 0.0),
        ];
        let set = PointSet::build(points).unwrap();
        assert_eq!(set.canonical(0), 0);
        assert_eq!(set.canonical(1), 1);
        assert_eq!(set.canonical_len(), 2);
    }

    #[test]
    fn sort_order_is_deterministic_under_input_permutation() {
        let a = vec![
            LatticePoint::canonical(1.0, 0.0),
            LatticePoint::canonical(0.0, 0.0),
        ];
        let b = vec![
            LatticePoint::canonical(0.0, 0.0),
            LatticePoint::canonical(1.0, 0.0),
        ];
        let set_a = PointSet::build(a).unwrap();
        let set_b = PointSet::build(b).unwrap();
        let locs_a: Vec<_> = set_a.points().iter().map(|p| p.location()).collect();
        let locs_b: Vec<_> = set_b.points().iter().map(|p| p.location()).collect();
        assert_eq!(locs_a, locs_b);
    }

    proptest! {
        #[test]
        fn canonical_len_always_counts_non_ghost_points(
            xs in proptest::collection::vec(-100.0f64..100.0, 1..20),
        ) {
            let points: Vec<LatticePoint> = xs
                .iter()
                .map(|&x| LatticePoint::canonical(x, 0.0))
                .collect();
            let expected = points.len();
            let set = PointSet::build(points).unwrap();
            prop_assert_eq!(set.canonical_len(), expected);
            prop_assert_eq!(set.len(), expected);
        }
    }
}
