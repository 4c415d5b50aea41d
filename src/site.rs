//! Candidate oxygen sites: `Single`, `Mid`, and `Tri`, as a tagged variant
//! rather than an inheritance hierarchy. Arity is implicit in `SiteKind`.

use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};

/// The three kinds of candidate oxygen site, distinguished by arity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SiteKind {
    /// Bound to exactly one lattice point.
    Single,
    /// At the midpoint of two neighboring lattice points.
    Mid,
    /// At the centroid of three mutually-neighboring lattice points.
    Tri,
}

impl SiteKind {
    /// Arity (number of lattice points a site of this kind binds).
    pub fn arity(self) -> usize {
        match self {
            SiteKind::Single => 1,
            SiteKind::Mid => 2,
            SiteKind::Tri => 3,
        }
    }

    /// Energy weight used only to rank discrete configurations; not a
    /// physical energy.
    pub fn energy(self) -> f64 {
        match self {
            SiteKind::Single => 1.4,
            SiteKind::Mid => 0.7,
            SiteKind::Tri => 0.4,
        }
    }
}

/// A candidate oxygen site before bitset compilation: kind, coordinates,
/// and the canonical lattice-point indices it would bind.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    /// Single, Mid, or Tri.
    pub kind: SiteKind,
    /// X coordinate (site location) in Ångströms.
    pub x: f64,
    /// Y coordinate (site location) in Ångströms.
    pub y: f64,
    /// Canonical lattice-point indices this site would bind if selected.
    /// Length always equals `kind.arity()`.
    pub attach: Vec<usize>,
}

impl Site {
    /// Build a new site, computing its location as the centroid of the
    /// given canonical points' coordinates.
    pub fn new(kind: SiteKind, points: &[(f64, f64)], attach: Vec<usize>) -> Self {
        debug_assert_eq!(points.len(), attach.len());
        debug_assert_eq!(points.len(), kind.arity());
        let n = points.len() as f64;
        let x = points.iter().map(|p| p.0).sum::<f64>() / n;
        let y = points.iter().map(|p| p.1).sum::<f64>() / n;
        Self {
            kind,
            x,
            y,
            attach,
        }
    }

    /// (x, y) as a 2-tuple, for plotting/export convenience.
    pub fn location(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Build this site's attachment bitmask over `n_canonical` canonical
    /// lattice-point indices.
    pub fn attach_mask(&self, n_canonical: usize) -> FixedBitSet {
        let mut mask = FixedBitSet::with_capacity(n_canonical);
        for &index in &self.attach {
            mask.insert(index);
        }
        mask
    }
}
