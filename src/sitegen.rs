//! Site generator: derives candidate `Single`, `Mid`, and `Tri` oxygen
//! sites from a point set and its neighbor relation.

use crate::neighbors::NeighborRelation;
use crate::point::PointSet;
use crate::site::{Site, SiteKind};
use itertools::Itertools;
use std::collections::BTreeMap;

/// The three generated site lists, in generation order (not yet compiled
/// into a [`crate::bitlattice::BitLattice`]).
#[derive(Debug, Clone, Default)]
pub struct SiteLists {
    /// One per canonical lattice point.
    pub singles: Vec<Site>,
    /// One per qualifying neighbor edge.
    pub mids: Vec<Site>,
    /// One per qualifying neighbor triangle.
    pub tris: Vec<Site>,
}

/// Generate all candidate sites for a point set given its neighbor relation.
///
/// - Singles: one per canonical point, attaching to `{self}`.
/// - Mids: one per neighbor pair `(i, j)`, `i < j`, unless both endpoints
///   are ghosts or they deghost to the same canonical point.
/// - Tris: one per triangle `(a, b, c)` of mutually-neighboring points with
///   `a < b < c`, unless all three endpoints are ghosts or any two deghost
///   to the same canonical point.
pub fn generate_sites(points: &PointSet, neighbors: &NeighborRelation) -> SiteLists {
    let raw = points.points();
    let loc = |index: usize| raw[index].location();

    let singles = points
        .canonical_indices()
        .map(|index| Site::new(SiteKind::Single, &[loc(index)], vec![index]))
        .collect();

    // Adjacency restricted to j > i: each key's neighbor list is already in
    // ascending order because `neighbors.pairs()` iterates a sorted set.
    let mut adjacency: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, j) in neighbors.pairs() {
        adjacency.entry(i).or_default().push(j);
    }

    let mut mids = Vec::new();
    for (i, j) in neighbors.pairs() {
        if raw[i].ghost && raw[j].ghost {
            continue;
        }
        let (ci, cj) = (points.canonical(i), points.canonical(j));
        if ci == cj {
            continue; // a point and its own periodic image
        }
        mids.push(Site::new(SiteKind::Mid, &[loc(i), loc(j)], vec![ci, cj]));
    }

    let mut tris = Vec::new();
    for (&a, a_neighbors) in &adjacency {
        for (&b, &c) in a_neighbors.iter().tuple_combinations() {
            if !neighbors.contains(b, c) {
                continue;
            }
            if raw[a].ghost && raw[b].ghost && raw[c].ghost {
                continue;
            }
            let (ca, cb, cc) = (
                points.canonical(a),
                points.canonical(b),
                points.canonical(c),
            );
            if ca == cb || cb == cc || ca == cc {
                continue;
            }
            tris.push(Site::new(
                SiteKind::Tri,
                &[loc(a), loc(b), loc(c)],
                vec![ca, cb, cc],
            ));
        }
    }

    SiteLists {
        singles,
        mids,
        tris,
    }
}
