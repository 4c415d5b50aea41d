//! Bit-lattice builder: compiles generated sites into the fixed-layout
//! bitset model the backtracking solver runs against.

use crate::error::{OxLatticeError, Result};
use crate::site::{Site, SiteKind};
use crate::sitegen::SiteLists;
use fixedbitset::FixedBitSet;

/// A single compiled site entry in a [`BitLattice`].
#[derive(Debug, Clone)]
pub struct CompiledSite {
    /// Original site data (kind, coordinates, canonical attachment list).
    pub site: Site,
    /// Bitset over canonical lattice-point indices this site would bind.
    pub attach_mask: FixedBitSet,
    /// Bitset of later-indexed site indices (`j > i`) whose `attach_mask`
    /// shares at least one bit with this site's `attach_mask`. Cached here
    /// to accelerate the solver's inner conflict-scan loop.
    pub excludes: FixedBitSet,
}

impl CompiledSite {
    /// This site's arity-derived kind.
    pub fn kind(&self) -> SiteKind {
        self.site.kind
    }
}

/// The compiled, solver-ready bitset model for a lattice.
///
/// Sites are ordered Tris first, then Mids, then Singles. The solver's
/// branching heuristic exploits this ordering to explore low-energy
/// configurations first.
#[derive(Debug, Clone)]
pub struct BitLattice {
    /// Number of canonical lattice points.
    pub n_points: usize,
    /// Bitset with bits `0..N-1` set.
    pub full_mask: FixedBitSet,
    /// Compiled sites, ordered Tris, Mids, Singles.
    pub sites: Vec<CompiledSite>,
    /// Index of the first Mid site (i.e. the number of Tri sites).
    pub mids_start: usize,
    /// Index of the first Single site (i.e. the number of Tri + Mid sites).
    pub singles_start: usize,
    /// Upper bound on the number of Singles usable in any one solution.
    pub max_singlets: usize,
    /// Optional pre-filter: only these site indices are admissible to the
    /// solver (no-rings filter, similarity filter). `None` means all
    /// compiled sites are admissible.
    pub admissible: Option<FixedBitSet>,
    /// Forbidden-combination bitmasks over site indices: no solution may
    /// select every site named by any one of these masks.
    pub forbidden: Vec<FixedBitSet>,
    /// For each site index, the positions in `forbidden` whose highest set
    /// bit equals that index. Lets the solver check only the masks that
    /// could just have been completed, instead of scanning all of them.
    pub forbidden_by_highest_bit: Vec<Vec<usize>>,
}

impl BitLattice {
    /// Compile generated sites into a bit-lattice over `n_points` canonical
    /// lattice points.
    ///
    /// # Errors
    ///
    /// Returns [`OxLatticeError::DegenerateAttachment`] if any site's
    /// attachment set doesn't have exactly `kind.arity()` distinct bits, or
    /// [`OxLatticeError::UnreachablePoint`] if some canonical point has no
    /// Single site at all (every canonical point must be individually
    /// coverable for the solver's feasibility guarantee to hold).
    pub fn build(n_points: usize, lists: SiteLists) -> Result<Self> {
        let mut bound_by_single = FixedBitSet::with_capacity(n_points);
        for single in &lists.singles {
            for &index in &single.attach {
                bound_by_single.insert(index);
            }
        }
        if bound_by_single.count_ones(..) != n_points {
            let index = (0..n_points)
                .find(|&i| !bound_by_single.contains(i))
                .expect("count mismatch implies a missing bit exists");
            return Err(OxLatticeError::UnreachablePoint { index });
        }

        let ordered: Vec<Site> = lists
            .tris
            .into_iter()
            .chain(lists.mids)
            .chain(lists.singles)
            .collect();

        let mut compiled = Vec::with_capacity(ordered.len());
        let mut masks = Vec::with_capacity(ordered.len());
        for site in &ordered {
            let mask = site.attach_mask(n_points);
            if mask.count_ones(..) != site.kind.arity() {
                return Err(OxLatticeError::DegenerateAttachment {
                    kind: kind_name(site.kind),
                });
            }
            masks.push(mask);
        }

        for (index, site) in ordered.into_iter().enumerate() {
            let mut excludes = FixedBitSet::with_capacity(masks.len());
            for (later_index, later_mask) in masks.iter().enumerate().skip(index + 1) {
                let shares_a_bit = masks[index].ones().any(|bit| later_mask.contains(bit));
                if shares_a_bit {
                    excludes.insert(later_index);
                }
            }
            compiled.push(CompiledSite {
                site,
                attach_mask: masks[index].clone(),
                excludes,
            });
        }

        let mids_start = compiled.iter().take_while(|c| c.kind() == SiteKind::Tri).count();
        let singles_start = mids_start
            + compiled[mids_start..]
                .iter()
                .take_while(|c| c.kind() == SiteKind::Mid)
                .count();

        let mut full_mask = FixedBitSet::with_capacity(n_points);
        full_mask.set_range(.., true);
        let compiled_len = compiled.len();

        Ok(Self {
            n_points,
            full_mask,
            sites: compiled,
            mids_start,
            singles_start,
            max_singlets: 2,
            admissible: None,
            forbidden: Vec::new(),
            forbidden_by_highest_bit: vec![Vec::new(); compiled_len],
        })
    }

    /// Set the maximum number of Singles usable in a solution.
    pub fn with_max_singlets(mut self, max_singlets: usize) -> Self {
        self.max_singlets = max_singlets;
        self
    }

    /// Restrict the candidate universe to `mask` (no-rings filter and/or
    /// similarity filter composed by intersection).
    pub fn with_admissible(mut self, mask: FixedBitSet) -> Self {
        self.admissible = Some(match self.admissible.take() {
            Some(existing) => {
                let mut intersected = FixedBitSet::with_capacity(self.sites.len());
                for bit in existing.ones() {
                    if mask.contains(bit) {
                        intersected.insert(bit);
                    }
                }
                intersected
            }
            None => mask,
        });
        self
    }

    /// Register forbidden site-index combinations (from the no-rings
    /// filter): no solution may select every site named by any one mask in
    /// `forbidden`. Replaces whatever forbidden set was registered before,
    /// if any.
    pub fn with_forbidden(mut self, forbidden: Vec<FixedBitSet>) -> Self {
        let mut by_highest_bit = vec![Vec::new(); self.sites.len()];
        for (mask_index, mask) in forbidden.iter().enumerate() {
            if let Some(highest) = mask.ones().max() {
                by_highest_bit[highest].push(mask_index);
            }
        }
        self.forbidden = forbidden;
        self.forbidden_by_highest_bit = by_highest_bit;
        self
    }

    /// True if site `index` is currently admissible to the solver.
    pub fn is_admissible(&self, index: usize) -> bool {
        match &self.admissible {
            Some(mask) => mask.contains(index),
            None => true,
        }
    }

    /// Total number of compiled sites.
    pub fn len(&self) -> usize {
        self.sites.len()
    }

    /// True if there are no compiled sites at all.
    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

fn kind_name(kind: SiteKind) -> &'static str {
    match kind {
        SiteKind::Single => "Single",
        SiteKind::Mid => "Mid",
        SiteKind::Tri => "Tri",
    }
}
