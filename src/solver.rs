//! Backtracking solver: enumerates every way to cover the canonical
//! lattice points exactly once with compatible sites, subject to
//! the `max_singlets` bound and any forbidden ring-closing combinations.
//!
//! Branching always resolves the lowest-indexed uncovered point first
//! (fail-first: the most-constrained point is whichever the search has not
//! yet reached) and tries candidate sites in the lattice's static Tri, Mid,
//! Single order, so low-energy configurations are explored first.

use crate::bitlattice::BitLattice;
use crate::site::SiteKind;
use fixedbitset::FixedBitSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// One complete covering of the lattice: the site indices selected, in the
/// order the search chose them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Selected site indices into the originating [`BitLattice::sites`].
    pub sites: Vec<usize>,
}

impl Solution {
    /// Number of Single sites used in this solution.
    pub fn count_singles(&self, lattice: &BitLattice) -> usize {
        self.sites
            .iter()
            .filter(|&&i| lattice.sites[i].kind() == SiteKind::Single)
            .count()
    }
}

/// A stateful search over one [`BitLattice`]. Build once, reuse across
/// `solve`/`solve_parallel` calls since `sites_by_point` is immutable
/// derived data.
pub struct Solver<'a> {
    lattice: &'a BitLattice,
    sites_by_point: Vec<Vec<usize>>,
}

impl<'a> Solver<'a> {
    /// Build a solver over `lattice`, indexing admissible sites by the
    /// canonical point each one attaches.
    pub fn new(lattice: &'a BitLattice) -> Self {
        let mut sites_by_point = vec![Vec::new(); lattice.n_points];
        for (index, _site) in lattice.sites.iter().enumerate() {
            if !lattice.is_admissible(index) {
                continue;
            }
            for point in lattice.sites[index].attach_mask.ones() {
                sites_by_point[point].push(index);
            }
        }
        Self {
            lattice,
            sites_by_point,
        }
    }

    /// Enumerate solutions serially. If `find_all` is false, stops after
    /// the first solution found.
    pub fn solve(&self, find_all: bool) -> Vec<Solution> {
        self.solve_cancellable(find_all, None)
    }

    /// Like [`Self::solve`], but checks `cancel` between branch points and
    /// returns whatever was found so far once it flips to `true`.
    pub fn solve_cancellable(&self, find_all: bool, cancel: Option<&AtomicBool>) -> Vec<Solution> {
        debug!(n_points = self.lattice.n_points, find_all, "starting search");
        let mut state = SearchState::new(self.lattice.n_points, self.lattice.len(), find_all);
        self.search(&mut state, cancel);
        debug!(found = state.solutions.len(), "search finished");
        state.solutions
    }

    /// Parallel top-level decomposition: branch once serially, then explore
    /// each resulting subtree on a separate task via `rayon`. Requires the
    /// `rayon` feature. Solution order is not guaranteed to match
    /// [`Self::solve`]; the solution *set* always does.
    #[cfg(feature = "rayon")]
    pub fn solve_parallel(&self, find_all: bool) -> Vec<Solution> {
        use rayon::prelude::*;

        let mut root = SearchState::new(self.lattice.n_points, self.lattice.len(), find_all);
        let branches = self.first_branch_candidates(&root);
        if branches.is_empty() {
            self.search(&mut root, None);
            return root.solutions;
        }

        let cancel = Arc::new(AtomicBool::new(false));
        let found_any = Arc::new(AtomicBool::new(false));
        let results: Vec<Vec<Solution>> = branches
            .into_par_iter()
            .map(|site_index| {
                if !find_all && found_any.load(Ordering::Relaxed) {
                    return Vec::new();
                }
                let mut state = SearchState::new(self.lattice.n_points, self.lattice.len(), find_all);
                if !self.try_select(&mut state, site_index) {
                    return Vec::new();
                }
                self.search(&mut state, Some(cancel.as_ref()));
                self.undo_select(&mut state, site_index);
                if !find_all && !state.solutions.is_empty() {
                    found_any.store(true, Ordering::Relaxed);
                    cancel.store(true, Ordering::Relaxed);
                }
                state.solutions
            })
            .collect();

        let mut all: Vec<Solution> = results.into_iter().flatten().collect();
        if !find_all {
            all.truncate(1);
        }
        all
    }

    #[cfg(feature = "rayon")]
    fn first_branch_candidates(&self, state: &SearchState) -> Vec<usize> {
        match self.lowest_uncovered_point(state) {
            Some(point) => self.sites_by_point[point].clone(),
            None => Vec::new(),
        }
    }

    fn lowest_uncovered_point(&self, state: &SearchState) -> Option<usize> {
        (0..self.lattice.n_points).find(|&p| !state.bound_mask.contains(p))
    }

    /// True if `site_index` can be selected given `state` (no point
    /// overlap, singles bound respected).
    fn candidate_is_compatible(&self, state: &SearchState, site_index: usize) -> bool {
        let site = &self.lattice.sites[site_index];
        if site.attach_mask.ones().any(|bit| state.bound_mask.contains(bit)) {
            return false;
        }
        if site.kind() == SiteKind::Single && state.singles_used >= self.lattice.max_singlets {
            return false;
        }
        true
    }

    /// Tentatively select `site_index` into `state` without checking the
    /// forbidden-ring constraint. Returns `false` (and does nothing) if the
    /// site isn't compatible.
    fn try_select(&self, state: &mut SearchState, site_index: usize) -> bool {
        if !self.candidate_is_compatible(state, site_index) {
            return false;
        }
        let site = &self.lattice.sites[site_index];
        for bit in site.attach_mask.ones() {
            state.bound_mask.insert(bit);
        }
        state.chosen_mask.insert(site_index);
        state.chosen_order.push(site_index);
        if site.kind() == SiteKind::Single {
            state.singles_used += 1;
        }
        true
    }

    fn undo_select(&self, state: &mut SearchState, site_index: usize) {
        let site = &self.lattice.sites[site_index];
        for bit in site.attach_mask.ones() {
            state.bound_mask.set(bit, false);
        }
        state.chosen_mask.set(site_index, false);
        state.chosen_order.pop();
        if site.kind() == SiteKind::Single {
            state.singles_used -= 1;
        }
    }

    /// True if selecting `site_index` just completed a forbidden
    /// combination. Only masks whose highest bit is exactly `site_index`
    /// need checking: any other mask could not have just become fully
    /// selected.
    fn completes_forbidden_combination(&self, state: &SearchState, site_index: usize) -> bool {
        self.lattice.forbidden_by_highest_bit[site_index]
            .iter()
            .any(|&mask_index| {
                let mask = &self.lattice.forbidden[mask_index];
                mask.ones().all(|bit| state.chosen_mask.contains(bit))
            })
    }

    /// Depth-first search. Returns `true` if the caller should stop
    /// exploring further siblings (either cancelled, or `find_all` is false
    /// and a solution was just recorded).
    fn search(&self, state: &mut SearchState, cancel: Option<&AtomicBool>) -> bool {
        if let Some(flag) = cancel {
            if flag.load(Ordering::Relaxed) {
                return true;
            }
        }

        if state.bound_mask.count_ones(..) == self.lattice.n_points {
            trace!(sites = ?state.chosen_order, "solution found");
            state.solutions.push(Solution {
                sites: state.chosen_order.clone(),
            });
            return !state.find_all;
        }

        let Some(point) = self.lowest_uncovered_point(state) else {
            return false; // unreachable: bound_mask not full but no uncovered point
        };

        for site_index in self.sites_by_point[point].clone() {
            if !self.try_select(state, site_index) {
                continue;
            }
            if self.completes_forbidden_combination(state, site_index) {
                self.undo_select(state, site_index);
                continue;
            }
            let stop = self.search(state, cancel);
            self.undo_select(state, site_index);
            if stop {
                return true;
            }
        }
        false
    }
}

struct SearchState {
    bound_mask: FixedBitSet,
    chosen_mask: FixedBitSet,
    chosen_order: Vec<usize>,
    singles_used: usize,
    find_all: bool,
    solutions: Vec<Solution>,
}

impl SearchState {
    fn new(n_points: usize, n_sites: usize, find_all: bool) -> Self {
        Self {
            bound_mask: FixedBitSet::with_capacity(n_points),
            chosen_mask: FixedBitSet::with_capacity(n_sites),
            chosen_order: Vec::new(),
            singles_used: 0,
            find_all,
            solutions: Vec::new(),
        }
    }
}
