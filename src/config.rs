//! Solver-wide configuration, and the config-driven pipeline entry point
//! that threads it through site generation, filtering, and solving.

use crate::bitlattice::BitLattice;
use crate::neighbors::NeighborRelation;
use crate::point::PointSet;
use crate::rings::forbidden_masks;
use crate::similarity::similarity_admissible_mask;
use crate::sitegen::generate_sites;
use crate::solver::{Solution, Solver};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Tunable parameters shared by site generation, filtering, and solving.
///
/// Construct with `SolverConfig::default()` and override only what you
/// need, either through the `with_*` builders or by setting fields
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Cutoff radius (Å) used to derive the neighbor relation when one
    /// isn't supplied explicitly.
    pub creation_distance_margin: f64,
    /// Upper bound on the number of Single sites usable in one solution.
    pub max_singlets: usize,
    /// Distance tolerance (Å) for the similarity filter's equivalence test.
    pub difference_distance: f64,
    /// Whether to apply the similarity/symmetry filter before solving.
    pub use_similarity_filter: bool,
    /// Whether to apply the no-rings structural filter before solving.
    pub use_rings_filter: bool,
    /// If true, enumerate every solution; if false, stop at the first.
    pub find_all: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            creation_distance_margin: 3.5,
            max_singlets: 2,
            difference_distance: 0.05,
            use_similarity_filter: false,
            use_rings_filter: true,
            find_all: true,
        }
    }
}

impl SolverConfig {
    /// Override the neighbor-derivation cutoff radius.
    pub fn with_creation_distance_margin(mut self, value: f64) -> Self {
        self.creation_distance_margin = value;
        self
    }

    /// Override the upper bound on Single sites usable in one solution.
    pub fn with_max_singlets(mut self, value: usize) -> Self {
        self.max_singlets = value;
        self
    }

    /// Override the similarity filter's equivalence tolerance.
    pub fn with_difference_distance(mut self, value: f64) -> Self {
        self.difference_distance = value;
        self
    }

    /// Enable or disable the similarity/symmetry filter.
    pub fn with_similarity_filter(mut self, enabled: bool) -> Self {
        self.use_similarity_filter = enabled;
        self
    }

    /// Enable or disable the no-rings structural filter.
    pub fn with_rings_filter(mut self, enabled: bool) -> Self {
        self.use_rings_filter = enabled;
        self
    }

    /// Control whether the solver enumerates every solution or stops at the
    /// first.
    pub fn with_find_all(mut self, enabled: bool) -> Self {
        self.find_all = enabled;
        self
    }

    /// Run the full pipeline over `points`: derive the neighbor relation via
    /// `creation_distance_margin`, generate candidate sites, compile the
    /// bit-lattice, apply whichever filters this config enables, and solve.
    ///
    /// # Errors
    ///
    /// Returns an error if the compiled lattice rejects the generated sites
    /// (see [`BitLattice::build`]).
    pub fn solve(&self, points: &PointSet) -> Result<Vec<Solution>> {
        let coords: Vec<(f64, f64)> = points.points().iter().map(|p| p.location()).collect();
        let neighbors = NeighborRelation::from_radius(&coords, self.creation_distance_margin);
        let lists = generate_sites(points, &neighbors);

        let mut lattice =
            BitLattice::build(points.canonical_len(), lists)?.with_max_singlets(self.max_singlets);

        if self.use_rings_filter {
            let masks = forbidden_masks(&lattice, lattice.n_points);
            lattice = lattice.with_forbidden(masks);
        }
        if self.use_similarity_filter {
            let mask = similarity_admissible_mask(&lattice, self.difference_distance);
            lattice = lattice.with_admissible(mask);
        }

        Ok(Solver::new(&lattice).solve(self.find_all))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::LatticePoint;

    #[test]
    fn defaults_match_documented_constants() {
        let config = SolverConfig::default();
        assert_eq!(config.creation_distance_margin, 3.5);
        assert_eq!(config.max_singlets, 2);
        assert_eq!(config.difference_distance, 0.05);
        assert!(!config.use_similarity_filter);
        assert!(config.use_rings_filter);
        assert!(config.find_all);
    }

    #[test]
    fn round_trips_through_json_with_partial_overrides() {
        let json = r#"{"max_singlets": 4}"#;
        let config: SolverConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.max_singlets, 4);
        assert_eq!(config.creation_distance_margin, 3.5); // untouched default
    }

    #[test]
    fn builders_override_only_the_targeted_field() {
        let config = SolverConfig::default()
            .with_max_singlets(5)
            .with_rings_filter(false)
            .with_find_all(false);
        assert_eq!(config.max_singlets, 5);
        assert!(!config.use_rings_filter);
        assert!(!config.find_all);
        assert_eq!(config.creation_distance_margin, 3.5);
    }

    fn triangle_points() -> PointSet {
        PointSet::build(vec![
            LatticePoint::canonical(0.0, 0.0),
            LatticePoint::canonical(1.5, 0.0),
            LatticePoint::canonical(0.75, 1.299038105676658),
        ])
        .unwrap()
    }

    #[test]
    fn solve_threads_max_singlets_into_the_compiled_lattice() {
        // On an equilateral triangle, covering all three points without any
        // Single site is only possible via the one Tri spanning them all
        // (three points can't be exactly covered by 2-point Mids alone).
        let points = triangle_points();
        let config = SolverConfig::default()
            .with_creation_distance_margin(1.6)
            .with_max_singlets(0);
        let solutions = config.solve(&points).unwrap();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].sites.len(), 1);
    }

    #[test]
    fn solve_with_rings_filter_disabled_still_finds_a_solution() {
        let points = triangle_points();
        let config = SolverConfig::default()
            .with_creation_distance_margin(1.6)
            .with_rings_filter(false)
            .with_find_all(false);
        let solutions = config.solve(&points).unwrap();
        assert_eq!(solutions.len(), 1);
    }
}
