//! End-to-end scenarios E1 through E6.

mod common;

use oxlattice::bitlattice::BitLattice;
use oxlattice::cull::cull;
use oxlattice::decode::decode;
use oxlattice::neighbors::NeighborRelation;
use oxlattice::point::{LatticePoint, PointSet};
use oxlattice::rings::forbidden_masks;
use oxlattice::site::SiteKind;
use oxlattice::sitegen::generate_sites;
use oxlattice::solver::Solver;

fn build_lattice(points: Vec<LatticePoint>, cutoff: f64) -> (PointSet, BitLattice) {
    let point_set = PointSet::build(points).unwrap();
    let coords: Vec<_> = point_set.points().iter().map(|p| p.location()).collect();
    let neighbors = NeighborRelation::from_radius(&coords, cutoff);
    let lists = generate_sites(&point_set, &neighbors);
    let lattice = BitLattice::build(point_set.canonical_len(), lists).unwrap();
    (point_set, lattice)
}

/// E1: four non-periodic points, cutoff 3.5. Expect at least one solution
/// containing the Tri spanning the first three points.
#[test]
fn e1_four_point_chain_has_a_full_triangle_solution() {
    let points = vec![
        LatticePoint::canonical(0.0, 0.0),
        LatticePoint::canonical(1.6, 2.7),
        LatticePoint::canonical(3.1, 0.0),
        LatticePoint::canonical(4.6, 2.7),
    ];
    let (_point_set, lattice) = build_lattice(points, 3.5);
    let solver = Solver::new(&lattice);
    let solutions = solver.solve(true);
    assert!(!solutions.is_empty());

    let has_target_tri = solutions.iter().any(|solution| {
        solution.sites.iter().any(|&index| {
            let site = &lattice.sites[index];
            site.kind() == SiteKind::Tri && site.site.attach == vec![0, 1, 2]
        })
    });
    assert!(has_target_tri, "no solution selected the {{0,1,2}} Tri");
}

/// E2: periodic size=1 cell (4 canonical points). Non-empty solution list,
/// every solution's O-count bounded by `2N/3 + eps`.
#[test]
fn e2_periodic_size_one_cell_has_bounded_oxygen_count() {
    let (points, _cell) = common::triangular_cell(1);
    let n = 4;
    let (_point_set, lattice) = build_lattice(points, 1.1);
    assert_eq!(lattice.n_points, n);

    let solver = Solver::new(&lattice);
    let solutions = solver.solve(true);
    assert!(!solutions.is_empty());

    let bound = 2.0 * n as f64 / 3.0 + 1e-6;
    for solution in &solutions {
        assert!(solution.sites.len() as f64 <= bound);
    }
}

/// E3: same cell, `max_singlets=0`. Every emitted solution selects zero
/// Singles (or the list is empty if that bound is infeasible).
#[test]
fn e3_zero_max_singlets_forbids_any_single_site() {
    let (points, _cell) = common::triangular_cell(1);
    let (_point_set, lattice) = build_lattice(points, 1.1);
    let lattice = lattice.with_max_singlets(0);

    let solver = Solver::new(&lattice);
    let solutions = solver.solve(true);
    for solution in &solutions {
        let singles = solution
            .sites
            .iter()
            .filter(|&&i| lattice.sites[i].kind() == SiteKind::Single)
            .count();
        assert_eq!(singles, 0);
    }
}

/// E4: size=3 cell with the no-rings filter applied. No emitted solution
/// contains every edge of a 4-, 5-, or 6-cycle.
#[test]
fn e4_rings_filter_leaves_no_closed_ring_in_any_solution() {
    let (points, _cell) = common::triangular_cell(3);
    let (_point_set, lattice) = build_lattice(points, 1.1);

    let n_points = lattice.n_points;
    let masks = forbidden_masks(&lattice, n_points);
    let lattice = lattice.with_forbidden(masks);

    let solver = Solver::new(&lattice);
    let solutions = solver.solve(true);
    assert!(!solutions.is_empty());

    for solution in &solutions {
        for forbidden in &lattice.forbidden {
            let all_selected = forbidden
                .ones()
                .all(|site_index| solution.sites.contains(&site_index));
            assert!(!all_selected, "a solution closed a forbidden ring");
        }
    }
}

/// E5: enumerating the same size=1 cell twice with identical parameters
/// yields identical solution sequences in identical order.
#[test]
fn e5_repeated_enumeration_is_deterministic() {
    let (points_a, _) = common::triangular_cell(1);
    let (points_b, _) = common::triangular_cell(1);
    let (_set_a, lattice_a) = build_lattice(points_a, 1.1);
    let (_set_b, lattice_b) = build_lattice(points_b, 1.1);

    let solutions_a = Solver::new(&lattice_a).solve(true);
    let solutions_b = Solver::new(&lattice_b).solve(true);

    assert_eq!(solutions_a.len(), solutions_b.len());
    for (a, b) in solutions_a.iter().zip(&solutions_b) {
        assert_eq!(a.sites, b.sites);
    }
}

/// E6: the post-hoc culler on E2's solutions with a tight margin preserves
/// every geometrically distinct solution and removes only exact duplicates.
#[test]
fn e6_culling_with_tight_margin_removes_only_exact_duplicates() {
    let (points, cell) = common::triangular_cell(1);
    let (_point_set, lattice) = build_lattice(points, 1.1);
    let solver = Solver::new(&lattice);
    let solutions = solver.solve(true);

    let culled = cull(&lattice, &solutions, cell, 0.0001);
    assert!(culled.len() <= solutions.len());

    // Every surviving solution still decodes to a valid, full covering.
    for solution in &culled {
        let decoded = decode(&lattice, solution).unwrap();
        assert_eq!(decoded.len(), solution.sites.len());
    }
}
