//! Shared scaffolding for integration tests: a small periodic triangular
//! lattice generator standing in for the external basis-vector collaborator
//! (generating a periodic cell from a basis is out of scope for the core
//! crate itself).

use oxlattice::cull::CellSize;
use oxlattice::point::LatticePoint;

/// Build a `(size+1) x (size+1)` periodic triangular lattice with ghost
/// images wrapping the top and right edges, mirroring the `size=N`
/// basis-vector cells the end-to-end scenarios reference.
pub fn triangular_cell(size: usize) -> (Vec<LatticePoint>, CellSize) {
    let a = (1.0_f64, 0.0_f64);
    let b = (0.5_f64, 3f64.sqrt() / 2.0);
    let n = size + 1;

    let index = |r: usize, c: usize| r * n + c;
    let mut points = Vec::with_capacity(n * n);
    for r in 0..n {
        for c in 0..n {
            let x = c as f64 * a.0 + r as f64 * b.0;
            let y = c as f64 * a.1 + r as f64 * b.1;
            points.push(LatticePoint::canonical(x, y));
        }
    }

    let mut ghosts = Vec::new();
    for r in 0..n {
        let link = index(r, 0);
        let (x0, y0) = points[link].location();
        ghosts.push(LatticePoint::ghost(
            x0 + n as f64 * a.0,
            y0 + n as f64 * a.1,
            link,
        ));
    }
    for c in 0..n {
        let link = index(0, c);
        let (x0, y0) = points[link].location();
        ghosts.push(LatticePoint::ghost(
            x0 + n as f64 * b.0,
            y0 + n as f64 * b.1,
            link,
        ));
    }
    let corner_link = index(0, 0);
    let (x0, y0) = points[corner_link].location();
    ghosts.push(LatticePoint::ghost(
        x0 + n as f64 * (a.0 + b.0),
        y0 + n as f64 * (a.1 + b.1),
        corner_link,
    ));

    points.extend(ghosts);
    let cell = CellSize {
        x: n as f64 * a.0,
        y: n as f64 * b.1,
    };
    (points, cell)
}
