//! Result decoding: turns a solver [`Solution`] back into oxygen
//! coordinates grouped by site kind, and into a chemistry-tuple export
//! ready for serialization.

use crate::point::PointSet;
use crate::site::SiteKind;
use crate::solver::Solution;
use crate::{BitLattice, OxLatticeError, Result};
use serde::{Deserialize, Serialize};

/// Atomic number of silicon, used for the underlying lattice points.
pub const SILICON: u8 = 14;
/// Atomic number of oxygen, used for every selected attachment site.
pub const OXYGEN: u8 = 8;

/// Height (Å) above the lattice plane at which attached oxygen sits.
pub const OXYGEN_HEIGHT: f64 = 1.5;

/// A solution's oxygen sites, grouped by kind, in the order the solver
/// selected them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecodedSolution {
    /// Centroid coordinates of every selected Tri site.
    pub tris: Vec<(f64, f64)>,
    /// Centroid coordinates of every selected Mid site.
    pub mids: Vec<(f64, f64)>,
    /// Coordinates of every selected Single site.
    pub singles: Vec<(f64, f64)>,
}

impl DecodedSolution {
    /// Total number of oxygen sites across all three kinds.
    pub fn len(&self) -> usize {
        self.tris.len() + self.mids.len() + self.singles.len()
    }

    /// True if the solution selected no sites at all (never happens for a
    /// lattice with at least one point, but checked for completeness).
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode a raw solver solution into coordinates grouped by site kind.
///
/// # Errors
///
/// Returns [`OxLatticeError::DegenerateAttachment`] if `solution` names a
/// site index outside `lattice.sites`. This only happens when a solution
/// produced by one lattice is mistakenly decoded against another.
pub fn decode(lattice: &BitLattice, solution: &Solution) -> Result<DecodedSolution> {
    let mut decoded = DecodedSolution {
        tris: Vec::new(),
        mids: Vec::new(),
        singles: Vec::new(),
    };
    for &index in &solution.sites {
        let compiled = lattice
            .sites
            .get(index)
            .ok_or(OxLatticeError::DegenerateAttachment { kind: "solution" })?;
        let location = compiled.site.location();
        match compiled.kind() {
            SiteKind::Tri => decoded.tris.push(location),
            SiteKind::Mid => decoded.mids.push(location),
            SiteKind::Single => decoded.singles.push(location),
        }
    }
    Ok(decoded)
}

/// A flattened, exportable atomic structure: a 3x3 basis (rows are lattice
/// vectors, Å), Cartesian atomic positions, and matching atomic numbers.
/// Mirrors the `(basis_vectors, positions, atomic_numbers)` tuple external
/// chemistry tooling (ASE, spglib) expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemistryTuple {
    /// Periodic cell, row-major: `basis_vectors[i]` is lattice vector `i`.
    pub basis_vectors: [[f64; 3]; 3],
    /// Cartesian `(x, y, z)` positions, silicon atoms first, then oxygen.
    pub positions: Vec<[f64; 3]>,
    /// Atomic number per entry in `positions`, same order.
    pub atomic_numbers: Vec<u8>,
}

/// Build a chemistry tuple: one silicon atom per canonical lattice point at
/// `z = 0`, plus one oxygen atom per selected site at `z = OXYGEN_HEIGHT`.
/// `basis_vectors` is supplied by the caller, since this crate only
/// enumerates attachment configurations and doesn't generate the periodic
/// cell itself.
pub fn to_chemistry_tuple(
    points: &PointSet,
    decoded: &DecodedSolution,
    basis_vectors: [[f64; 3]; 3],
) -> ChemistryTuple {
    let mut positions = Vec::with_capacity(points.canonical_len() + decoded.len());
    let mut atomic_numbers = Vec::with_capacity(positions.capacity());

    for index in points.canonical_indices() {
        let (x, y) = points.points()[index].location();
        positions.push([x, y, 0.0]);
        atomic_numbers.push(SILICON);
    }
    for &(x, y) in decoded.tris.iter().chain(&decoded.mids).chain(&decoded.singles) {
        positions.push([x, y, OXYGEN_HEIGHT]);
        atomic_numbers.push(OXYGEN);
    }

    ChemistryTuple {
        basis_vectors,
        positions,
        atomic_numbers,
    }
}

/// A 2D point as it appears in the `lattice_points` array of
/// [`LatticeExport`]: coordinates plus whether it's a ghost.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportPoint {
    /// X coordinate, Å.
    pub x: f64,
    /// Y coordinate, Å.
    pub y: f64,
    /// Whether this point is a periodic image of another point.
    pub ghost: bool,
}

/// A bare `(x, y)` site coordinate, as it appears in `tripoints`,
/// `midpoints`, and `singles`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportSite {
    /// X coordinate, Å.
    pub x: f64,
    /// Y coordinate, Å.
    pub y: f64,
}

fn export_site((x, y): (f64, f64)) -> ExportSite {
    ExportSite { x, y }
}

/// The external JSON solution format: the originating lattice points plus
/// the three selected-site coordinate arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatticeExport {
    /// Every point the solution was computed over, canonical and ghost.
    pub lattice_points: Vec<ExportPoint>,
    /// Selected Tri site coordinates.
    pub tripoints: Vec<ExportSite>,
    /// Selected Mid site coordinates.
    pub midpoints: Vec<ExportSite>,
    /// Selected Single site coordinates.
    pub singles: Vec<ExportSite>,
}

/// Build the external JSON export form of a decoded solution.
pub fn to_export(points: &PointSet, decoded: &DecodedSolution) -> LatticeExport {
    LatticeExport {
        lattice_points: points
            .points()
            .iter()
            .map(|p| ExportPoint {
                x: p.x,
                y: p.y,
                ghost: p.ghost,
            })
            .collect(),
        tripoints: decoded.tris.iter().copied().map(export_site).collect(),
        midpoints: decoded.mids.iter().copied().map(export_site).collect(),
        singles: decoded.singles.iter().copied().map(export_site).collect(),
    }
}

/// Serialize a [`LatticeExport`] as UTF-8 JSON with 4-space indentation.
pub fn to_json_pretty(export: &LatticeExport) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    serde::Serialize::serialize(export, &mut serializer)?;
    Ok(String::from_utf8(buffer).expect("serde_json only emits valid UTF-8"))
}
