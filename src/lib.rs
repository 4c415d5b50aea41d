//! # oxlattice
//!
//! Combinatorial solver for oxygen-attachment configurations on a 2D
//! periodic triangular lattice.
//!
//! Given a set of silicon lattice points (plus their periodic ghost
//! images) and a neighbor relation between them, this crate:
//!
//! - generates candidate `Single`, `Mid`, and `Tri` oxygen sites
//!   ([`sitegen`]),
//! - compiles them into a fixed-layout bitset model ([`bitlattice`]),
//! - optionally filters out candidates that would close a small ring
//!   ([`rings`]) or duplicate an already-covered geometry
//!   ([`similarity`]),
//! - backtracks over the remaining candidates to enumerate every
//!   exact covering of the lattice points ([`solver`]),
//! - and decodes solutions back into coordinates and exportable
//!   chemistry tuples ([`decode`]), optionally culling near-duplicates
//!   afterward ([`cull`]).
//!
//! Producing the underlying lattice points and their neighbor relation
//! from a periodic basis is explicitly out of scope for this crate; see
//! [`neighbors`] for the narrow convenience path it does offer.
//!
//! ## Example
//!
//! ```rust,ignore
//! use oxlattice::{BitLattice, PointSet, LatticePoint, NeighborRelation};
//! use oxlattice::sitegen::generate_sites;
//! use oxlattice::solver::Solver;
//!
//! let points = PointSet::build(vec![
//!     LatticePoint::canonical(0.0, 0.0),
//!     LatticePoint::canonical(1.5, 0.0),
//!     LatticePoint::canonical(0.75, 1.3),
//! ])?;
//! let coords: Vec<_> = points.points().iter().map(|p| p.location()).collect();
//! let neighbors = NeighborRelation::from_radius(&coords, 1.6);
//! let lists = generate_sites(&points, &neighbors);
//! let lattice = BitLattice::build(points.canonical_len(), lists)?;
//! let solutions = Solver::new(&lattice).solve(true);
//! # Ok::<(), oxlattice::OxLatticeError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitlattice;
pub mod config;
pub mod cull;
pub mod decode;
pub mod error;
pub mod neighbors;
pub mod point;
pub mod rings;
pub mod similarity;
pub mod site;
pub mod sitegen;
pub mod solver;

pub use bitlattice::{BitLattice, CompiledSite};
pub use config::SolverConfig;
pub use error::{OxLatticeError, Result};
pub use neighbors::NeighborRelation;
pub use point::{LatticePoint, PointSet};
pub use site::{Site, SiteKind};
