//! Error types for the oxlattice crate.

use thiserror::Error;

/// Main error type for oxlattice operations.
#[derive(Debug, Error)]
#[allow(missing_docs)] // Error variant fields are self-documenting via #[error] attribute
pub enum OxLatticeError {
    /// A lattice point coordinate is NaN or infinite.
    #[error("lattice point {index} has a non-finite coordinate")]
    NonFiniteCoordinate { index: usize },

    /// A ghost point's `link` does not reference a valid canonical point.
    #[error("ghost point {index} links to invalid canonical point {link}")]
    InvalidGhostLink { index: usize, link: usize },

    /// A site's attachment set collapsed below its nominal arity after deghosting.
    #[error("{kind} site has a degenerate attachment set")]
    DegenerateAttachment { kind: &'static str },

    /// A lattice point has no admissible site at all, so no assignment can
    /// ever bind it. Distinct from ordinary infeasibility under a tight
    /// `max_singlets`, which the solver reports as an empty solution list.
    #[error("lattice point {index} has no admissible site")]
    UnreachablePoint { index: usize },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for oxlattice operations.
pub type Result<T> = std::result::Result<T, OxLatticeError>;
