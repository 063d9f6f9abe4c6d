use thiserror::Error;

/// Errors raised while building or querying lattices and unit cells.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LatticeError {
    /// The lattice parameters are malformed or cannot be classified into a crystal system.
    #[error("Invalid lattice: {0}")]
    InvalidLattice(String),

    /// The metric tensor is singular or too ill-conditioned to invert.
    #[error("Degenerate lattice: {0}")]
    DegenerateLattice(String),

    /// A coordinate vector or matrix has the wrong number of components.
    #[error("Dimension mismatch: expected {expected} components, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// The requested quantity is not defined for the given input.
    #[error("Undefined geometry: {0}")]
    UndefinedGeometry(String),

    /// A resolution (d-spacing) limit that is not a positive, finite number.
    #[error("Invalid resolution limit: {0} (must be positive and finite)")]
    InvalidResolution(f64),
}
