//! # Linear Algebra Capability
//!
//! The lattice engine consumes dense 3×3 linear algebra through the
//! [`LinearAlgebra`] trait instead of calling a matrix library directly.
//! Implementations are injected into [`UnitCell`](crate::core::cell::UnitCell)
//! at construction time.
//!
//! [`NalgebraMaths`] is the default implementation. It can invert either with
//! closed-form cofactors or through an LU decomposition, selected by
//! [`InversionStrategy`].

mod dense;
mod traits;

pub use dense::{InversionStrategy, NalgebraMaths};
pub use traits::LinearAlgebra;
