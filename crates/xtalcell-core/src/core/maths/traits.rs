use crate::core::error::LatticeError;
use std::fmt::Debug;

/// Defines the linear-algebra capability consumed by the lattice geometry engine.
///
/// The engine never performs dense matrix arithmetic itself. Everything from
/// matrix construction to inversion goes through an implementor of this trait,
/// which is injected into [`UnitCell`](crate::core::cell::UnitCell) at
/// construction time. All matrices are 3×3 and all vectors have three components.
///
/// Implementations must keep [`determinant`](LinearAlgebra::determinant) and
/// [`inverse`](LinearAlgebra::inverse) numerically consistent for symmetric
/// positive-definite input, and [`matrix_to_array`](LinearAlgebra::matrix_to_array)
/// must return the row-major values the matrix was created from.
pub trait LinearAlgebra: Clone + Debug + Send + Sync {
    /// The backend's 3×3 matrix type.
    type Matrix: Clone + Debug + PartialEq + Send + Sync;

    /// The backend's three-component vector type.
    type Vector: Clone + Debug + PartialEq + Send + Sync;

    /// Creates a matrix from row-major values.
    fn create_matrix(&self, rows: [[f64; 3]; 3]) -> Self::Matrix;

    /// Creates a vector from exactly three components.
    fn vector_from_array(&self, components: [f64; 3]) -> Self::Vector;

    /// Multiplies a matrix by a column vector.
    fn multiply(&self, matrix: &Self::Matrix, vector: &Self::Vector) -> Self::Vector;

    /// Inverts a matrix, returning `None` if it is singular.
    fn inverse(&self, matrix: &Self::Matrix) -> Option<Self::Matrix>;

    /// Computes the determinant of a matrix.
    fn determinant(&self, matrix: &Self::Matrix) -> f64;

    /// Returns the row-major values of a matrix.
    fn matrix_to_array(&self, matrix: &Self::Matrix) -> [[f64; 3]; 3];

    /// Returns the components of a vector.
    fn vector_to_array(&self, vector: &Self::Vector) -> [f64; 3];

    fn add(&self, lhs: &Self::Vector, rhs: &Self::Vector) -> Self::Vector;

    fn subtract(&self, lhs: &Self::Vector, rhs: &Self::Vector) -> Self::Vector;

    fn dot(&self, lhs: &Self::Vector, rhs: &Self::Vector) -> f64;

    fn cross(&self, lhs: &Self::Vector, rhs: &Self::Vector) -> Self::Vector;

    /// Creates a vector from a slice, checking that it has three components.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::DimensionMismatch`] if `components` does not
    /// contain exactly three values.
    fn create_vector(&self, components: &[f64]) -> Result<Self::Vector, LatticeError> {
        let array: [f64; 3] =
            components
                .try_into()
                .map_err(|_| LatticeError::DimensionMismatch {
                    expected: 3,
                    found: components.len(),
                })?;
        Ok(self.vector_from_array(array))
    }

    /// Multiplies a matrix by a plain array, returning a plain array.
    fn multiply_array(&self, matrix: &Self::Matrix, components: [f64; 3]) -> [f64; 3] {
        let vector = self.vector_from_array(components);
        self.vector_to_array(&self.multiply(matrix, &vector))
    }

    /// Computes the quadratic form `lhsᵀ · matrix · rhs`.
    fn quadratic_form(&self, matrix: &Self::Matrix, lhs: &Self::Vector, rhs: &Self::Vector) -> f64 {
        self.dot(lhs, &self.multiply(matrix, rhs))
    }
}
