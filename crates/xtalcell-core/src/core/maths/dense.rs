use super::traits::LinearAlgebra;
use nalgebra::{Matrix3, Vector3};

/// Selects how [`NalgebraMaths`] inverts matrices and computes determinants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InversionStrategy {
    /// Closed-form cofactor expansion. Exact zeros in the input stay exact zeros.
    #[default]
    Direct,
    /// LU decomposition with partial pivoting.
    Lu,
}

/// [`LinearAlgebra`] backed by `nalgebra`'s statically sized 3×3 types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NalgebraMaths {
    strategy: InversionStrategy,
}

impl NalgebraMaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(strategy: InversionStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> InversionStrategy {
        self.strategy
    }
}

impl LinearAlgebra for NalgebraMaths {
    type Matrix = Matrix3<f64>;
    type Vector = Vector3<f64>;

    fn create_matrix(&self, rows: [[f64; 3]; 3]) -> Matrix3<f64> {
        Matrix3::from_fn(|i, j| rows[i][j])
    }

    fn vector_from_array(&self, components: [f64; 3]) -> Vector3<f64> {
        Vector3::from(components)
    }

    fn multiply(&self, matrix: &Matrix3<f64>, vector: &Vector3<f64>) -> Vector3<f64> {
        matrix * vector
    }

    fn inverse(&self, matrix: &Matrix3<f64>) -> Option<Matrix3<f64>> {
        match self.strategy {
            InversionStrategy::Direct => matrix.try_inverse(),
            InversionStrategy::Lu => matrix.lu().try_inverse(),
        }
    }

    fn determinant(&self, matrix: &Matrix3<f64>) -> f64 {
        match self.strategy {
            InversionStrategy::Direct => matrix.determinant(),
            InversionStrategy::Lu => matrix.lu().determinant(),
        }
    }

    fn matrix_to_array(&self, matrix: &Matrix3<f64>) -> [[f64; 3]; 3] {
        std::array::from_fn(|i| std::array::from_fn(|j| matrix[(i, j)]))
    }

    fn vector_to_array(&self, vector: &Vector3<f64>) -> [f64; 3] {
        [vector.x, vector.y, vector.z]
    }

    fn add(&self, lhs: &Vector3<f64>, rhs: &Vector3<f64>) -> Vector3<f64> {
        lhs + rhs
    }

    fn subtract(&self, lhs: &Vector3<f64>, rhs: &Vector3<f64>) -> Vector3<f64> {
        lhs - rhs
    }

    fn dot(&self, lhs: &Vector3<f64>, rhs: &Vector3<f64>) -> f64 {
        lhs.dot(rhs)
    }

    fn cross(&self, lhs: &Vector3<f64>, rhs: &Vector3<f64>) -> Vector3<f64> {
        lhs.cross(rhs)
    }
}
