use crate::core::models::lattice::Lattice;

/// Off-diagonal metric tensor elements smaller than this are set to exactly zero.
pub const OFF_DIAGONAL_SNAP: f64 = 1e-10;

/// Smallest accepted ratio `det G / (G₀₀·G₁₁·G₂₂)`, i.e. `(V / abc)²`.
pub const MIN_DETERMINANT_RATIO: f64 = 1e-12;

/// Row-major metric tensor of a lattice.
///
/// `G[i][i] = lᵢ²` and `G[i][j] = lᵢ·lⱼ·cos(θₖ)` where θₖ is the angle between
/// axes i and j.
pub fn metric_tensor_rows(lattice: &Lattice) -> [[f64; 3]; 3] {
    let lengths = lattice.lengths();
    let cosines = lattice.angles_radians().map(f64::cos);

    let mut rows = [[0.0; 3]; 3];
    for i in 0..3 {
        rows[i][i] = lengths[i] * lengths[i];
    }
    for k in 0..3 {
        let i = (k + 1) % 3;
        let j = (k + 2) % 3;
        let mut value = lengths[i] * lengths[j] * cosines[k];
        if value.abs() < OFF_DIAGONAL_SNAP {
            value = 0.0;
        }
        rows[i][j] = value;
        rows[j][i] = value;
    }
    rows
}

/// Row-major orthogonalization matrix mapping fractional to Cartesian coordinates.
///
/// Cartesian x is along a, y lies in the ab plane and z along c*.
pub fn orthogonalization_rows(direct: &Lattice, reciprocal: &Lattice) -> [[f64; 3]; 3] {
    let [a, b, c] = direct.lengths();
    let beta = direct.beta_radians();
    let gamma = direct.gamma_radians();
    let cos_alpha_star = reciprocal.alpha_radians().cos();
    let c_star = reciprocal.c();

    [
        [a, b * gamma.cos(), c * beta.cos()],
        [0.0, b * gamma.sin(), -c * beta.sin() * cos_alpha_star],
        [0.0, 0.0, 1.0 / c_star],
    ]
}

/// Checks that a metric tensor spans a non-degenerate cell.
pub fn is_well_conditioned(rows: &[[f64; 3]; 3], determinant: f64) -> bool {
    let diagonal = rows[0][0] * rows[1][1] * rows[2][2];
    determinant.is_finite()
        && diagonal.is_finite()
        && diagonal > 0.0
        && determinant > MIN_DETERMINANT_RATIO * diagonal
}
