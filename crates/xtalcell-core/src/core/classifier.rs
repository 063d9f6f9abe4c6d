use crate::core::error::LatticeError;
use crate::core::maths::LinearAlgebra;
use crate::core::models::lattice::Lattice;
use crate::core::models::system::{CrystalSystem, PrincipalAxis};
use tracing::{trace, warn};

/// Relative tolerance for treating two lattice lengths as equal.
pub const LENGTH_TOLERANCE: f64 = 1e-6;
/// Absolute tolerance, in degrees, for treating two lattice angles as equal.
pub const ANGLE_TOLERANCE: f64 = 1e-6;

const RIGHT_ANGLE: f64 = 90.0;
const HEXAGONAL_ANGLE: f64 = 120.0;
const HEXAGONAL_RECIPROCAL_ANGLE: f64 = 60.0;

/// A possibly incomplete set of lattice parameters.
///
/// Only `a` is required. Missing lengths default to `a`; missing angles default
/// to 90° unless the given angles describe a rhombohedral cell, in which case
/// they default to the first given angle.
///
/// ```
/// use xtalcell::core::classifier::{classify, LatticeParameters};
/// use xtalcell::core::models::system::CrystalSystem;
///
/// let params = LatticeParameters::new(5.0).c(2.0).angles(90.0, 90.0, 120.0);
/// assert_eq!(classify(&params).0, CrystalSystem::Hexagonal);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeParameters {
    pub(crate) a: f64,
    pub(crate) b: Option<f64>,
    pub(crate) c: Option<f64>,
    pub(crate) alpha: Option<f64>,
    pub(crate) beta: Option<f64>,
    pub(crate) gamma: Option<f64>,
}

impl LatticeParameters {
    pub fn new(a: f64) -> Self {
        Self {
            a,
            b: None,
            c: None,
            alpha: None,
            beta: None,
            gamma: None,
        }
    }

    /// Creates a fully specified parameter set.
    pub fn from_arrays(lengths: [f64; 3], angles: [f64; 3]) -> Self {
        Self::new(lengths[0])
            .b(lengths[1])
            .c(lengths[2])
            .angles(angles[0], angles[1], angles[2])
    }

    /// Creates a fully specified parameter set from an existing lattice.
    pub fn from_lattice(lattice: &Lattice) -> Self {
        Self::from_arrays(lattice.lengths(), lattice.angles())
    }

    pub fn b(mut self, b: f64) -> Self {
        self.b = Some(b);
        self
    }
    pub fn c(mut self, c: f64) -> Self {
        self.c = Some(c);
        self
    }
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }
    pub fn beta(mut self, beta: f64) -> Self {
        self.beta = Some(beta);
        self
    }
    pub fn gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }
    pub fn angles(self, alpha: f64, beta: f64, gamma: f64) -> Self {
        self.alpha(alpha).beta(beta).gamma(gamma)
    }

    fn given_lengths(&self) -> [Option<f64>; 3] {
        [Some(self.a), self.b, self.c]
    }

    fn given_angles(&self) -> [Option<f64>; 3] {
        [self.alpha, self.beta, self.gamma]
    }

    fn filled_lengths(&self) -> [f64; 3] {
        [self.a, self.b.unwrap_or(self.a), self.c.unwrap_or(self.a)]
    }

    fn validate(&self) -> Result<(), LatticeError> {
        for (name, length) in ["a", "b", "c"].iter().zip(self.given_lengths()) {
            if let Some(length) = length {
                if !length.is_finite() || length <= 0.0 {
                    return Err(LatticeError::InvalidLattice(format!(
                        "length {name} = {length} must be positive and finite"
                    )));
                }
            }
        }
        for (name, angle) in ["alpha", "beta", "gamma"].iter().zip(self.given_angles()) {
            if let Some(angle) = angle {
                if !angle.is_finite() || angle <= 0.0 || angle >= 180.0 {
                    return Err(LatticeError::InvalidLattice(format!(
                        "angle {name} = {angle} must lie strictly between 0 and 180 degrees"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Parameters after defaults have been applied, together with their classification.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Resolved {
    lengths: [f64; 3],
    angles: [f64; 3],
    system: CrystalSystem,
    axis: PrincipalAxis,
}

fn lengths_equal(lhs: f64, rhs: f64) -> bool {
    (lhs - rhs).abs() <= LENGTH_TOLERANCE * lhs.abs().max(rhs.abs())
}

fn angles_equal(lhs: f64, rhs: f64) -> bool {
    (lhs - rhs).abs() <= ANGLE_TOLERANCE
}

/// Multiplicity of the most repeated length.
fn count_equal_lengths(lengths: &[f64; 3]) -> usize {
    lengths
        .iter()
        .map(|&l| lengths.iter().filter(|&&m| lengths_equal(l, m)).count())
        .max()
        .unwrap_or(0)
}

fn count_matching_angles(angles: &[f64; 3], target: f64) -> usize {
    angles.iter().filter(|&&a| angles_equal(a, target)).count()
}

/// Returns the shared angle if the given angles describe a rhombohedral cell.
///
/// Must run before unset angles are filled with 90°, otherwise a lattice given
/// as "a, α" would look monoclinic.
fn rhombohedral_angle(lengths: &[f64; 3], angles: &[Option<f64>; 3]) -> Option<f64> {
    let given: Vec<f64> = angles.iter().flatten().copied().collect();
    let first = *given.first()?;
    let all_same = given.iter().all(|&a| angles_equal(a, first));
    let fully_determined = given.len() == 3 || count_equal_lengths(lengths) == 3;
    (all_same && fully_determined && !angles_equal(first, RIGHT_ANGLE)).then_some(first)
}

fn classify_filled(lengths: &[f64; 3], angles: &[f64; 3]) -> CrystalSystem {
    let nr_equal_lengths = count_equal_lengths(lengths);
    let nr_right_angles = count_matching_angles(angles, RIGHT_ANGLE);

    if nr_right_angles == 3 {
        match nr_equal_lengths {
            3 => CrystalSystem::Cubic,
            2 => CrystalSystem::Tetragonal,
            _ => CrystalSystem::Orthorhombic,
        }
    } else if is_hexagonal_setting(angles, nr_right_angles) && nr_equal_lengths == 2 {
        CrystalSystem::Hexagonal
    } else if nr_right_angles == 2 && nr_equal_lengths == 1 {
        CrystalSystem::Monoclinic
    } else if nr_right_angles <= 1 && nr_equal_lengths == 1 {
        CrystalSystem::Triclinic
    } else {
        CrystalSystem::Unknown
    }
}

/// One angle of 120°, or the 60° a hexagonal reciprocal lattice carries
/// alongside two right angles.
fn is_hexagonal_setting(angles: &[f64; 3], nr_right_angles: usize) -> bool {
    count_matching_angles(angles, HEXAGONAL_ANGLE) == 1
        || (count_matching_angles(angles, HEXAGONAL_RECIPROCAL_ANGLE) == 1
            && nr_right_angles == 2)
}

/// Determines the unique axis of a classified lattice.
///
/// Hexagonal and tetragonal lattices are unique along c. A monoclinic lattice
/// is unique along the axis opposite its one non-right angle.
pub fn principal_axis(system: CrystalSystem, angles: &[f64; 3]) -> PrincipalAxis {
    match system {
        CrystalSystem::Hexagonal | CrystalSystem::Tetragonal => PrincipalAxis::C,
        CrystalSystem::Monoclinic => {
            if angles_equal(angles[0], angles[1]) {
                PrincipalAxis::C
            } else if angles_equal(angles[0], angles[2]) {
                PrincipalAxis::B
            } else {
                PrincipalAxis::A
            }
        }
        _ => PrincipalAxis::None,
    }
}

fn resolve(params: &LatticeParameters) -> Resolved {
    let lengths = params.filled_lengths();
    let given_angles = params.given_angles();

    if let Some(shared) = rhombohedral_angle(&lengths, &given_angles) {
        return Resolved {
            lengths,
            angles: given_angles.map(|a| a.unwrap_or(shared)),
            system: CrystalSystem::Rhombohedral,
            axis: PrincipalAxis::None,
        };
    }

    let angles = given_angles.map(|a| a.unwrap_or(RIGHT_ANGLE));
    let system = classify_filled(&lengths, &angles);
    Resolved {
        lengths,
        angles,
        system,
        axis: principal_axis(system, &angles),
    }
}

/// Classifies (possibly incomplete) lattice parameters.
///
/// This never fails: parameters matching no crystal system yield
/// [`CrystalSystem::Unknown`]. Use [`classify_checked`] or [`build_lattice`]
/// when an unknown system must be treated as an error.
pub fn classify(params: &LatticeParameters) -> (CrystalSystem, PrincipalAxis) {
    let resolved = resolve(params);
    (resolved.system, resolved.axis)
}

fn resolve_checked(params: &LatticeParameters) -> Result<Resolved, LatticeError> {
    params.validate()?;
    let resolved = resolve(params);
    if !resolved.system.is_known() {
        warn!(
            lengths = ?resolved.lengths,
            angles = ?resolved.angles,
            "Lattice parameters match no crystal system."
        );
        return Err(LatticeError::InvalidLattice(format!(
            "lengths {:?} and angles {:?} do not match any crystal system",
            resolved.lengths, resolved.angles
        )));
    }
    trace!(system = %resolved.system, axis = %resolved.axis, "Lattice classified.");
    Ok(resolved)
}

/// Validates and classifies lattice parameters.
///
/// # Errors
///
/// Returns [`LatticeError::InvalidLattice`] if a length is not positive, an
/// angle lies outside (0°, 180°), or the parameters match no crystal system.
pub fn classify_checked(
    params: &LatticeParameters,
) -> Result<(CrystalSystem, PrincipalAxis), LatticeError> {
    resolve_checked(params).map(|r| (r.system, r.axis))
}

/// Builds a classified [`Lattice`] from (possibly incomplete) parameters.
///
/// Defaults are filled in exactly as [`classify`] fills them.
///
/// # Errors
///
/// Returns [`LatticeError::InvalidLattice`] for the same reasons as
/// [`classify_checked`], or if `volume` is given but not positive and finite.
pub fn build_lattice(
    params: &LatticeParameters,
    volume: Option<f64>,
) -> Result<Lattice, LatticeError> {
    if let Some(v) = volume {
        if !v.is_finite() || v <= 0.0 {
            return Err(LatticeError::InvalidLattice(format!(
                "volume {v} must be positive and finite"
            )));
        }
    }
    let resolved = resolve_checked(params)?;
    Ok(Lattice::with_classification(
        resolved.lengths,
        resolved.angles,
        volume,
        resolved.system,
        resolved.axis,
    ))
}

/// Lengths, angles and volume read off a metric tensor.
fn metric_tensor_parameters<M: LinearAlgebra>(
    maths: &M,
    tensor: &M::Matrix,
) -> Result<([f64; 3], [f64; 3], f64), LatticeError> {
    let g = maths.matrix_to_array(tensor);
    if let Some(i) = (0..3).find(|&i| !(g[i][i].is_finite() && g[i][i] > 0.0)) {
        return Err(LatticeError::DegenerateLattice(format!(
            "metric tensor diagonal element {i} is {}",
            g[i][i]
        )));
    }

    let lengths: [f64; 3] = std::array::from_fn(|i| g[i][i].sqrt());
    let angles: [f64; 3] = std::array::from_fn(|i| {
        let j = (i + 1) % 3;
        let k = (j + 1) % 3;
        (g[j][k] / (lengths[j] * lengths[k]))
            .clamp(-1.0, 1.0)
            .acos()
            .to_degrees()
    });

    let determinant = maths.determinant(tensor);
    if !(determinant.is_finite() && determinant > 0.0) {
        return Err(LatticeError::DegenerateLattice(format!(
            "metric tensor determinant is {determinant}"
        )));
    }

    Ok((lengths, angles, determinant.sqrt()))
}

/// Recovers a classified [`Lattice`] from a metric tensor.
///
/// Lengths are the square roots of the diagonal, each angle is recovered from
/// the off-diagonal element coupling the other two axes, and the volume is the
/// square root of the determinant.
///
/// # Errors
///
/// Returns [`LatticeError::DegenerateLattice`] if the tensor has a non-positive
/// diagonal element or determinant, and [`LatticeError::InvalidLattice`] if the
/// recovered parameters cannot be classified.
pub fn build_lattice_from_metric_tensor<M: LinearAlgebra>(
    maths: &M,
    tensor: &M::Matrix,
) -> Result<Lattice, LatticeError> {
    let (lengths, angles, volume) = metric_tensor_parameters(maths, tensor)?;
    build_lattice(
        &LatticeParameters::from_arrays(lengths, angles),
        Some(volume),
    )
}

/// Builds the dual of a lattice of the given crystal system from the inverted
/// metric tensor.
///
/// The dual keeps `system`. Its principal axis is read from the dual angles.
/// Dual lengths can coincide where the direct lengths do not (the dual of a
/// monoclinic cell may have a* = b*), so no reclassification happens here.
///
/// # Errors
///
/// Returns [`LatticeError::DegenerateLattice`] if the tensor has a non-positive
/// diagonal element or determinant.
pub fn build_dual_lattice<M: LinearAlgebra>(
    maths: &M,
    tensor: &M::Matrix,
    system: CrystalSystem,
) -> Result<Lattice, LatticeError> {
    let (lengths, angles, volume) = metric_tensor_parameters(maths, tensor)?;
    let axis = principal_axis(system, &angles);
    trace!(%system, ?lengths, ?angles, "Built dual lattice.");
    Ok(Lattice::with_classification(
        lengths,
        angles,
        Some(volume),
        system,
        axis,
    ))
}
