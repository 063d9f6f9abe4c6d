//! # Unit Cell Module
//!
//! Geometry of a periodic lattice: metric tensors, the reciprocal cell, coordinate
//! transforms, and the distance, angle and d-spacing formulas built on them.
//!
//! A [`UnitCell`] is either a [`Forward`](UnitCell::Forward) cell built from a
//! [`Lattice`] or a metric tensor, or the [`Reciprocal`](UnitCell::Reciprocal) cell
//! every forward cell owns. A reciprocal cell never builds a reciprocal of its own;
//! it keeps a copy of the forward lattice and metric tensor instead.
//!
//! All vector arguments are fractional coordinates given as slices, and must have
//! exactly three components.
//!
//! ```
//! use xtalcell::core::cell::UnitCell;
//! use xtalcell::core::models::lattice::Lattice;
//! use xtalcell::core::models::miller::MillerPlane;
//!
//! let cell = UnitCell::new(&Lattice::new(5.43018, 5.43018, 5.43018, 90.0, 90.0, 90.0))?;
//! let d111 = cell.calculate_d_spacing(&MillerPlane::new(1, 1, 1))?;
//! assert!((d111 - 5.43018 / 3f64.sqrt()).abs() < 1e-12);
//! # Ok::<(), xtalcell::core::error::LatticeError>(())
//! ```

mod forward;
mod reciprocal;
pub mod tensors;

pub use forward::ForwardCell;
pub use reciprocal::ReciprocalCell;

use crate::core::error::LatticeError;
use crate::core::maths::{LinearAlgebra, NalgebraMaths};
use crate::core::models::lattice::Lattice;
use crate::core::models::miller::MillerPlane;
use crate::core::models::system::{CrystalSystem, PrincipalAxis};

/// Vectors shorter than this are treated as zero-length.
const ZERO_LENGTH: f64 = 1e-12;

/// Default relative length tolerance for [`UnitCell::is_similar`].
pub const DEFAULT_SIMILAR_LENGTH_TOLERANCE: f64 = 0.02;
/// Default absolute angle tolerance, in degrees, for [`UnitCell::is_similar`].
pub const DEFAULT_SIMILAR_ANGLE_TOLERANCE: f64 = 1.0;

#[derive(Debug, Clone)]
pub enum UnitCell<M: LinearAlgebra = NalgebraMaths> {
    Forward(ForwardCell<M>),
    Reciprocal(ReciprocalCell<M>),
}

impl UnitCell<NalgebraMaths> {
    /// Builds a forward cell from a lattice using the default `nalgebra` backend.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::InvalidLattice`] if the parameters are out of range
    /// or match no crystal system, and [`LatticeError::DegenerateLattice`] if the
    /// metric tensor is singular or ill-conditioned.
    pub fn new(lattice: &Lattice) -> Result<Self, LatticeError> {
        Self::with_maths(NalgebraMaths::new(), lattice)
    }
}

impl<M: LinearAlgebra> UnitCell<M> {
    /// Builds a forward cell from a lattice using the given backend.
    ///
    /// The stored lattice is reclassified, and receives the computed volume if
    /// it did not carry one.
    pub fn with_maths(maths: M, lattice: &Lattice) -> Result<Self, LatticeError> {
        ForwardCell::from_lattice(maths, lattice).map(UnitCell::Forward)
    }

    /// Builds a forward cell whose metric tensor is `metric_tensor`.
    pub fn from_metric_tensor(maths: M, metric_tensor: M::Matrix) -> Result<Self, LatticeError> {
        ForwardCell::from_metric_tensor(maths, metric_tensor).map(UnitCell::Forward)
    }

    pub fn is_reciprocal(&self) -> bool {
        matches!(self, UnitCell::Reciprocal(_))
    }

    pub fn maths(&self) -> &M {
        match self {
            UnitCell::Forward(cell) => &cell.maths,
            UnitCell::Reciprocal(cell) => &cell.maths,
        }
    }

    pub fn lattice(&self) -> &Lattice {
        match self {
            UnitCell::Forward(cell) => &cell.lattice,
            UnitCell::Reciprocal(cell) => &cell.lattice,
        }
    }

    pub fn metric_tensor(&self) -> &M::Matrix {
        match self {
            UnitCell::Forward(cell) => &cell.metric_tensor,
            UnitCell::Reciprocal(cell) => &cell.metric_tensor,
        }
    }

    /// The reciprocal cell, or `None` if this is already a reciprocal cell.
    pub fn reciprocal(&self) -> Option<&UnitCell<M>> {
        match self {
            UnitCell::Forward(cell) => Some(&cell.reciprocal),
            UnitCell::Reciprocal(_) => None,
        }
    }

    /// The lattice of the dual cell.
    ///
    /// For a reciprocal cell this is the forward lattice it was derived from.
    pub fn reciprocal_lattice(&self) -> &Lattice {
        match self {
            UnitCell::Forward(cell) => cell.reciprocal.lattice(),
            UnitCell::Reciprocal(cell) => &cell.direct_lattice,
        }
    }

    /// The metric tensor of the dual cell, i.e. the inverse of [`metric_tensor`](Self::metric_tensor).
    pub fn reciprocal_metric_tensor(&self) -> &M::Matrix {
        match self {
            UnitCell::Forward(cell) => cell.reciprocal.metric_tensor(),
            UnitCell::Reciprocal(cell) => &cell.direct_metric_tensor,
        }
    }

    /// Cell volume, `sqrt(det G)`.
    pub fn volume(&self) -> f64 {
        match self {
            UnitCell::Forward(cell) => cell.volume,
            UnitCell::Reciprocal(cell) => cell.volume,
        }
    }

    pub fn crystal_system(&self) -> CrystalSystem {
        self.lattice().crystal_system()
    }

    pub fn principal_axis(&self) -> PrincipalAxis {
        self.lattice().principal_axis()
    }

    pub fn a_star(&self) -> f64 {
        self.reciprocal_lattice().a()
    }

    pub fn b_star(&self) -> f64 {
        self.reciprocal_lattice().b()
    }

    pub fn c_star(&self) -> f64 {
        self.reciprocal_lattice().c()
    }

    /// α* in degrees.
    pub fn alpha_star(&self) -> f64 {
        self.reciprocal_lattice().alpha()
    }

    /// β* in degrees.
    pub fn beta_star(&self) -> f64 {
        self.reciprocal_lattice().beta()
    }

    /// γ* in degrees.
    pub fn gamma_star(&self) -> f64 {
        self.reciprocal_lattice().gamma()
    }

    /// Maps fractional to Cartesian coordinates. `None` for reciprocal cells.
    pub fn orthogonalization_matrix(&self) -> Option<&M::Matrix> {
        match self {
            UnitCell::Forward(cell) => Some(&cell.orthogonalization),
            UnitCell::Reciprocal(_) => None,
        }
    }

    /// Maps Cartesian to fractional coordinates. `None` for reciprocal cells.
    pub fn fractionalization_matrix(&self) -> Option<&M::Matrix> {
        match self {
            UnitCell::Forward(cell) => Some(&cell.fractionalization),
            UnitCell::Reciprocal(_) => None,
        }
    }

    fn require(matrix: Option<&M::Matrix>) -> Result<&M::Matrix, LatticeError> {
        matrix.ok_or_else(|| {
            LatticeError::UndefinedGeometry(
                "a reciprocal cell has no Cartesian frame".to_string(),
            )
        })
    }

    /// Converts a Cartesian vector to fractional coordinates.
    pub fn fractionalize(&self, cartesian: &[f64]) -> Result<[f64; 3], LatticeError> {
        let matrix = Self::require(self.fractionalization_matrix())?;
        let maths = self.maths();
        let vector = maths.create_vector(cartesian)?;
        Ok(maths.vector_to_array(&maths.multiply(matrix, &vector)))
    }

    /// Converts a fractional vector to Cartesian coordinates.
    pub fn orthogonalize(&self, fractional: &[f64]) -> Result<[f64; 3], LatticeError> {
        let maths = self.maths();
        let vector = maths.create_vector(fractional)?;
        Ok(maths.vector_to_array(&self.to_cartesian(&vector)?))
    }

    fn to_cartesian(&self, fractional: &M::Vector) -> Result<M::Vector, LatticeError> {
        let matrix = Self::require(self.orthogonalization_matrix())?;
        Ok(self.maths().multiply(matrix, fractional))
    }

    fn metric_length(&self, vector: &M::Vector) -> f64 {
        self.maths()
            .quadratic_form(self.metric_tensor(), vector, vector)
            .max(0.0)
            .sqrt()
    }

    fn difference(&self, from: &[f64], to: &[f64]) -> Result<M::Vector, LatticeError> {
        let maths = self.maths();
        Ok(maths.subtract(&maths.create_vector(to)?, &maths.create_vector(from)?))
    }

    /// Length of a fractional vector, `sqrt(vᵀ·G·v)`.
    pub fn calculate_length(&self, fractional: &[f64]) -> Result<f64, LatticeError> {
        let vector = self.maths().create_vector(fractional)?;
        Ok(self.metric_length(&vector))
    }

    /// Distance between two sites given in fractional coordinates.
    pub fn calculate_distance(&self, site1: &[f64], site2: &[f64]) -> Result<f64, LatticeError> {
        let delta = self.difference(site1, site2)?;
        Ok(self.metric_length(&delta))
    }

    fn angle_between(&self, v1: &M::Vector, v2: &M::Vector) -> Result<f64, LatticeError> {
        let l1 = self.metric_length(v1);
        let l2 = self.metric_length(v2);
        if l1 < ZERO_LENGTH || l2 < ZERO_LENGTH {
            return Err(LatticeError::UndefinedGeometry(
                "angle with a zero-length vector".to_string(),
            ));
        }
        let cosine = self.maths().quadratic_form(self.metric_tensor(), v1, v2) / (l1 * l2);
        Ok(cosine.clamp(-1.0, 1.0).acos())
    }

    /// Angle in radians between two fractional vectors.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::UndefinedGeometry`] if either vector has zero length.
    pub fn calculate_angle(&self, v1: &[f64], v2: &[f64]) -> Result<f64, LatticeError> {
        let maths = self.maths();
        self.angle_between(&maths.create_vector(v1)?, &maths.create_vector(v2)?)
    }

    /// Angle in radians at `site2` between the bonds to `site1` and `site3`.
    pub fn calculate_bond_angle(
        &self,
        site1: &[f64],
        site2: &[f64],
        site3: &[f64],
    ) -> Result<f64, LatticeError> {
        let v1 = self.difference(site1, site2)?;
        let v2 = self.difference(site3, site2)?;
        self.angle_between(&v1, &v2)
    }

    /// Signed torsion angle in radians, in (−π, π], about the `site2`–`site3` bond.
    ///
    /// Positive when, looking from `site2` towards `site3`, the `site1` bond must
    /// rotate clockwise to eclipse the `site4` bond.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::UndefinedGeometry`] if three consecutive sites are
    /// collinear or this is a reciprocal cell.
    pub fn calculate_dihedral_angle(
        &self,
        site1: &[f64],
        site2: &[f64],
        site3: &[f64],
        site4: &[f64],
    ) -> Result<f64, LatticeError> {
        let maths = self.maths();
        let p1 = self.to_cartesian(&maths.create_vector(site1)?)?;
        let p2 = self.to_cartesian(&maths.create_vector(site2)?)?;
        let p3 = self.to_cartesian(&maths.create_vector(site3)?)?;
        let p4 = self.to_cartesian(&maths.create_vector(site4)?)?;

        let b1 = maths.subtract(&p2, &p1);
        let b2 = maths.subtract(&p3, &p2);
        let b3 = maths.subtract(&p4, &p3);
        let n1 = maths.cross(&b1, &b2);
        let n2 = maths.cross(&b2, &b3);

        let norm = |v: &M::Vector| maths.dot(v, v).sqrt();
        let b2_norm = norm(&b2);
        if norm(&n1) < ZERO_LENGTH * norm(&b1) * b2_norm
            || norm(&n2) < ZERO_LENGTH * b2_norm * norm(&b3)
            || b2_norm < ZERO_LENGTH
        {
            return Err(LatticeError::UndefinedGeometry(
                "dihedral angle of collinear sites".to_string(),
            ));
        }

        let y = b2_norm * maths.dot(&b1, &n2);
        let x = maths.dot(&n1, &n2);
        Ok(y.atan2(x))
    }

    /// The largest |h|, |k|, |l| any reflection with `d ≥ d_limit` can have.
    ///
    /// The bound along each axis is `⌊length / d_limit⌋`. The returned plane
    /// carries no d-spacing.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::InvalidResolution`] unless `d_limit` is positive and finite.
    pub fn max_miller_index(&self, d_limit: f64) -> Result<MillerPlane, LatticeError> {
        if !(d_limit.is_finite() && d_limit > 0.0) {
            return Err(LatticeError::InvalidResolution(d_limit));
        }
        let [h, k, l] = self
            .lattice()
            .lengths()
            .map(|length| (length / d_limit).floor() as i32);
        Ok(MillerPlane::new(h, k, l))
    }

    /// Interplanar spacing of a plane, from `1/d² = hklᵀ·G*·hkl`.
    ///
    /// # Errors
    ///
    /// Returns [`LatticeError::UndefinedGeometry`] for the (000) plane.
    pub fn calculate_d_spacing(&self, plane: &MillerPlane) -> Result<f64, LatticeError> {
        if plane.is_origin() {
            return Err(LatticeError::UndefinedGeometry(
                "the (000) plane has no d-spacing".to_string(),
            ));
        }
        let maths = self.maths();
        let hkl = maths.vector_from_array(plane.as_vector());
        let inverse_d_squared = maths.quadratic_form(self.reciprocal_metric_tensor(), &hkl, &hkl);
        Ok(1.0 / inverse_d_squared.sqrt())
    }

    /// Compares the lattice parameters of two cells.
    ///
    /// Lengths are compared relative to this cell's lengths and angles absolutely
    /// in degrees. `None` selects [`DEFAULT_SIMILAR_LENGTH_TOLERANCE`] and
    /// [`DEFAULT_SIMILAR_ANGLE_TOLERANCE`].
    pub fn is_similar<N: LinearAlgebra>(
        &self,
        other: &UnitCell<N>,
        length_tolerance: Option<f64>,
        angle_tolerance: Option<f64>,
    ) -> bool {
        let length_tolerance = length_tolerance.unwrap_or(DEFAULT_SIMILAR_LENGTH_TOLERANCE);
        let angle_tolerance = angle_tolerance.unwrap_or(DEFAULT_SIMILAR_ANGLE_TOLERANCE);
        let (lhs, rhs) = (self.lattice(), other.lattice());

        let lengths_match = lhs
            .lengths()
            .iter()
            .zip(rhs.lengths())
            .all(|(l, r)| (l - r).abs() <= length_tolerance * l);
        let angles_match = lhs
            .angles()
            .iter()
            .zip(rhs.angles())
            .all(|(l, r)| (l - r).abs() <= angle_tolerance);
        lengths_match && angles_match
    }
}
