use super::UnitCell;
use super::reciprocal::ReciprocalCell;
use super::tensors;
use crate::core::classifier::{LatticeParameters, build_lattice_from_metric_tensor, classify_checked};
use crate::core::error::LatticeError;
use crate::core::maths::LinearAlgebra;
use crate::core::models::lattice::Lattice;
use tracing::{debug, trace};

/// A real-space cell with its reciprocal and coordinate transforms.
///
/// Every matrix is computed once at construction.
#[derive(Debug, Clone)]
pub struct ForwardCell<M: LinearAlgebra> {
    pub(super) maths: M,
    pub(super) lattice: Lattice,
    pub(super) metric_tensor: M::Matrix,
    pub(super) volume: f64,
    pub(super) reciprocal: Box<UnitCell<M>>,
    pub(super) orthogonalization: M::Matrix,
    pub(super) fractionalization: M::Matrix,
}

impl<M: LinearAlgebra> ForwardCell<M> {
    pub(super) fn from_lattice(maths: M, lattice: &Lattice) -> Result<Self, LatticeError> {
        let (system, axis) = classify_checked(&LatticeParameters::from_lattice(lattice))?;
        let classified = Lattice::with_classification(
            lattice.lengths(),
            lattice.angles(),
            lattice.volume(),
            system,
            axis,
        );
        let metric_tensor = maths.create_matrix(tensors::metric_tensor_rows(&classified));
        Self::assemble(maths, classified, metric_tensor)
    }

    pub(super) fn from_metric_tensor(
        maths: M,
        metric_tensor: M::Matrix,
    ) -> Result<Self, LatticeError> {
        let lattice = build_lattice_from_metric_tensor(&maths, &metric_tensor)?;
        Self::assemble(maths, lattice, metric_tensor)
    }

    fn assemble(
        maths: M,
        lattice: Lattice,
        metric_tensor: M::Matrix,
    ) -> Result<Self, LatticeError> {
        let rows = maths.matrix_to_array(&metric_tensor);
        let determinant = maths.determinant(&metric_tensor);
        if !tensors::is_well_conditioned(&rows, determinant) {
            return Err(LatticeError::DegenerateLattice(format!(
                "metric tensor determinant {determinant:e} is too small for {lattice}"
            )));
        }
        let inverse = maths.inverse(&metric_tensor).ok_or_else(|| {
            LatticeError::DegenerateLattice(format!("metric tensor of {lattice} is singular"))
        })?;

        let volume = determinant.sqrt();
        let lattice = match lattice.volume() {
            Some(_) => lattice,
            None => lattice.with_volume(volume),
        };

        let reciprocal =
            ReciprocalCell::new(maths.clone(), inverse, lattice.clone(), metric_tensor.clone())?;

        let orthogonalization = maths.create_matrix(tensors::orthogonalization_rows(
            &lattice,
            &reciprocal.lattice,
        ));
        let fractionalization = maths.inverse(&orthogonalization).ok_or_else(|| {
            LatticeError::DegenerateLattice(format!(
                "orthogonalization matrix of {lattice} is singular"
            ))
        })?;

        debug!(
            system = %lattice.crystal_system(),
            axis = %lattice.principal_axis(),
            volume,
            "Unit cell constructed."
        );
        trace!(metric_tensor = ?rows, "Metric tensor.");
        trace!(
            orthogonalization = ?maths.matrix_to_array(&orthogonalization),
            "Orthogonalization matrix."
        );

        Ok(Self {
            maths,
            lattice,
            metric_tensor,
            volume,
            reciprocal: Box::new(UnitCell::Reciprocal(reciprocal)),
            orthogonalization,
            fractionalization,
        })
    }
}
