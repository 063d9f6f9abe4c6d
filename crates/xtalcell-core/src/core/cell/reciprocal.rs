use crate::core::classifier::build_dual_lattice;
use crate::core::error::LatticeError;
use crate::core::maths::LinearAlgebra;
use crate::core::models::lattice::Lattice;

/// The dual of a forward cell, built from its inverted metric tensor.
///
/// A reciprocal cell keeps a copy of the forward lattice and metric tensor
/// instead of building a reciprocal of its own. It has no orthogonalization
/// matrix. Its lattice shares the crystal system of the forward lattice.
#[derive(Debug, Clone)]
pub struct ReciprocalCell<M: LinearAlgebra> {
    pub(super) maths: M,
    pub(super) lattice: Lattice,
    pub(super) metric_tensor: M::Matrix,
    pub(super) volume: f64,
    pub(super) direct_lattice: Lattice,
    pub(super) direct_metric_tensor: M::Matrix,
}

impl<M: LinearAlgebra> ReciprocalCell<M> {
    pub(super) fn new(
        maths: M,
        metric_tensor: M::Matrix,
        direct_lattice: Lattice,
        direct_metric_tensor: M::Matrix,
    ) -> Result<Self, LatticeError> {
        let lattice =
            build_dual_lattice(&maths, &metric_tensor, direct_lattice.crystal_system())?;
        let volume = match lattice.volume() {
            Some(volume) => volume,
            None => maths.determinant(&metric_tensor).sqrt(),
        };
        Ok(Self {
            maths,
            lattice,
            metric_tensor,
            volume,
            direct_lattice,
            direct_metric_tensor,
        })
    }

    /// The lattice of the forward cell this cell was derived from.
    pub fn direct_lattice(&self) -> &Lattice {
        &self.direct_lattice
    }

    pub fn direct_metric_tensor(&self) -> &M::Matrix {
        &self.direct_metric_tensor
    }
}
