use crate::core::cell::UnitCell;
use crate::core::maths::LinearAlgebra;
use crate::core::models::lattice::Lattice;
use crate::core::models::system::{CrystalSystem, PrincipalAxis};
use serde::Serialize;
use tracing::instrument;

/// A serializable snapshot of everything a unit cell derives from its lattice.
///
/// Scalar fields come first so the report serializes cleanly to TOML.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellReport {
    pub crystal_system: CrystalSystem,
    pub principal_axis: PrincipalAxis,
    pub volume: f64,
    pub reciprocal_volume: f64,
    pub metric_tensor: [[f64; 3]; 3],
    pub reciprocal_metric_tensor: [[f64; 3]; 3],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orthogonalization_matrix: Option<[[f64; 3]; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fractionalization_matrix: Option<[[f64; 3]; 3]>,
    pub lattice: Lattice,
    pub reciprocal_lattice: Lattice,
}

impl CellReport {
    #[instrument(skip_all, name = "cell_report")]
    pub fn from_cell<M: LinearAlgebra>(cell: &UnitCell<M>) -> Self {
        let maths = cell.maths();
        let reciprocal_volume = cell
            .reciprocal()
            .map(|reciprocal| reciprocal.volume())
            .or_else(|| cell.reciprocal_lattice().volume())
            .unwrap_or(1.0 / cell.volume());

        Self {
            crystal_system: cell.crystal_system(),
            principal_axis: cell.principal_axis(),
            volume: cell.volume(),
            reciprocal_volume,
            metric_tensor: maths.matrix_to_array(cell.metric_tensor()),
            reciprocal_metric_tensor: maths.matrix_to_array(cell.reciprocal_metric_tensor()),
            orthogonalization_matrix: cell
                .orthogonalization_matrix()
                .map(|m| maths.matrix_to_array(m)),
            fractionalization_matrix: cell
                .fractionalization_matrix()
                .map(|m| maths.matrix_to_array(m)),
            lattice: cell.lattice().clone(),
            reciprocal_lattice: cell.reciprocal_lattice().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_report_carries_both_transforms() {
        let cell = UnitCell::new(&Lattice::new(3.0, 4.0, 5.0, 90.0, 90.0, 90.0)).unwrap();
        let report = CellReport::from_cell(&cell);
        assert_eq!(report.crystal_system, CrystalSystem::Orthorhombic);
        assert!((report.volume - 60.0).abs() < 1e-12);
        assert!((report.reciprocal_volume - 1.0 / 60.0).abs() < 1e-12);
        assert!((report.reciprocal_metric_tensor[0][0] - 1.0 / 9.0).abs() < 1e-12);
        assert!(report.orthogonalization_matrix.is_some());
        assert!(report.fractionalization_matrix.is_some());
        assert_eq!(&report.lattice, cell.lattice());
    }

    #[test]
    fn reciprocal_report_points_back_and_has_no_transforms() {
        let cell = UnitCell::new(&Lattice::new(3.0, 4.0, 5.0, 90.0, 90.0, 90.0)).unwrap();
        let report = CellReport::from_cell(cell.reciprocal().unwrap());
        assert!((report.volume - 1.0 / 60.0).abs() < 1e-12);
        assert!((report.reciprocal_volume - 60.0).abs() < 1e-12);
        assert_eq!(&report.reciprocal_lattice, cell.lattice());
        assert!(report.orthogonalization_matrix.is_none());
        assert!(report.fractionalization_matrix.is_none());
    }
}
