use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;

/// A family of lattice planes identified by its Miller indices (h, k, l).
///
/// The indices are fixed at construction. Everything else is derived data that
/// callers fill in as it becomes available: the d-spacing from a
/// [`UnitCell`](crate::core::cell::UnitCell), and optionally a label, structure
/// factor and intensity. `MillerPlane` has no natural ordering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MillerPlane {
    indices: [i32; 3],
    /// Interplanar spacing in Ångström; `None` until computed.
    pub d_spacing: Option<f64>,
    pub label: String,
    pub structure_factor: Option<f64>,
    pub intensity: Option<f64>,
}

impl MillerPlane {
    /// Creates a plane with no derived data.
    pub fn new(h: i32, k: i32, l: i32) -> Self {
        Self {
            indices: [h, k, l],
            d_spacing: None,
            label: String::new(),
            structure_factor: None,
            intensity: None,
        }
    }

    /// Creates a plane with a known d-spacing and label.
    pub fn with_d_spacing(h: i32, k: i32, l: i32, d_spacing: f64, label: &str) -> Self {
        Self {
            d_spacing: Some(d_spacing),
            label: label.to_string(),
            ..Self::new(h, k, l)
        }
    }

    pub fn indices(&self) -> [i32; 3] {
        self.indices
    }

    pub fn h(&self) -> i32 {
        self.indices[0]
    }

    pub fn k(&self) -> i32 {
        self.indices[1]
    }

    pub fn l(&self) -> i32 {
        self.indices[2]
    }

    /// Returns `true` for the (000) "plane", which has no defined spacing.
    pub fn is_origin(&self) -> bool {
        self.indices == [0, 0, 0]
    }

    /// The indices as floating-point components.
    pub fn as_vector(&self) -> [f64; 3] {
        self.indices.map(f64::from)
    }

    /// Momentum-transfer magnitude `Q = 2π / d` in Å⁻¹, once the d-spacing is known.
    pub fn q_spacing(&self) -> Option<f64> {
        self.d_spacing.map(|d| 2.0 * PI / d)
    }

    /// Returns the Friedel mate (−h, −k, −l) with the same derived data.
    pub fn friedel_mate(&self) -> Self {
        Self {
            indices: self.indices.map(|i| -i),
            ..self.clone()
        }
    }
}

impl fmt::Display for MillerPlane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [h, k, l] = self.indices;
        write!(f, "({h} {k} {l})")?;
        if let Some(d) = self.d_spacing {
            write!(f, " d={d:.5} Å")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_plane_has_no_derived_data() {
        let plane = MillerPlane::new(1, -2, 3);
        assert_eq!(plane.indices(), [1, -2, 3]);
        assert_eq!((plane.h(), plane.k(), plane.l()), (1, -2, 3));
        assert_eq!(plane.d_spacing, None);
        assert_eq!(plane.q_spacing(), None);
        assert_eq!(plane.label, "");
        assert_eq!(plane.structure_factor, None);
        assert_eq!(plane.intensity, None);
    }

    #[test]
    fn q_spacing_is_two_pi_over_d() {
        let plane = MillerPlane::with_d_spacing(1, 1, 1, 3.135, "111");
        let q = plane.q_spacing().unwrap();
        assert!((q - 2.0 * PI / 3.135).abs() < 1e-15);
    }

    #[test]
    fn derived_fields_are_mutable() {
        let mut plane = MillerPlane::new(2, 0, 0);
        plane.d_spacing = Some(2.715);
        plane.label = "Si 200".to_string();
        plane.structure_factor = Some(0.0);
        plane.intensity = Some(0.0);
        assert_eq!(plane.d_spacing, Some(2.715));
        assert_eq!(plane.label, "Si 200");
    }

    #[test]
    fn friedel_mate_negates_indices_only() {
        let plane = MillerPlane::with_d_spacing(1, -2, 0, 1.5, "x");
        let mate = plane.friedel_mate();
        assert_eq!(mate.indices(), [-1, 2, 0]);
        assert_eq!(mate.d_spacing, Some(1.5));
        assert_eq!(mate.label, "x");
    }

    #[test]
    fn origin_is_detected() {
        assert!(MillerPlane::new(0, 0, 0).is_origin());
        assert!(!MillerPlane::new(0, 0, 1).is_origin());
    }

    #[test]
    fn display_shows_indices_and_spacing() {
        assert_eq!(MillerPlane::new(1, 0, -1).to_string(), "(1 0 -1)");
        assert_eq!(
            MillerPlane::with_d_spacing(1, 1, 0, 2.0, "").to_string(),
            "(1 1 0) d=2.00000 Å"
        );
    }
}
