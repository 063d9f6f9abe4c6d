use super::system::{CrystalSystem, PrincipalAxis};
use serde::Serialize;
use std::fmt;

/// Absolute tolerance used when comparing lattice parameters for equality.
pub const LATTICE_EQUALITY_TOLERANCE: f64 = 1e-10;

/// The six parameters that specify a periodic lattice, plus its classification.
///
/// A `Lattice` is an immutable value. Lengths are in Ångström and angles in
/// degrees; the radian form of each angle is derived once at construction.
/// The volume is optional because a lattice built from raw parameters does not
/// know it until a [`UnitCell`](crate::core::cell::UnitCell) computes it.
#[derive(Debug, Clone, Serialize)]
pub struct Lattice {
    lengths: [f64; 3],
    angles: [f64; 3],
    #[serde(skip)]
    angles_radians: [f64; 3],
    volume: Option<f64>,
    crystal_system: CrystalSystem,
    principal_axis: PrincipalAxis,
}

impl Lattice {
    /// Creates an unclassified lattice without a volume.
    ///
    /// The crystal system is [`CrystalSystem::Unknown`] and the principal axis
    /// [`PrincipalAxis::None`]. Use
    /// [`build_lattice`](crate::core::classifier::build_lattice) to obtain a
    /// classified lattice.
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        Self::with_classification(
            [a, b, c],
            [alpha, beta, gamma],
            None,
            CrystalSystem::Unknown,
            PrincipalAxis::None,
        )
    }

    /// Creates a lattice with an explicit volume, crystal system and principal axis.
    ///
    /// # Arguments
    ///
    /// * `lengths` - a, b, c in Ångström.
    /// * `angles` - α, β, γ in degrees.
    /// * `volume` - Cell volume in Å³, if known.
    /// * `crystal_system` - The metric symmetry of the lattice.
    /// * `principal_axis` - The unique axis of the lattice.
    pub fn with_classification(
        lengths: [f64; 3],
        angles: [f64; 3],
        volume: Option<f64>,
        crystal_system: CrystalSystem,
        principal_axis: PrincipalAxis,
    ) -> Self {
        Self {
            lengths,
            angles,
            angles_radians: angles.map(f64::to_radians),
            volume,
            crystal_system,
            principal_axis,
        }
    }

    /// Returns a copy of this lattice carrying the given volume.
    pub fn with_volume(&self, volume: f64) -> Self {
        Self {
            volume: Some(volume),
            ..self.clone()
        }
    }

    pub fn lengths(&self) -> [f64; 3] {
        self.lengths
    }

    pub fn angles(&self) -> [f64; 3] {
        self.angles
    }

    pub fn angles_radians(&self) -> [f64; 3] {
        self.angles_radians
    }

    pub fn a(&self) -> f64 {
        self.lengths[0]
    }

    pub fn b(&self) -> f64 {
        self.lengths[1]
    }

    pub fn c(&self) -> f64 {
        self.lengths[2]
    }

    pub fn alpha(&self) -> f64 {
        self.angles[0]
    }

    pub fn beta(&self) -> f64 {
        self.angles[1]
    }

    pub fn gamma(&self) -> f64 {
        self.angles[2]
    }

    pub fn alpha_radians(&self) -> f64 {
        self.angles_radians[0]
    }

    pub fn beta_radians(&self) -> f64 {
        self.angles_radians[1]
    }

    pub fn gamma_radians(&self) -> f64 {
        self.angles_radians[2]
    }

    /// The stored cell volume in Å³, if known.
    pub fn volume(&self) -> Option<f64> {
        self.volume
    }

    pub fn crystal_system(&self) -> CrystalSystem {
        self.crystal_system
    }

    pub fn principal_axis(&self) -> PrincipalAxis {
        self.principal_axis
    }

    /// Computes the cell volume from the six parameters.
    ///
    /// `V = abc·sqrt(1 − cos²α − cos²β − cos²γ + 2·cosα·cosβ·cosγ)`. Returns
    /// `NaN` if the angles cannot close a parallelepiped.
    pub fn calculated_volume(&self) -> f64 {
        let [ca, cb, cg] = self.angles_radians.map(f64::cos);
        let factor = 1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg;
        self.lengths.iter().product::<f64>() * factor.sqrt()
    }
}

fn all_close(lhs: &[f64; 3], rhs: &[f64; 3], tolerance: f64) -> bool {
    lhs.iter()
        .zip(rhs.iter())
        .all(|(l, r)| (l - r).abs() < tolerance)
}

impl PartialEq for Lattice {
    fn eq(&self, other: &Self) -> bool {
        all_close(&self.lengths, &other.lengths, LATTICE_EQUALITY_TOLERANCE)
            && all_close(&self.angles, &other.angles, LATTICE_EQUALITY_TOLERANCE)
            && all_close(
                &self.angles_radians,
                &other.angles_radians,
                LATTICE_EQUALITY_TOLERANCE,
            )
            && self.volume == other.volume
            && self.crystal_system == other.crystal_system
            && self.principal_axis == other.principal_axis
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "a={:.5} b={:.5} c={:.5} α={:.4}° β={:.4}° γ={:.4}° ({}",
            self.lengths[0],
            self.lengths[1],
            self.lengths[2],
            self.angles[0],
            self.angles[1],
            self.angles[2],
            self.crystal_system,
        )?;
        if self.principal_axis != PrincipalAxis::None {
            write!(f, ", unique axis {}", self.principal_axis)?;
        }
        f.write_str(")")?;
        if let Some(volume) = self.volume {
            write!(f, " V={volume:.4} Å³")?;
        }
        Ok(())
    }
}
