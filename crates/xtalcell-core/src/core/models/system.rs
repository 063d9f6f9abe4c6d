use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The metric crystal system of a lattice.
///
/// Classification is based purely on the relationships between the six cell
/// parameters, not on the symmetry of the atomic contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CrystalSystem {
    /// a = b = c; α = β = γ = 90°.
    Cubic,
    /// a = b = c; α = β = γ ≠ 90°.
    Rhombohedral,
    /// a = b ≠ c; α = β = 90°, γ = 120°.
    Hexagonal,
    /// a = b ≠ c; α = β = γ = 90°.
    Tetragonal,
    /// a ≠ b ≠ c; α = β = γ = 90°.
    Orthorhombic,
    /// a ≠ b ≠ c; two right angles.
    Monoclinic,
    /// a ≠ b ≠ c; at most one right angle.
    Triclinic,
    /// The parameters match none of the above.
    #[default]
    Unknown,
}

/// The unique (highest-symmetry) axis of a lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalAxis {
    A,
    B,
    C,
    #[default]
    None,
}

impl CrystalSystem {
    /// Returns `true` for every system other than [`CrystalSystem::Unknown`].
    pub fn is_known(&self) -> bool {
        !matches!(self, CrystalSystem::Unknown)
    }
}

impl fmt::Display for CrystalSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CrystalSystem::Cubic => "cubic",
            CrystalSystem::Rhombohedral => "rhombohedral",
            CrystalSystem::Hexagonal => "hexagonal",
            CrystalSystem::Tetragonal => "tetragonal",
            CrystalSystem::Orthorhombic => "orthorhombic",
            CrystalSystem::Monoclinic => "monoclinic",
            CrystalSystem::Triclinic => "triclinic",
            CrystalSystem::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

impl FromStr for CrystalSystem {
    type Err = ();

    /// Parses a crystal system name, case-insensitively.
    ///
    /// "trigonal" is accepted as an alias of [`CrystalSystem::Rhombohedral`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cubic" => Ok(CrystalSystem::Cubic),
            "rhombohedral" | "trigonal" => Ok(CrystalSystem::Rhombohedral),
            "hexagonal" => Ok(CrystalSystem::Hexagonal),
            "tetragonal" => Ok(CrystalSystem::Tetragonal),
            "orthorhombic" => Ok(CrystalSystem::Orthorhombic),
            "monoclinic" => Ok(CrystalSystem::Monoclinic),
            "triclinic" => Ok(CrystalSystem::Triclinic),
            "unknown" => Ok(CrystalSystem::Unknown),
            _ => Err(()),
        }
    }
}

impl fmt::Display for PrincipalAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrincipalAxis::A => "a",
            PrincipalAxis::B => "b",
            PrincipalAxis::C => "c",
            PrincipalAxis::None => "none",
        };
        f.write_str(name)
    }
}
