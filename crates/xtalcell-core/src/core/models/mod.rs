//! # Core Models Module
//!
//! Value types describing a crystal: its lattice parameters and metric
//! classification, the Miller planes of its reflections, and the atomic sites
//! of its contents.
//!
//! ## Key Components
//!
//! - [`lattice`] - The six cell parameters with volume and classification
//! - [`system`] - Crystal systems and principal axes
//! - [`miller`] - Lattice planes indexed by (h, k, l)
//! - [`crystal`] - A unit cell together with its labelled sites
//! - [`elements`] - Atomic masses by element symbol
//! - [`ids`] - Stable identifiers for sites
//!
//! ## Usage
//!
//! ```
//! use xtalcell::core::cell::UnitCell;
//! use xtalcell::core::models::crystal::{Crystal, Site};
//! use xtalcell::core::models::lattice::Lattice;
//!
//! let cell = UnitCell::new(&Lattice::new(4.2, 4.2, 4.2, 90.0, 90.0, 90.0))?;
//! let mut crystal = Crystal::new("NaCl", cell);
//! crystal.add_site(Site::new("Na1", "Na", [0.0, 0.0, 0.0]))?;
//! crystal.add_site(Site::new("Cl1", "Cl", [0.5, 0.5, 0.5]))?;
//! assert_eq!(crystal.formula(), "ClNa");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod crystal;
pub mod elements;
pub mod ids;
pub mod lattice;
pub mod miller;
pub mod system;
