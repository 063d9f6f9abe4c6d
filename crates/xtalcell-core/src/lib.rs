//! # xtalcell
//!
//! Crystal lattice and unit-cell geometry: metric tensors, reciprocal lattices,
//! crystal-system classification, coordinate transforms, inter-site distances and
//! angles, and diffraction-plane spacings.
//!
//! ## Architectural Philosophy
//!
//! The library is split into two layers.
//!
//! - **[`core`]: The Foundation.** Immutable value types (`Lattice`, `MillerPlane`,
//!   `Crystal`), the crystal-system classifier, and the `UnitCell` geometry engine.
//!   All dense arithmetic goes through the injected `LinearAlgebra` capability.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built on the core, such
//!   as enumerating the reflections visible at a resolution limit or listing the
//!   interatomic contacts of a crystal, configured through `AnalysisConfig`.
//!
//! ```
//! use xtalcell::core::cell::UnitCell;
//! use xtalcell::core::models::lattice::Lattice;
//! use xtalcell::core::models::system::CrystalSystem;
//!
//! let cell = UnitCell::new(&Lattice::new(3.0, 3.0, 5.0, 90.0, 90.0, 120.0))?;
//! assert_eq!(cell.crystal_system(), CrystalSystem::Hexagonal);
//! assert!((cell.gamma_star() - 60.0).abs() < 1e-9);
//! # Ok::<(), xtalcell::core::error::LatticeError>(())
//! ```

pub mod core;
pub mod workflows;
