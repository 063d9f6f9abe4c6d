//! # Core Module
//!
//! The lattice geometry engine and the data it works on.
//!
//! ## Architecture
//!
//! - **Linear Algebra** ([`maths`]) - The injected 3×3 matrix capability and its `nalgebra` backend
//! - **Data Models** ([`models`]) - Lattices, crystal systems, Miller planes and crystal sites
//! - **Classification** ([`classifier`]) - Crystal system and principal axis from cell parameters
//! - **Unit Cells** ([`cell`]) - Metric tensors, reciprocal cells, coordinate transforms and geometry
//! - **File I/O** ([`io`]) - CSV exchange of reflection lists
//! - **Errors** ([`error`]) - The error type shared by every geometric operation
//!
//! ## Conventions
//!
//! Lengths are in Ångström and angles in degrees unless a name says otherwise.
//! Angles returned by geometric queries are in radians. Coordinates passed to a
//! unit cell are fractional unless the method converts from Cartesian.

pub mod cell;
pub mod classifier;
pub mod error;
pub mod io;
pub mod maths;
pub mod models;
