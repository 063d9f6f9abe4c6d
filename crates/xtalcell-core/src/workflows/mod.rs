//! # Workflows Module
//!
//! High-level procedures built on the lattice engine. Each workflow takes a unit
//! cell or crystal together with an [`AnalysisConfig`](config::AnalysisConfig)
//! and returns plain data ready for reporting.
//!
//! - **Reflections** ([`reflections`]) - Every (hkl) visible down to a resolution limit
//! - **Contacts** ([`geometry`]) - Nearest-image distances between crystal sites
//! - **Reports** ([`report`]) - A serializable summary of a unit cell

pub mod config;
pub mod error;
pub mod geometry;
pub mod reflections;
pub mod report;
