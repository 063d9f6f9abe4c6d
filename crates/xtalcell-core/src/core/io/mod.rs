//! Provides input/output for derived crystallographic data.
//!
//! Reflection lists are exchanged as CSV with one row per plane and the
//! columns `h,k,l,d,q,label`.

pub mod reflections;
