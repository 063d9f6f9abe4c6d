pub mod cell;
pub mod contacts;
pub mod reflections;
