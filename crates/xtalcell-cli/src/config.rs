mod builder;
mod defaults;
mod file;
mod models;

pub use builder::build_config;
pub use models::{AnalysisOverrides, AppConfig};
