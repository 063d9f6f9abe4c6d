use super::config::ConfigError;
use crate::core::error::LatticeError;
use crate::core::models::crystal::CrystalError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Lattice geometry failed: {source}")]
    Lattice {
        #[from]
        source: LatticeError,
    },

    #[error("Crystal model error: {source}")]
    Crystal {
        #[from]
        source: CrystalError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
