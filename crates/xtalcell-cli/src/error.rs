use std::path::PathBuf;
use thiserror::Error;
use xtalcell::core::error::LatticeError;
use xtalcell::core::io::reflections::ReflectionIoError;
use xtalcell::core::models::crystal::CrystalError;
use xtalcell::workflows::error::WorkflowError;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("Invalid lattice: {0}")]
    Lattice(#[from] LatticeError),

    #[error("Invalid crystal: {0}")]
    Crystal(#[from] CrystalError),

    #[error("Reflection file error: {0}")]
    Reflection(#[from] ReflectionIoError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
