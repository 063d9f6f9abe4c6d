use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;
use xtalcell::core::classifier::LatticeParameters;
use xtalcell::core::models::crystal::Site;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileCellConfig {
    pub a: f64,
    pub b: Option<f64>,
    pub c: Option<f64>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    pub volume: Option<f64>,
}

impl FileCellConfig {
    pub fn parameters(&self) -> LatticeParameters {
        let mut params = LatticeParameters::new(self.a);
        if let Some(b) = self.b {
            params = params.b(b);
        }
        if let Some(c) = self.c {
            params = params.c(c);
        }
        if let Some(alpha) = self.alpha {
            params = params.alpha(alpha);
        }
        if let Some(beta) = self.beta {
            params = params.beta(beta);
        }
        if let Some(gamma) = self.gamma {
            params = params.gamma(gamma);
        }
        params
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileSiteConfig {
    pub label: String,
    pub element: String,
    pub position: [f64; 3],
    pub occupancy: Option<f64>,
}

impl From<FileSiteConfig> for Site {
    fn from(p: FileSiteConfig) -> Self {
        let site = Site::new(&p.label, &p.element, p.position);
        match p.occupancy {
            Some(occupancy) => site.with_occupancy(occupancy),
            None => site,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileAnalysisConfig {
    #[serde(rename = "d-min")]
    pub d_min: Option<f64>,
    #[serde(rename = "contact-cutoff")]
    pub contact_cutoff: Option<f64>,
    #[serde(rename = "include-friedel-mates")]
    pub include_friedel_mates: Option<bool>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub name: Option<String>,
    pub cell: Option<FileCellConfig>,
    #[serde(default)]
    pub sites: Vec<FileSiteConfig>,
    pub analysis: Option<FileAnalysisConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
