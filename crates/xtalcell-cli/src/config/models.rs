use xtalcell::core::models::crystal::Crystal;
use xtalcell::workflows::config::AnalysisConfig;

pub struct AppConfig {
    pub crystal: Crystal,
    pub analysis: AnalysisConfig,
}

/// Values given on the command line that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct AnalysisOverrides {
    pub d_min: Option<f64>,
    pub contact_cutoff: Option<f64>,
    pub include_friedel_mates: Option<bool>,
    pub set_values: Vec<String>,
}
