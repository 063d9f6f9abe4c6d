use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// Settings shared by the analysis workflows.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Smallest d-spacing, in Å, a reflection may have.
    pub d_min: f64,
    /// Largest site-to-site distance, in Å, reported as a contact.
    pub contact_cutoff: f64,
    /// Keep both (hkl) and (−h−k−l) in reflection lists.
    pub include_friedel_mates: bool,
}

#[derive(Default)]
pub struct AnalysisConfigBuilder {
    d_min: Option<f64>,
    contact_cutoff: Option<f64>,
    include_friedel_mates: Option<bool>,
}

impl AnalysisConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn d_min(mut self, d_min: f64) -> Self {
        self.d_min = Some(d_min);
        self
    }
    pub fn contact_cutoff(mut self, cutoff: f64) -> Self {
        self.contact_cutoff = Some(cutoff);
        self
    }
    pub fn include_friedel_mates(mut self, include: bool) -> Self {
        self.include_friedel_mates = Some(include);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig, ConfigError> {
        let d_min = positive("d_min", self.d_min.ok_or(ConfigError::MissingParameter("d_min"))?)?;
        let contact_cutoff = positive(
            "contact_cutoff",
            self.contact_cutoff
                .ok_or(ConfigError::MissingParameter("contact_cutoff"))?,
        )?;
        Ok(AnalysisConfig {
            d_min,
            contact_cutoff,
            include_friedel_mates: self
                .include_friedel_mates
                .ok_or(ConfigError::MissingParameter("include_friedel_mates"))?,
        })
    }
}

fn positive(parameter: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            parameter,
            reason: format!("{value} is not a positive, finite number"),
        })
    }
}
