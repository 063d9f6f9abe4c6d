pub struct DefaultsConfig {
    pub name: String,
    pub d_min: f64,
    pub contact_cutoff: f64,
    pub include_friedel_mates: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            name: "crystal".to_string(),
            d_min: 1.0,
            contact_cutoff: 3.5,
            include_friedel_mates: true,
        }
    }
}
