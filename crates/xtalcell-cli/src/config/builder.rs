use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AnalysisOverrides, AppConfig};
use crate::error::{CliError, Result};
use std::path::Path;
use tracing::{debug, info};
use xtalcell::core::cell::UnitCell;
use xtalcell::core::classifier::build_lattice;
use xtalcell::core::models::crystal::{Crystal, Site};
use xtalcell::workflows::config::AnalysisConfigBuilder;

pub fn build_config(config_path: &Path, overrides: &AnalysisOverrides) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = FileConfig::from_file(config_path)?;
    let mut file_config = apply_set_values(file_config, &overrides.set_values)?;

    let cell_file = file_config.cell.take().ok_or_else(|| {
        CliError::Config("A `[cell]` table with at least `a` is required.".to_string())
    })?;
    let lattice = build_lattice(&cell_file.parameters(), cell_file.volume)?;
    let cell = UnitCell::new(&lattice)?;
    info!(
        system = %cell.crystal_system(),
        volume = cell.volume(),
        "Unit cell built from configuration."
    );

    let name = file_config.name.take().unwrap_or(defaults.name);
    let mut crystal = Crystal::new(&name, cell);
    for file_site in file_config.sites {
        crystal.add_site(Site::from(file_site))?;
    }
    debug!(sites = crystal.site_count(), "Sites loaded.");

    let analysis_file = file_config.analysis.take().unwrap_or_default();
    let analysis = AnalysisConfigBuilder::new()
        .d_min(
            overrides
                .d_min
                .or(analysis_file.d_min)
                .unwrap_or(defaults.d_min),
        )
        .contact_cutoff(
            overrides
                .contact_cutoff
                .or(analysis_file.contact_cutoff)
                .unwrap_or(defaults.contact_cutoff),
        )
        .include_friedel_mates(
            overrides
                .include_friedel_mates
                .or(analysis_file.include_friedel_mates)
                .unwrap_or(defaults.include_friedel_mates),
        )
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(AppConfig { crystal, analysis })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    if set_values.is_empty() {
        return Ok(config);
    }
    for kv_pair in set_values {
        let (key, value_str) = kv_pair.split_once('=').ok_or_else(|| {
            CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            ))
        })?;

        let invalid_float =
            || CliError::Config(format!("Invalid float value for {}: {}", key, value_str));

        match key {
            "name" => config.name = Some(value_str.to_string()),
            "analysis.d-min" => {
                config.analysis.get_or_insert_with(Default::default).d_min =
                    Some(value_str.parse().map_err(|_| invalid_float())?);
            }
            "analysis.contact-cutoff" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .contact_cutoff = Some(value_str.parse().map_err(|_| invalid_float())?);
            }
            "analysis.include-friedel-mates" => {
                config
                    .analysis
                    .get_or_insert_with(Default::default)
                    .include_friedel_mates = Some(value_str.parse().map_err(|_| {
                    CliError::Config(format!(
                        "Invalid boolean value for {}: {}",
                        key, value_str
                    ))
                })?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};
    use xtalcell::core::models::crystal::CrystalError;
    use xtalcell::core::models::system::CrystalSystem;

    const ROCK_SALT: &str = r#"
        name = "NaCl"

        [cell]
        a = 5.64

        [[sites]]
        label = "Na1"
        element = "Na"
        position = [0.0, 0.0, 0.0]

        [[sites]]
        label = "Cl1"
        element = "Cl"
        position = [0.5, 0.5, 0.5]

        [analysis]
        d-min = 2.0
        "#;

    fn write_config_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let file_path = dir.path().join(name);
        fs::write(&file_path, content).unwrap();
        file_path
    }

    #[test]
    fn file_values_are_merged_with_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "nacl.toml", ROCK_SALT);
        let config = build_config(&path, &AnalysisOverrides::default()).unwrap();

        assert_eq!(config.crystal.name(), "NaCl");
        assert_eq!(config.crystal.site_count(), 2);
        assert_eq!(config.crystal.cell().crystal_system(), CrystalSystem::Cubic);
        assert!((config.crystal.cell().volume() - 5.64f64.powi(3)).abs() < 1e-9);

        assert_eq!(config.analysis.d_min, 2.0);
        assert_eq!(config.analysis.contact_cutoff, 3.5);
        assert!(config.analysis.include_friedel_mates);
    }

    #[test]
    fn cli_overrides_take_precedence_over_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "nacl.toml", ROCK_SALT);
        let overrides = AnalysisOverrides {
            d_min: Some(0.9),
            contact_cutoff: Some(3.0),
            include_friedel_mates: Some(false),
            set_values: Vec::new(),
        };
        let config = build_config(&path, &overrides).unwrap();

        assert_eq!(config.analysis.d_min, 0.9);
        assert_eq!(config.analysis.contact_cutoff, 3.0);
        assert!(!config.analysis.include_friedel_mates);
    }

    #[test]
    fn set_values_override_file_entries() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "nacl.toml", ROCK_SALT);
        let overrides = AnalysisOverrides {
            set_values: vec![
                "analysis.d-min=1.25".to_string(),
                "analysis.include-friedel-mates=false".to_string(),
                "name=halite".to_string(),
            ],
            ..Default::default()
        };
        let config = build_config(&path, &overrides).unwrap();

        assert_eq!(config.analysis.d_min, 1.25);
        assert!(!config.analysis.include_friedel_mates);
        assert_eq!(config.crystal.name(), "halite");
    }

    #[test]
    fn cli_override_wins_over_set_value() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "nacl.toml", ROCK_SALT);
        let overrides = AnalysisOverrides {
            d_min: Some(0.7),
            set_values: vec!["analysis.d-min=1.25".to_string()],
            ..Default::default()
        };
        let config = build_config(&path, &overrides).unwrap();
        assert_eq!(config.analysis.d_min, 0.7);
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "nacl.toml", ROCK_SALT);
        for bad in ["analysis.d-min", "analysis.d-min=fast", "cell.a=3.0"] {
            let overrides = AnalysisOverrides {
                set_values: vec![bad.to_string()],
                ..Default::default()
            };
            let result = build_config(&path, &overrides);
            assert!(matches!(result, Err(CliError::Config(_))), "{bad}");
        }
    }

    #[test]
    fn missing_cell_table_returns_error() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "empty.toml", "name = \"nothing\"\n");
        let result = build_config(&path, &AnalysisOverrides::default());
        assert!(matches!(result, Err(CliError::Config(msg)) if msg.contains("[cell]")));
    }

    #[test]
    fn unknown_keys_surface_as_parse_errors() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "typo.toml", "[cell]\na = 4.0\nalhpa = 90.0\n");
        let result = build_config(&path, &AnalysisOverrides::default());
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn unclassifiable_cell_returns_lattice_error() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            "bad.toml",
            "[cell]\na = 4.0\nb = 4.0\nc = 5.0\nalpha = 90.0\nbeta = 90.0\ngamma = 100.0\n",
        );
        let result = build_config(&path, &AnalysisOverrides::default());
        assert!(matches!(result, Err(CliError::Lattice(_))));
    }

    #[test]
    fn duplicate_site_labels_return_crystal_error() {
        let dir = tempdir().unwrap();
        let content = r#"
            [cell]
            a = 5.64

            [[sites]]
            label = "Na1"
            element = "Na"
            position = [0.0, 0.0, 0.0]

            [[sites]]
            label = "Na1"
            element = "Na"
            position = [0.5, 0.5, 0.0]
            "#;
        let path = write_config_file(&dir, "dup.toml", content);
        let result = build_config(&path, &AnalysisOverrides::default());
        assert!(matches!(
            result,
            Err(CliError::Crystal(CrystalError::DuplicateLabel(label))) if label == "Na1"
        ));
    }

    #[test]
    fn non_positive_d_min_is_a_config_error() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "nacl.toml", ROCK_SALT);
        let overrides = AnalysisOverrides {
            d_min: Some(0.0),
            ..Default::default()
        };
        let result = build_config(&path, &overrides);
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = build_config(&dir.path().join("absent.toml"), &AnalysisOverrides::default());
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
