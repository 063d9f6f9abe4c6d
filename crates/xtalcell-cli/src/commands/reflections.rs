use crate::cli::ReflectionsArgs;
use crate::config::{AnalysisOverrides, build_config};
use crate::error::Result;
use tracing::{info, warn};
use xtalcell::core::io::reflections::{write_reflections, write_reflections_to_path};
use xtalcell::workflows::reflections::expected_reflections;

pub fn run(args: ReflectionsArgs) -> Result<()> {
    let overrides = AnalysisOverrides {
        d_min: args.d_min,
        include_friedel_mates: args.friedel_mates.choice(),
        set_values: args.set_values.clone(),
        ..Default::default()
    };
    let config = build_config(&args.config, &overrides)?;

    info!("Invoking the reflection enumeration workflow...");
    let list = expected_reflections(config.crystal.cell(), &config.analysis)?;

    if list.is_empty() {
        warn!(
            d_min = list.d_min,
            "No reflections lie above the d-spacing limit."
        );
    }

    match &args.output {
        Some(path) => {
            info!("Writing {} reflection(s) to {:?}", list.len(), path);
            write_reflections_to_path(path, &list.planes)?;
            println!(
                "{} reflection(s) with d >= {} Å written to: {}",
                list.len(),
                list.d_min,
                path.display()
            );
        }
        None => write_reflections(std::io::stdout().lock(), &list.planes)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;
    use xtalcell::core::io::reflections::read_reflections_from_path;

    #[test]
    fn reflections_are_written_to_csv() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("si.toml");
        fs::write(&config_path, "name = \"Si\"\n\n[cell]\na = 5.43018\n").unwrap();
        let output_path = dir.path().join("si.csv");

        let cli = Cli::parse_from([
            "xtalcell",
            "reflections",
            "-c",
            config_path.to_str().unwrap(),
            "-o",
            output_path.to_str().unwrap(),
            "--d-min",
            "2.0",
            "--no-friedel-mates",
        ]);
        let Commands::Reflections(args) = cli.command else {
            panic!("Expected 'reflections' subcommand");
        };
        run(args).unwrap();

        let planes = read_reflections_from_path(&output_path).unwrap();
        assert_eq!(planes.len(), 40);
        assert_eq!(planes[0].indices(), [1, 0, 0]);
        assert!(planes.iter().all(|p| p.d_spacing.unwrap() >= 2.0));
    }

    #[test]
    fn friedel_flags_are_mutually_exclusive() {
        let result = Cli::try_parse_from([
            "xtalcell",
            "reflections",
            "-c",
            "si.toml",
            "--with-friedel-mates",
            "--no-friedel-mates",
        ]);
        assert!(result.is_err());
    }
}
