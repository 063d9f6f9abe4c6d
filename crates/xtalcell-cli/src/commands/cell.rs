use crate::cli::{CellArgs, ReportFormat};
use crate::config::{AnalysisOverrides, build_config};
use crate::error::{CliError, Result};
use std::fmt::Write;
use tracing::{info, warn};
use xtalcell::core::models::crystal::Crystal;
use xtalcell::workflows::report::CellReport;

pub fn run(args: CellArgs) -> Result<()> {
    let config = build_config(&args.config, &AnalysisOverrides::default())?;
    let report = CellReport::from_cell(config.crystal.cell());
    info!("Rendering cell report as {:?}.", args.format);

    let rendered = match args.format {
        ReportFormat::Text => render_text(&config.crystal, &report),
        ReportFormat::Toml => toml::to_string(&report).map_err(|e| CliError::Other(e.into()))?,
    };
    print!("{}", rendered);
    Ok(())
}

fn render_matrix(out: &mut String, title: &str, rows: &[[f64; 3]; 3]) {
    let _ = writeln!(out, "{}:", title);
    for row in rows {
        let _ = writeln!(out, "  {:>14.8} {:>14.8} {:>14.8}", row[0], row[1], row[2]);
    }
}

fn render_text(crystal: &Crystal, report: &CellReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Crystal:            {}", crystal.name());
    if !crystal.is_empty() {
        let _ = writeln!(out, "Formula:            {}", crystal.formula());
    }
    let _ = writeln!(out, "Lattice:            {}", report.lattice);
    let _ = writeln!(out, "Reciprocal lattice: {}", report.reciprocal_lattice);
    let _ = writeln!(out, "Crystal system:     {}", report.crystal_system);
    let _ = writeln!(out, "Principal axis:     {}", report.principal_axis);
    let _ = writeln!(out, "Volume:             {:.6} Å³", report.volume);
    let _ = writeln!(out, "Reciprocal volume:  {:.8} Å⁻³", report.reciprocal_volume);
    if let Some(per_site) = crystal.volume_per_site() {
        let _ = writeln!(out, "Volume per site:    {:.6} Å³", per_site);
        match crystal.density() {
            Ok(density) => {
                let _ = writeln!(out, "Density:            {:.4} g/cm³", density);
            }
            Err(e) => warn!("Density not reported: {}", e),
        }
    }

    render_matrix(&mut out, "Metric tensor", &report.metric_tensor);
    render_matrix(
        &mut out,
        "Reciprocal metric tensor",
        &report.reciprocal_metric_tensor,
    );
    if let Some(ortho) = &report.orthogonalization_matrix {
        render_matrix(&mut out, "Orthogonalization matrix", ortho);
    }
    if let Some(frac) = &report.fractionalization_matrix {
        render_matrix(&mut out, "Fractionalization matrix", frac);
    }
    out
}
