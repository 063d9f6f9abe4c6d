use crate::cli::ContactsArgs;
use crate::config::{AnalysisOverrides, build_config};
use crate::error::Result;
use tracing::{info, warn};
use xtalcell::workflows::geometry::{Contact, find_contacts};

pub fn run(args: ContactsArgs) -> Result<()> {
    let overrides = AnalysisOverrides {
        contact_cutoff: args.cutoff,
        set_values: args.set_values.clone(),
        ..Default::default()
    };
    let config = build_config(&args.config, &overrides)?;

    if config.crystal.site_count() < 2 {
        warn!("Fewer than two sites defined; no contacts can be found.");
    }

    info!("Invoking the contact search workflow...");
    let contacts = find_contacts(&config.crystal, &config.analysis)?;
    print!("{}", render_contacts(&contacts));
    println!(
        "{} contact(s) within {} Å.",
        contacts.len(),
        config.analysis.contact_cutoff
    );
    Ok(())
}

fn render_contacts(contacts: &[Contact]) -> String {
    contacts
        .iter()
        .map(|c| {
            format!(
                "{:<8} {:<8} {:>10.4}  [{:>2} {:>2} {:>2}]\n",
                c.from, c.to, c.distance, c.translation[0], c.translation[1], c.translation[2]
            )
        })
        .collect()
}
