use super::config::AnalysisConfig;
use super::error::WorkflowError;
use crate::core::models::crystal::{Crystal, Site};
use itertools::{Itertools, iproduct};
use serde::Serialize;
use tracing::{debug, info, instrument};

/// Relative widening of the translation bounds.
const REACH_SLACK: f64 = 1e-9;

/// The shortest separation between two sites over their periodic images.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contact {
    pub from: String,
    pub to: String,
    /// Distance in Å.
    pub distance: f64,
    /// Lattice translation applied to the `to` site.
    pub translation: [i32; 3],
}

/// Lists every pair of sites whose nearest periodic image lies within the cutoff.
///
/// Positions are first wrapped into the reference cell. An image of the second
/// site within `cutoff` differs from the first site by at most `cutoff · |a*ᵢ|`
/// along fractional axis i, so only translations inside those bounds are
/// searched. Contacts are sorted by distance, then by label.
#[instrument(skip_all, name = "contact_search")]
pub fn find_contacts(
    crystal: &Crystal,
    config: &AnalysisConfig,
) -> Result<Vec<Contact>, WorkflowError> {
    let cutoff = config.contact_cutoff;
    info!(
        sites = crystal.site_count(),
        cutoff, "Searching for site contacts."
    );

    let reach = crystal
        .cell()
        .reciprocal_lattice()
        .lengths()
        .map(|star| cutoff * star * (1.0 + REACH_SLACK));
    debug!(?reach, "Fractional search reach per axis.");

    let sites: Vec<&Site> = crystal.sites_iter().map(|(_, site)| site).collect();
    let mut contacts = Vec::new();
    for (first, second) in sites.iter().tuple_combinations() {
        let Some((distance, translation)) = nearest_image(crystal, first, second, reach)? else {
            continue;
        };
        if distance <= cutoff {
            contacts.push(Contact {
                from: first.label.clone(),
                to: second.label.clone(),
                distance,
                translation,
            });
        }
    }

    contacts.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.from.cmp(&b.from))
            .then_with(|| a.to.cmp(&b.to))
    });
    info!(contacts = contacts.len(), "Contact search finished.");
    Ok(contacts)
}

/// Integer translations `t` with `|target + t - origin| <= reach` along one axis.
fn translation_bounds(origin: f64, target: f64, reach: f64) -> (i32, i32) {
    let offset = origin - target;
    ((offset - reach).ceil() as i32, (offset + reach).floor() as i32)
}

/// The closest image of `second` to `first` among the translations within
/// `reach`, or `None` if the bounds hold no translation.
fn nearest_image(
    crystal: &Crystal,
    first: &Site,
    second: &Site,
    reach: [f64; 3],
) -> Result<Option<(f64, [i32; 3])>, WorkflowError> {
    let origin = first.wrapped_position();
    let target = second.wrapped_position();
    let [(i_lo, i_hi), (j_lo, j_hi), (k_lo, k_hi)] =
        std::array::from_fn(|axis| translation_bounds(origin[axis], target[axis], reach[axis]));

    let mut best: Option<(f64, [i32; 3])> = None;
    for (i, j, k) in iproduct!(i_lo..=i_hi, j_lo..=j_hi, k_lo..=k_hi) {
        let image = [
            target[0] + f64::from(i),
            target[1] + f64::from(j),
            target[2] + f64::from(k),
        ];
        let distance = crystal.cell().calculate_distance(&origin, &image)?;
        if best.is_none_or(|(closest, _)| distance < closest) {
            best = Some((distance, [i, j, k]));
        }
    }
    Ok(best)
}
