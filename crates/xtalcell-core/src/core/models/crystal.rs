use super::elements::{AMU_PER_CUBIC_ANGSTROM_IN_G_PER_CM3, atomic_mass};
use super::ids::SiteId;
use crate::core::cell::UnitCell;
use crate::core::error::LatticeError;
use slotmap::SlotMap;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CrystalError {
    #[error("A site labelled '{0}' already exists")]
    DuplicateLabel(String),
    #[error("Site '{label}' has occupancy {occupancy}, expected a value in (0, 1]")]
    InvalidOccupancy { label: String, occupancy: f64 },
    #[error("Site '{label}' has a non-finite fractional coordinate")]
    InvalidPosition { label: String },
    #[error("No site labelled '{0}'")]
    UnknownLabel(String),
    #[error("Site '{label}' has element '{element}', which has no known atomic mass")]
    UnknownElement { label: String, element: String },
    #[error(transparent)]
    Lattice(#[from] LatticeError),
}

/// An atomic site in fractional coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub label: String,
    pub element: String,
    pub position: [f64; 3],
    pub occupancy: f64,
}

impl Site {
    /// Creates a fully occupied site.
    pub fn new(label: &str, element: &str, position: [f64; 3]) -> Self {
        Self {
            label: label.to_string(),
            element: element.to_string(),
            position,
            occupancy: 1.0,
        }
    }

    pub fn with_occupancy(mut self, occupancy: f64) -> Self {
        self.occupancy = occupancy;
        self
    }

    /// The position translated into the reference cell, each coordinate in [0, 1).
    pub fn wrapped_position(&self) -> [f64; 3] {
        self.position.map(|x| {
            let wrapped = x - x.floor();
            if wrapped >= 1.0 { 0.0 } else { wrapped }
        })
    }

    fn validate(&self) -> Result<(), CrystalError> {
        if !(self.occupancy > 0.0 && self.occupancy <= 1.0) {
            return Err(CrystalError::InvalidOccupancy {
                label: self.label.clone(),
                occupancy: self.occupancy,
            });
        }
        if !self.position.iter().all(|x| x.is_finite()) {
            return Err(CrystalError::InvalidPosition {
                label: self.label.clone(),
            });
        }
        Ok(())
    }
}

/// A unit cell and the sites it contains.
///
/// Site labels are unique within a crystal.
#[derive(Debug, Clone)]
pub struct Crystal {
    name: String,
    cell: UnitCell,
    sites: SlotMap<SiteId, Site>,
    label_map: HashMap<String, SiteId>,
}

impl Crystal {
    pub fn new(name: &str, cell: UnitCell) -> Self {
        Self {
            name: name.to_string(),
            cell,
            sites: SlotMap::with_key(),
            label_map: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cell(&self) -> &UnitCell {
        &self.cell
    }

    /// Adds a site, returning its ID.
    ///
    /// # Errors
    ///
    /// Fails if the label is already taken, the occupancy lies outside (0, 1],
    /// or a coordinate is not finite.
    pub fn add_site(&mut self, site: Site) -> Result<SiteId, CrystalError> {
        site.validate()?;
        if self.label_map.contains_key(&site.label) {
            return Err(CrystalError::DuplicateLabel(site.label));
        }
        let label = site.label.clone();
        let id = self.sites.insert(site);
        self.label_map.insert(label, id);
        Ok(id)
    }

    pub fn remove_site(&mut self, id: SiteId) -> Option<Site> {
        let site = self.sites.remove(id)?;
        self.label_map.remove(&site.label);
        Some(site)
    }

    pub fn site(&self, id: SiteId) -> Option<&Site> {
        self.sites.get(id)
    }

    pub fn site_id_by_label(&self, label: &str) -> Option<SiteId> {
        self.label_map.get(label).copied()
    }

    pub fn sites_iter(&self) -> impl Iterator<Item = (SiteId, &Site)> {
        self.sites.iter()
    }

    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Distance between two labelled sites as given, without periodic images.
    pub fn distance_between(&self, label1: &str, label2: &str) -> Result<f64, CrystalError> {
        let first = self.site_by_label(label1)?;
        let second = self.site_by_label(label2)?;
        Ok(self
            .cell
            .calculate_distance(&first.position, &second.position)?)
    }

    fn site_by_label(&self, label: &str) -> Result<&Site, CrystalError> {
        self.site_id_by_label(label)
            .and_then(|id| self.sites.get(id))
            .ok_or_else(|| CrystalError::UnknownLabel(label.to_string()))
    }

    /// Chemical formula weighted by occupancy, elements in alphabetical order.
    ///
    /// A count of one is omitted and fractional counts keep up to three decimals.
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&str, f64> = BTreeMap::new();
        for site in self.sites.values() {
            *counts.entry(site.element.as_str()).or_insert(0.0) += site.occupancy;
        }
        counts
            .into_iter()
            .map(|(element, count)| {
                if (count - 1.0).abs() < 1e-6 {
                    element.to_string()
                } else if (count - count.round()).abs() < 1e-6 {
                    format!("{element}{}", count.round() as i64)
                } else {
                    let text = format!("{count:.3}");
                    format!("{element}{}", text.trim_end_matches('0'))
                }
            })
            .collect()
    }

    /// Cell volume divided by the number of sites, or `None` for an empty crystal.
    pub fn volume_per_site(&self) -> Option<f64> {
        (!self.sites.is_empty()).then(|| self.cell.volume() / self.sites.len() as f64)
    }

    /// Mass of the cell contents in atomic mass units, weighted by occupancy.
    pub fn cell_mass(&self) -> Result<f64, CrystalError> {
        self.sites.values().try_fold(0.0, |total, site| {
            let mass = atomic_mass(&site.element).ok_or_else(|| CrystalError::UnknownElement {
                label: site.label.clone(),
                element: site.element.clone(),
            })?;
            Ok(total + site.occupancy * mass)
        })
    }

    /// Density in g/cm³. An empty crystal has zero density.
    pub fn density(&self) -> Result<f64, CrystalError> {
        Ok(self.cell_mass()? * AMU_PER_CUBIC_ANGSTROM_IN_G_PER_CM3 / self.cell.volume())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::lattice::Lattice;

    fn rock_salt() -> Crystal {
        let cell = UnitCell::new(&Lattice::new(5.64, 5.64, 5.64, 90.0, 90.0, 90.0)).unwrap();
        let mut crystal = Crystal::new("NaCl", cell);
        for (i, position) in [
            [0.0, 0.0, 0.0],
            [0.5, 0.5, 0.0],
            [0.5, 0.0, 0.5],
            [0.0, 0.5, 0.5],
        ]
        .into_iter()
        .enumerate()
        {
            crystal
                .add_site(Site::new(&format!("Na{}", i + 1), "Na", position))
                .unwrap();
            let shifted = position.map(|x| x + 0.5);
            crystal
                .add_site(Site::new(&format!("Cl{}", i + 1), "Cl", shifted))
                .unwrap();
        }
        crystal
    }

    #[test]
    fn formula_counts_each_element() {
        assert_eq!(rock_salt().formula(), "Cl4Na4");
    }

    #[test]
    fn formula_weights_by_occupancy() {
        let cell = UnitCell::new(&Lattice::new(3.0, 3.0, 3.0, 90.0, 90.0, 90.0)).unwrap();
        let mut crystal = Crystal::new("alloy", cell);
        crystal.add_site(Site::new("Fe1", "Fe", [0.0; 3])).unwrap();
        crystal
            .add_site(Site::new("Ni1", "Ni", [0.5; 3]).with_occupancy(0.25))
            .unwrap();
        crystal
            .add_site(Site::new("Co1", "Co", [0.5; 3]).with_occupancy(0.75))
            .unwrap();
        assert_eq!(crystal.formula(), "Co0.75FeNi0.25");
    }

    #[test]
    fn volume_per_site_divides_cell_volume() {
        let crystal = rock_salt();
        let expected = 5.64f64.powi(3) / 8.0;
        assert!((crystal.volume_per_site().unwrap() - expected).abs() < 1e-9);

        let empty = Crystal::new("empty", crystal.cell().clone());
        assert!(empty.is_empty());
        assert_eq!(empty.volume_per_site(), None);
    }

    #[test]
    fn rock_salt_density() {
        let density = rock_salt().density().unwrap();
        assert!((density - 2.16362).abs() < 1e-4, "{density}");
    }

    #[test]
    fn silicon_density() {
        let cell =
            UnitCell::new(&Lattice::new(5.43018, 5.43018, 5.43018, 90.0, 90.0, 90.0)).unwrap();
        let mut crystal = Crystal::new("Si", cell);
        let fcc = [[0.0, 0.0, 0.0], [0.5, 0.5, 0.0], [0.5, 0.0, 0.5], [0.0, 0.5, 0.5]];
        for (i, position) in fcc.into_iter().enumerate() {
            crystal
                .add_site(Site::new(&format!("Si{}", 2 * i + 1), "Si", position))
                .unwrap();
            let shifted = position.map(|x| x + 0.25);
            crystal
                .add_site(Site::new(&format!("Si{}", 2 * i + 2), "Si", shifted))
                .unwrap();
        }
        let density = crystal.density().unwrap();
        assert!((density - 2.33008).abs() < 1e-4, "{density}");
    }

    #[test]
    fn density_weights_by_occupancy() {
        let cell = UnitCell::new(&Lattice::new(3.0, 3.0, 3.0, 90.0, 90.0, 90.0)).unwrap();
        let mut crystal = Crystal::new("FeNi", cell);
        crystal
            .add_site(Site::new("Fe1", "Fe", [0.0; 3]).with_occupancy(0.5))
            .unwrap();
        crystal
            .add_site(Site::new("Ni1", "Ni", [0.0; 3]).with_occupancy(0.5))
            .unwrap();
        assert!((crystal.cell_mass().unwrap() - 57.269).abs() < 1e-9);
        assert!((crystal.density().unwrap() - 3.52213).abs() < 1e-4);
    }

    #[test]
    fn density_needs_known_elements() {
        let mut crystal = rock_salt();
        crystal.add_site(Site::new("Q1", "Qq", [0.25; 3])).unwrap();
        assert_eq!(
            crystal.density(),
            Err(CrystalError::UnknownElement {
                label: "Q1".to_string(),
                element: "Qq".to_string(),
            })
        );

        let empty = Crystal::new("empty", crystal.cell().clone());
        assert_eq!(empty.density(), Ok(0.0));
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let mut crystal = rock_salt();
        let result = crystal.add_site(Site::new("Na1", "Na", [0.1, 0.1, 0.1]));
        assert_eq!(result, Err(CrystalError::DuplicateLabel("Na1".to_string())));
        assert_eq!(crystal.site_count(), 8);
    }

    #[test]
    fn invalid_sites_are_rejected() {
        let mut crystal = rock_salt();
        assert!(matches!(
            crystal.add_site(Site::new("X", "O", [0.0; 3]).with_occupancy(0.0)),
            Err(CrystalError::InvalidOccupancy { .. })
        ));
        assert!(matches!(
            crystal.add_site(Site::new("Y", "O", [f64::NAN, 0.0, 0.0])),
            Err(CrystalError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn removing_a_site_frees_its_label() {
        let mut crystal = rock_salt();
        let id = crystal.site_id_by_label("Cl2").unwrap();
        let removed = crystal.remove_site(id).unwrap();
        assert_eq!(removed.element, "Cl");
        assert!(crystal.site(id).is_none());
        assert!(crystal.site_id_by_label("Cl2").is_none());
        assert!(crystal.add_site(removed).is_ok());
    }

    #[test]
    fn distance_between_labelled_sites() {
        let crystal = rock_salt();
        let d = crystal.distance_between("Na1", "Na2").unwrap();
        assert!((d - 5.64 / 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(
            crystal.distance_between("Na1", "K1"),
            Err(CrystalError::UnknownLabel("K1".to_string()))
        );
    }

    #[test]
    fn wrapped_position_lies_in_the_reference_cell() {
        let site = Site::new("O1", "O", [1.25, -0.25, 2.0]);
        let wrapped = site.wrapped_position();
        assert!((wrapped[0] - 0.25).abs() < 1e-12);
        assert!((wrapped[1] - 0.75).abs() < 1e-12);
        assert_eq!(wrapped[2], 0.0);
    }
}
