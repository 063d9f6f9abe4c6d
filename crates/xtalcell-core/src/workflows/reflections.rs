use super::config::{AnalysisConfig, ConfigError};
use super::error::WorkflowError;
use crate::core::cell::UnitCell;
use crate::core::error::LatticeError;
use crate::core::maths::LinearAlgebra;
use crate::core::models::miller::MillerPlane;
use itertools::iproduct;
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Relative slack when comparing a d-spacing against the limit.
const D_MIN_SLACK: f64 = 1e-12;

/// Largest index box, counted as `(2h+1)(2k+1)(2l+1)`, that
/// [`expected_reflections`] will enumerate.
pub const MAX_REFLECTION_CANDIDATES: u64 = 10_000_000;

#[derive(Debug, Clone, PartialEq)]
pub struct ReflectionList {
    pub d_min: f64,
    /// Largest |h|, |k|, |l| searched.
    pub max_indices: [i32; 3],
    /// Planes sorted by decreasing d-spacing.
    pub planes: Vec<MillerPlane>,
}

impl ReflectionList {
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }
}

/// Returns `true` for the member of a Friedel pair whose first non-zero index is positive.
pub fn is_friedel_representative(indices: [i32; 3]) -> bool {
    indices
        .iter()
        .find(|&&i| i != 0)
        .is_some_and(|&first| first > 0)
}

fn candidate_box_size(max_indices: [i32; 3]) -> u64 {
    max_indices
        .iter()
        .map(|&i| 2 * u64::from(i.unsigned_abs()) + 1)
        .fold(1u64, u64::saturating_mul)
}

type PlaneResult = Result<Option<MillerPlane>, LatticeError>;

/// Enumerates every reflection with `d ≥ d_min`.
///
/// Each plane has its d-spacing and an "h k l" label filled in. Ties in
/// d-spacing are broken by descending indices so the order is deterministic.
///
/// # Errors
///
/// Returns [`WorkflowError::Config`] if the index box for `d_min` holds more
/// than [`MAX_REFLECTION_CANDIDATES`] entries, and [`WorkflowError::Lattice`]
/// if `d_min` is not a positive finite number.
#[instrument(skip_all, name = "reflection_enumeration")]
pub fn expected_reflections<M: LinearAlgebra>(
    cell: &UnitCell<M>,
    config: &AnalysisConfig,
) -> Result<ReflectionList, WorkflowError> {
    let d_min = config.d_min;
    let max_indices = cell.max_miller_index(d_min)?.indices();
    let [h_max, k_max, l_max] = max_indices;
    info!(d_min, ?max_indices, "Enumerating reflections.");

    let box_size = candidate_box_size(max_indices);
    if box_size > MAX_REFLECTION_CANDIDATES {
        return Err(ConfigError::InvalidValue {
            parameter: "d_min",
            reason: format!(
                "{d_min} Å needs an index box of {box_size} planes, above the limit of {MAX_REFLECTION_CANDIDATES}"
            ),
        }
        .into());
    }

    let candidates: Vec<[i32; 3]> = iproduct!(-h_max..=h_max, -k_max..=k_max, -l_max..=l_max)
        .map(|(h, k, l)| [h, k, l])
        .filter(|&hkl| hkl != [0, 0, 0])
        .filter(|&hkl| config.include_friedel_mates || is_friedel_representative(hkl))
        .collect();
    debug!(candidates = candidates.len(), "Candidate planes generated.");

    #[cfg(not(feature = "parallel"))]
    let iterator = candidates.iter();

    #[cfg(feature = "parallel")]
    let iterator = candidates.par_iter();

    let results: Vec<PlaneResult> = iterator
        .map(|&[h, k, l]| -> PlaneResult {
            let d = cell.calculate_d_spacing(&MillerPlane::new(h, k, l))?;
            Ok((d >= d_min * (1.0 - D_MIN_SLACK))
                .then(|| MillerPlane::with_d_spacing(h, k, l, d, &format!("{h} {k} {l}"))))
        })
        .collect();

    let mut planes = Vec::with_capacity(results.len());
    for result in results {
        if let Some(plane) = result? {
            planes.push(plane);
        }
    }
    planes.sort_by(|a, b| {
        b.d_spacing
            .unwrap_or_default()
            .total_cmp(&a.d_spacing.unwrap_or_default())
            .then_with(|| b.indices().cmp(&a.indices()))
    });

    info!(reflections = planes.len(), "Reflection enumeration finished.");
    Ok(ReflectionList {
        d_min,
        max_indices,
        planes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::lattice::Lattice;
    use crate::workflows::config::AnalysisConfigBuilder;

    fn config(d_min: f64, include_friedel_mates: bool) -> AnalysisConfig {
        AnalysisConfigBuilder::new()
            .d_min(d_min)
            .contact_cutoff(3.0)
            .include_friedel_mates(include_friedel_mates)
            .build()
            .unwrap()
    }

    fn silicon() -> UnitCell {
        UnitCell::new(&Lattice::new(5.43018, 5.43018, 5.43018, 90.0, 90.0, 90.0)).unwrap()
    }

    #[test]
    fn cubic_reflections_down_to_two_angstrom() {
        let list = expected_reflections(&silicon(), &config(2.0, true)).unwrap();
        assert_eq!(list.max_indices, [2, 2, 2]);
        // h² + k² + l² ≤ 7 in a ±2 box: 6 + 12 + 8 + 6 + 24 + 24.
        assert_eq!(list.len(), 80);
        assert!(list.planes.iter().all(|p| p.d_spacing.unwrap() >= 2.0));

        let first = &list.planes[0];
        assert!((first.d_spacing.unwrap() - 5.43018).abs() < 1e-12);
        assert_eq!(first.indices(), [1, 0, 0]);
        assert_eq!(first.label, "1 0 0");
    }

    #[test]
    fn planes_are_sorted_by_decreasing_d_spacing() {
        let list = expected_reflections(&silicon(), &config(1.2, true)).unwrap();
        for pair in list.planes.windows(2) {
            assert!(pair[0].d_spacing.unwrap() >= pair[1].d_spacing.unwrap());
        }
    }

    #[test]
    fn friedel_mates_can_be_dropped() {
        let with_mates = expected_reflections(&silicon(), &config(2.0, true)).unwrap();
        let without = expected_reflections(&silicon(), &config(2.0, false)).unwrap();
        assert_eq!(without.len(), with_mates.len() / 2);
        assert!(without
            .planes
            .iter()
            .all(|p| is_friedel_representative(p.indices())));
    }

    #[test]
    fn representative_has_positive_first_nonzero_index() {
        assert!(is_friedel_representative([1, -2, 0]));
        assert!(is_friedel_representative([0, 0, 3]));
        assert!(!is_friedel_representative([0, -1, 5]));
        assert!(!is_friedel_representative([0, 0, 0]));
    }

    #[test]
    fn triclinic_enumeration_is_complete() {
        let cell = UnitCell::new(&Lattice::new(
            7.19196, 8.12720, 8.12771, 82.4809, 69.2610, 69.2584,
        ))
        .unwrap();
        let d_min = 1.8;
        let list = expected_reflections(&cell, &config(d_min, true)).unwrap();

        // Brute force over a box well beyond the bound.
        let reach = 8;
        let mut expected = 0;
        for (h, k, l) in iproduct!(-reach..=reach, -reach..=reach, -reach..=reach) {
            if (h, k, l) == (0, 0, 0) {
                continue;
            }
            let d = cell.calculate_d_spacing(&MillerPlane::new(h, k, l)).unwrap();
            if d >= d_min {
                expected += 1;
            }
        }
        assert_eq!(list.len(), expected);
    }

    #[test]
    fn coarse_limit_yields_no_reflections() {
        let list = expected_reflections(&silicon(), &config(10.0, true)).unwrap();
        assert_eq!(list.max_indices, [0, 0, 0]);
        assert!(list.is_empty());
    }

    #[test]
    fn oversized_index_box_is_rejected() {
        let result = expected_reflections(&silicon(), &config(0.01, true));
        match result {
            Err(WorkflowError::Config {
                source: ConfigError::InvalidValue { parameter, .. },
            }) => assert_eq!(parameter, "d_min"),
            other => panic!("Expected an invalid d_min, got {other:?}"),
        }
    }

    #[test]
    fn box_size_counts_both_signs_and_zero() {
        assert_eq!(candidate_box_size([0, 0, 0]), 1);
        assert_eq!(candidate_box_size([2, 2, 2]), 125);
        assert_eq!(candidate_box_size([543, 543, 543]), 1087u64.pow(3));
        assert_eq!(candidate_box_size([i32::MAX; 3]), u64::MAX);
    }
}
