//! Summaries of ensemble measurements.
//!
//! Every summarizer returns `None` for an empty list; callers are expected to
//! have checked their selections before measuring.

/// Smallest and largest value of a list.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Center and half-width of the interval spanned by the values.
///
/// Used for dihedral restraints: the center is the target angle and the
/// half-range the base tolerance.
pub fn midrange(values: &[f64]) -> Option<(f64, f64)> {
    let (lo, hi) = min_max(values)?;
    Some(((lo + hi) / 2.0, (hi - lo) / 2.0))
}

/// Mean with asymmetric bounds `(mean, mean - min, max - mean)`.
///
/// Used for distance restraints.
pub fn mean_bounds(values: &[f64]) -> Option<(f64, f64, f64)> {
    let (lo, hi) = min_max(values)?;
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    Some((mean, mean - lo, hi - mean))
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Omega angles below this value are shifted up by a full turn.
pub const OMEGA_WRAP_THRESHOLD: f64 = -90.0;

/// Removes the -180/180 wraparound from omega dihedrals.
///
/// Omega sits near 180 degrees, so an ensemble can straddle the boundary
/// and yield both -179 and 179. Shifting every value below -90 by +360 puts
/// them on one side before a midrange is taken. Only meaningful for omega.
pub fn fix_omega(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|&v| if v < OMEGA_WRAP_THRESHOLD { v + 360.0 } else { v })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    #[test]
    fn midrange_returns_center_and_half_range() {
        let (center, half) = midrange(&[10.0, 20.0, 30.0]).unwrap();
        assert!((center - 20.0).abs() < TOL);
        assert!((half - 10.0).abs() < TOL);
    }

    #[test]
    fn mean_bounds_returns_asymmetric_bounds() {
        let (mean, lower, upper) = mean_bounds(&[10.0, 20.0, 30.0]).unwrap();
        assert!((mean - 20.0).abs() < TOL);
        assert!((lower - 10.0).abs() < TOL);
        assert!((upper - 10.0).abs() < TOL);

        let (mean, lower, upper) = mean_bounds(&[1.0, 2.0, 6.0]).unwrap();
        assert!((mean - 3.0).abs() < TOL);
        assert!((lower - 2.0).abs() < TOL);
        assert!((upper - 3.0).abs() < TOL);
    }

    #[test]
    fn summaries_of_empty_lists_are_none() {
        assert_eq!(min_max(&[]), None);
        assert_eq!(midrange(&[]), None);
        assert_eq!(mean_bounds(&[]), None);
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn single_value_has_zero_spread() {
        assert_eq!(midrange(&[42.0]), Some((42.0, 0.0)));
        assert_eq!(mean_bounds(&[1.5]), Some((1.5, 0.0, 0.0)));
    }

    #[test]
    fn median_of_odd_and_even_lists() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn fix_omega_shifts_only_values_below_threshold() {
        assert_eq!(fix_omega(&[-170.0, 175.0]), vec![190.0, 175.0]);
        assert_eq!(fix_omega(&[-90.0, -5.0]), vec![-90.0, -5.0]);
    }

    #[test]
    fn fix_omega_makes_straddling_ensemble_contiguous() {
        let (center, half) = midrange(&fix_omega(&[-179.0, 179.0])).unwrap();
        assert!((center - 180.0).abs() < TOL);
        assert!((half - 1.0).abs() < TOL);
    }
}
