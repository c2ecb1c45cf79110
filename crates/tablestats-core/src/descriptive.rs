//! Sorted-column descriptive helpers: medians, interpolated quantiles and
//! quantile ranks.

use crate::errors::{StatsError, StatsResult};

/// Linearly interpolated `phi`-quantile of pre-sorted data.
///
/// The break sits at fractional index `phi · (n - 1)` and interpolates
/// between the two neighbouring order statistics.
pub fn quantile(sorted: &[f64], phi: f64) -> StatsResult<f64> {
    if !(0.0..=1.0).contains(&phi) {
        return Err(StatsError::Domain(format!(
            "the quantile fraction must lie in [0, 1], got {phi}"
        )));
    }
    if sorted.is_empty() {
        return Err(StatsError::Configuration(
            "no observations to take a quantile of".into(),
        ));
    }
    let n = sorted.len();
    if n == 1 {
        return Ok(sorted[0]);
    }
    let index = phi * (n - 1) as f64;
    let lhs = index.floor() as usize;
    if lhs >= n - 1 {
        return Ok(sorted[n - 1]);
    }
    let delta = index - lhs as f64;
    Ok((1.0 - delta) * sorted[lhs] + delta * sorted[lhs + 1])
}

/// Median of pre-sorted data.
pub fn median(sorted: &[f64]) -> StatsResult<f64> {
    quantile(sorted, 0.5)
}

/// Interpolated fraction of values that are less than or equal to `x`.
///
/// The inverse of `quantile`: values outside the data range clamp to 0 or 1,
/// values strictly between two data points interpolate linearly.
pub fn quantile_rank(sorted: &[f64], x: f64) -> StatsResult<f64> {
    if x.is_nan() {
        return Err(StatsError::Domain("cannot rank NaN".into()));
    }
    if sorted.is_empty() {
        return Err(StatsError::Configuration(
            "no observations to rank against".into(),
        ));
    }
    Ok(rank_interpolated(sorted, x) / sorted.len() as f64)
}

fn rank_interpolated(sorted: &[f64], x: f64) -> f64 {
    match sorted.binary_search_by(|v| v.partial_cmp(&x).unwrap_or(std::cmp::Ordering::Less)) {
        Ok(mut i) => {
            // count every duplicate of x
            while i + 1 < sorted.len() && sorted[i + 1] == x {
                i += 1;
            }
            (i + 1) as f64
        }
        Err(insertion) => {
            if insertion == 0 || insertion == sorted.len() {
                return insertion as f64;
            }
            let from = sorted[insertion - 1];
            let to = sorted[insertion];
            insertion as f64 + (x - from) / (to - from)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_median_odd_and_even() {
        assert_relative_eq!(median(&[1.0, 2.0, 9.0]).unwrap(), 2.0);
        assert_relative_eq!(median(&[1.0, 2.0, 3.0, 9.0]).unwrap(), 2.5);
        assert_relative_eq!(median(&[4.0]).unwrap(), 4.0);
    }

    #[test]
    fn test_quantile_interpolation() {
        let data = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_relative_eq!(quantile(&data, 0.0).unwrap(), 10.0);
        assert_relative_eq!(quantile(&data, 1.0).unwrap(), 50.0);
        assert_relative_eq!(quantile(&data, 0.25).unwrap(), 20.0);
        // 0.1 · 4 = 0.4 lands between the first two order statistics
        assert_relative_eq!(quantile(&data, 0.1).unwrap(), 14.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quantile_rejects_bad_fraction() {
        assert!(matches!(
            quantile(&[1.0], 1.5),
            Err(StatsError::Domain(_))
        ));
        assert!(matches!(
            quantile(&[], 0.5),
            Err(StatsError::Configuration(_))
        ));
    }

    #[test]
    fn test_quantile_rank() {
        let data = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile_rank(&data, 2.0).unwrap(), 0.5);
        // halfway between 2 and 3
        assert_relative_eq!(quantile_rank(&data, 2.5).unwrap(), 0.625);
        assert_relative_eq!(quantile_rank(&data, 0.0).unwrap(), 0.0);
        assert_relative_eq!(quantile_rank(&data, 9.0).unwrap(), 1.0);
    }

    #[test]
    fn test_quantile_rank_counts_duplicates() {
        let data = [1.0, 2.0, 2.0, 2.0, 5.0];
        assert_relative_eq!(quantile_rank(&data, 2.0).unwrap(), 0.8);
    }
}
