//! Thin wrappers around the dense linear-algebra backend.
//!
//! Everything else in the crate talks in terms of these helpers and plain
//! `f64` buffers, so the backend choice never leaks into the public API.

use faer::prelude::*;
use faer::Mat;

use crate::errors::{StatsError, StatsResult};

/// Rank check on the `R` factor of a column-pivoted QR decomposition.
///
/// With column pivoting the leading diagonal entry has the largest
/// magnitude, so the remaining diagonal entries are compared against it. An
/// exactly rank-deficient system can still solve to finite (but
/// meaningless) values, so scanning the solution alone is not enough.
fn is_full_rank(r: &Mat<f64>, ncols: usize) -> bool {
    let lead = r[(0, 0)].abs();
    if !lead.is_finite() || lead == 0.0 {
        return false;
    }
    let tol = lead * r.nrows().max(r.ncols()) as f64 * f64::EPSILON;
    (0..ncols).all(|j| {
        let d = r[(j, j)].abs();
        d.is_finite() && d > tol
    })
}

/// Least-squares solve of `X b = y` via column-pivoted QR.
///
/// `y` is an n×1 matrix; the returned coefficients have one entry per column
/// of `x`. A rank-deficient system surfaces as a `Numeric` error.
pub(crate) fn solve_least_squares(x: &Mat<f64>, y: &Mat<f64>) -> StatsResult<Vec<f64>> {
    let qr = x.col_piv_qr();
    if !is_full_rank(&qr.compute_r(), x.ncols()) {
        return Err(StatsError::Numeric(
            "design matrix is singular or rank-deficient".into(),
        ));
    }
    let beta = qr.solve_lstsq(y);
    let coefficients: Vec<f64> = (0..beta.nrows()).map(|i| beta[(i, 0)]).collect();
    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(StatsError::Numeric(
            "design matrix is singular or rank-deficient".into(),
        ));
    }
    Ok(coefficients)
}

/// Dense inverse of a square matrix via LU solve against the identity.
/// Singularity is caught by the same rank-revealing QR check as the
/// least-squares path.
pub(crate) fn invert(m: &Mat<f64>) -> StatsResult<Mat<f64>> {
    debug_assert_eq!(m.nrows(), m.ncols());
    let n = m.nrows();
    if !is_full_rank(&m.col_piv_qr().compute_r(), n) {
        return Err(StatsError::Numeric(
            "matrix is singular or near-singular".into(),
        ));
    }
    let inverse = m.partial_piv_lu().solve(&Mat::<f64>::identity(n, n));
    for i in 0..n {
        for j in 0..n {
            if !inverse[(i, j)].is_finite() {
                return Err(StatsError::Numeric(
                    "matrix is singular or near-singular".into(),
                ));
            }
        }
    }
    Ok(inverse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solve_exact_system() {
        // x0 + x1 = 3, x0 + 2*x1 = 5 has the unique solution (1, 2)
        let x = Mat::from_fn(2, 2, |i, j| if j == 0 { 1.0 } else { (i + 1) as f64 });
        let y = Mat::from_fn(2, 1, |i, _| if i == 0 { 3.0 } else { 5.0 });

        let beta = solve_least_squares(&x, &y).unwrap();
        assert_relative_eq!(beta[0], 1.0, epsilon = 1e-10);
        assert_relative_eq!(beta[1], 2.0, epsilon = 1e-10);
    }

    #[test]
    fn test_invert_round_trip() {
        let m = Mat::from_fn(2, 2, |i, j| match (i, j) {
            (0, 0) => 4.0,
            (0, 1) => 7.0,
            (1, 0) => 2.0,
            (1, 1) => 6.0,
            _ => unreachable!(),
        });
        let inv = invert(&m).unwrap();
        let product = &m * &inv;
        for i in 0..2 {
            for j in 0..2 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(product[(i, j)], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_invert_singular() {
        let zeros = Mat::<f64>::zeros(2, 2);
        assert!(matches!(invert(&zeros), Err(StatsError::Numeric(_))));
        // rank-1 with finite entries must also be rejected
        let rank_one = Mat::from_fn(2, 2, |i, _| (i + 1) as f64);
        assert!(matches!(invert(&rank_one), Err(StatsError::Numeric(_))));
    }

    #[test]
    fn test_solve_rank_deficient_rejected() {
        // second column is a multiple of the first; the system still solves
        // to finite values, so the rank check has to catch it
        let x = Mat::from_fn(4, 2, |i, j| (i + 1) as f64 * (j + 1) as f64);
        let y = Mat::from_fn(4, 1, |i, _| i as f64);
        assert!(matches!(
            solve_least_squares(&x, &y),
            Err(StatsError::Numeric(_))
        ));
    }
}
