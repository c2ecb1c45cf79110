//! Moment & correlation cache: means, standard deviations, covariance and
//! correlation computed in one pass over the effective window.

use faer::MatRef;

/// One consistent bundle of cached moment statistics.
///
/// All four outputs are recomputed together from the same window submatrix,
/// so a reader can never observe a partially refreshed mix of old and new
/// values.
#[derive(Debug, Clone)]
pub(crate) struct Moments {
    pub means: Vec<f64>,
    pub std_devs: Vec<f64>,
    pub covariance: Vec<Vec<f64>>,
    pub correlation: Vec<Vec<f64>>,
}

impl Moments {
    /// Compute the bundle over `window` (rows = effective observations,
    /// columns = variables).
    ///
    /// The covariance divisor is `m - 1` when `bessel` is set and `m`
    /// otherwise. With a single row and the correction on, the divisor is
    /// zero and the standard deviations come out as NaN; the table layer
    /// documents that policy and gates the matrix accessors on `m >= 2`.
    pub(crate) fn compute(window: MatRef<'_, f64>, bessel: bool) -> Self {
        let m = window.nrows();
        let v = window.ncols();

        let mut means = vec![0.0; v];
        for j in 0..v {
            let mut sum = 0.0;
            for i in 0..m {
                sum += window[(i, j)];
            }
            means[j] = sum / m as f64;
        }

        // Raw cross-product matrix XᵗX, minus m times the outer product of
        // the means, gives the covariance numerator.
        let cross = window.transpose() * window;
        let divisor = if bessel { m as f64 - 1.0 } else { m as f64 };

        let mut covariance = vec![vec![0.0; v]; v];
        for i in 0..v {
            for j in 0..v {
                let centered = cross[(i, j)] - m as f64 * means[i] * means[j];
                covariance[i][j] = centered / divisor;
            }
        }

        let std_devs: Vec<f64> = (0..v).map(|i| covariance[i][i].sqrt()).collect();

        let mut correlation = vec![vec![0.0; v]; v];
        for i in 0..v {
            for j in 0..v {
                correlation[i][j] = covariance[i][j] / (std_devs[i] * std_devs[j]);
            }
        }

        Moments {
            means,
            std_devs,
            covariance,
            correlation,
        }
    }
}
