//! Ordinary least squares with coefficient-level inference.

use faer::Mat;

use crate::distributions;
use crate::errors::{StatsError, StatsResult};
use crate::linalg;

/// Full result bundle from an OLS fit.
///
/// The bundle is overwritten wholesale on each regression call; a failed fit
/// leaves the previous bundle untouched.
#[derive(Debug, Clone)]
pub struct Regression {
    /// Table indices of the selected variables; the first is the dependent.
    pub variables: Vec<usize>,
    /// Fitted coefficients, intercept first.
    pub coefficients: Vec<f64>,
    /// Standard error of each coefficient.
    pub std_errors: Vec<f64>,
    /// t statistic of each coefficient.
    pub t_stats: Vec<f64>,
    /// Two-tailed p-value of each coefficient.
    pub p_values: Vec<f64>,
    /// Total sum of squares.
    pub sst: f64,
    /// Regression sum of squares.
    pub ssr: f64,
    /// Error (residual) sum of squares.
    pub sse: f64,
    /// Total degrees of freedom, n - 1.
    pub df_total: usize,
    /// Regression degrees of freedom, one per independent variable.
    pub df_regression: usize,
    /// Error degrees of freedom.
    pub df_error: usize,
    /// Coefficient of determination.
    pub r_squared: f64,
    /// R-squared adjusted for the degrees of freedom.
    pub adj_r_squared: f64,
    /// F statistic for overall model significance.
    pub f_stat: f64,
    /// Right-tail p-value of the F statistic.
    pub f_p_value: f64,
    /// Standard error of the estimate, sqrt(SSE / dfError).
    pub std_err_estimate: f64,
}

/// Fit `y` on the given predictor columns with an intercept.
///
/// `variables` records which table columns the fit drew from (dependent
/// first) and is carried through into the result bundle unchanged.
pub fn fit_ols(
    y: &[f64],
    predictors: &[Vec<f64>],
    variables: Vec<usize>,
) -> StatsResult<Regression> {
    let n = y.len();
    let v = predictors.len() + 1; // columns of the design matrix, intercept included

    for (i, column) in predictors.iter().enumerate() {
        if column.len() != n {
            return Err(StatsError::Shape(format!(
                "predictor {i} has {} observations, the dependent has {n}",
                column.len()
            )));
        }
    }
    if n <= v {
        return Err(StatsError::Numeric(format!(
            "{n} observations cannot support a fit with {v} coefficients"
        )));
    }

    let x = design_matrix(n, predictors);
    let y_col = Mat::from_fn(n, 1, |i, _| y[i]);
    let coefficients = linalg::solve_least_squares(&x, &y_col)?;

    let mean_y = y.iter().sum::<f64>() / n as f64;
    let sst: f64 = y.iter().map(|yi| (yi - mean_y).powi(2)).sum();
    let mut sse = 0.0;
    for i in 0..n {
        let fitted: f64 = (0..v).map(|j| x[(i, j)] * coefficients[j]).sum();
        sse += (fitted - y[i]).powi(2);
    }
    let ssr = sst - sse;

    let df_total = n - 1;
    let df_regression = v - 1;
    let df_error = df_total - df_regression;

    let r_squared = 1.0 - sse / sst;
    let adj_r_squared = 1.0 - (1.0 - r_squared) * (df_total as f64 / df_error as f64);
    let f_stat = (ssr / df_regression as f64) / (sse / df_error as f64);
    let f_p_value = if f_stat.is_nan() {
        f64::NAN
    } else {
        distributions::p_value_for_f_stat(f_stat, df_regression as f64, df_error as f64)?
    };
    let std_err_estimate = (sse / df_error as f64).sqrt();

    // Coefficient-level inference from the diagonal of (XᵗX)⁻¹.
    let xtx = x.transpose() * x.as_ref();
    let xtx_inv = linalg::invert(&xtx)?;
    let mse = sse / df_error as f64;
    let mut std_errors = Vec::with_capacity(v);
    let mut t_stats = Vec::with_capacity(v);
    let mut p_values = Vec::with_capacity(v);
    for j in 0..v {
        let se = (mse * xtx_inv[(j, j)]).sqrt();
        let t = coefficients[j] / se;
        std_errors.push(se);
        t_stats.push(t);
        p_values.push(distributions::p_value_for_t_stat(t, df_error as f64)?);
    }

    Ok(Regression {
        variables,
        coefficients,
        std_errors,
        t_stats,
        p_values,
        sst,
        ssr,
        sse,
        df_total,
        df_regression,
        df_error,
        r_squared,
        adj_r_squared,
        f_stat,
        f_p_value,
        std_err_estimate,
    })
}

/// Coefficient-only fit of `y` against the synthetic time index 0..n-1.
/// Returns `(intercept, slope)`; none of the inferential statistics are
/// computed on this path.
pub(crate) fn solve_trend(y: &[f64]) -> StatsResult<(f64, f64)> {
    let n = y.len();
    let x = Mat::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { i as f64 });
    let y_col = Mat::from_fn(n, 1, |i, _| y[i]);
    let beta = linalg::solve_least_squares(&x, &y_col)?;
    Ok((beta[0], beta[1]))
}

fn design_matrix(n: usize, predictors: &[Vec<f64>]) -> Mat<f64> {
    Mat::from_fn(n, predictors.len() + 1, |i, j| {
        if j == 0 {
            1.0
        } else {
            predictors[j - 1][i]
        }
    })
}
