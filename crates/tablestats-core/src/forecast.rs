//! Trend forecasting: linear, compound and continuous growth models fitted
//! against a synthetic time index.

use crate::errors::{StatsError, StatsResult};
use crate::regression;

/// Growth model used for a trend fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendModel {
    /// `Y = a + b·t`
    Linear,
    /// `Y = a·(1 + r)^t`
    Compound,
    /// `Y = a·e^(r·t)`
    Continuous,
}

/// Coefficients of the most recent trend fit.
///
/// Overwritten on each forecast call; a failed fit leaves the previous
/// coefficients untouched.
#[derive(Debug, Clone)]
pub struct Forecast {
    /// Which growth model produced these coefficients.
    pub model: TrendModel,
    /// Constant term `a`.
    pub constant: f64,
    /// Slope (linear) or growth rate `r`.
    pub rate: f64,
    /// Effective observation count at fit time.
    pub n_used: usize,
}

/// Fit the given model to `y`, where `y[i]` is the observation at time `i`
/// (most recent last). `y` must be non-empty.
///
/// With a single observation no trend can be estimated; the fit is skipped
/// and the coefficients are `(observed value, 0)`.
pub(crate) fn fit(model: TrendModel, y: &[f64]) -> StatsResult<Forecast> {
    let n = y.len();
    debug_assert!(n > 0);
    if n == 1 {
        return Ok(Forecast {
            model,
            constant: y[0],
            rate: 0.0,
            n_used: 1,
        });
    }
    match model {
        TrendModel::Linear => {
            let (intercept, slope) = regression::solve_trend(y)?;
            Ok(Forecast {
                model,
                constant: intercept,
                rate: slope,
                n_used: n,
            })
        }
        TrendModel::Compound | TrendModel::Continuous => {
            // Fit ln(Y) on t, then back-transform the coefficients.
            let logs = log_values(y)?;
            let (intercept, slope) = regression::solve_trend(&logs)?;
            let rate = if model == TrendModel::Compound {
                slope.exp() - 1.0
            } else {
                slope
            };
            Ok(Forecast {
                model,
                constant: intercept.exp(),
                rate,
                n_used: n,
            })
        }
    }
}

fn log_values(y: &[f64]) -> StatsResult<Vec<f64>> {
    y.iter()
        .map(|&value| {
            if value <= 0.0 {
                Err(StatsError::Domain(format!(
                    "compound and continuous trends require positive values, found {value}"
                )))
            } else {
                Ok(value.ln())
            }
        })
        .collect()
}

impl Forecast {
    /// Extrapolated value `horizon` periods past the last observation used
    /// in the fit. Time starts at zero, so the last observation sits at
    /// `n_used - 1` and the prediction is evaluated at
    /// `n_used + horizon - 1`. Negative horizons backcast.
    pub fn predict(&self, horizon: i64) -> f64 {
        let t = self.n_used as f64 + horizon as f64 - 1.0;
        match self.model {
            TrendModel::Linear => self.constant + self.rate * t,
            TrendModel::Compound => self.constant * (1.0 + self.rate).powf(t),
            TrendModel::Continuous => self.constant * (self.rate * t).exp(),
        }
    }
}
