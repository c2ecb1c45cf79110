//! The statistical data table: a growable observation store with a
//! lazily-recomputed moment cache, regression and trend forecasting.

use faer::Mat;

use crate::descriptive;
use crate::errors::{StatsError, StatsResult};
use crate::forecast::{self, Forecast, TrendModel};
use crate::moments::Moments;
use crate::print;
use crate::regression::{self, Regression};

/// Rows added per capacity growth when a bulk append does not need more.
const GROWTH_INCREMENT: usize = 10;

/// A table of numeric observations, one row per observation and one column
/// per variable.
///
/// The variable count is fixed once established (by the first append, by
/// `create_empty`, or by `set_names` on a fresh table); every later append
/// must match it. Statistics, regressions and forecasts run over the
/// *effective window*: the most recent `min(n_obs, window)` observations, or
/// all of them when the window is 0.
///
/// Means and standard deviations are defined whenever the table holds at
/// least one observation. With Bessel's correction on (the default) and an
/// effective window of a single observation the variance divisor is zero and
/// the standard deviations report NaN; with the correction off they are 0.
/// Covariance and correlation matrices are unavailable (`None`) below two
/// effective observations or two variables.
///
/// The table is single-threaded by design: accessors that may recompute the
/// cache take `&mut self`, and a multi-threaded host must add its own
/// synchronization.
#[derive(Debug, Clone)]
pub struct StatsTable {
    nvars: usize,
    nobs: usize,
    /// Backing storage; the row count is the capacity, rows `0..nobs` are
    /// live.
    data: Mat<f64>,
    /// Most-recent-N window for statistics; 0 means use all observations.
    window: usize,
    names: Option<Vec<String>>,
    use_bessel: bool,
    data_changed: bool,
    correction_changed: bool,
    moments: Option<Moments>,
    regression: Option<Regression>,
    forecast: Option<Forecast>,
}

impl Default for StatsTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsTable {
    /// An empty table with no variable width established yet.
    pub fn new() -> Self {
        StatsTable {
            nvars: 0,
            nobs: 0,
            data: Mat::zeros(0, 0),
            window: 0,
            names: None,
            use_bessel: true,
            data_changed: true,
            correction_changed: false,
            moments: None,
            regression: None,
            forecast: None,
        }
    }

    /// An empty table expecting `nvars` values per observation.
    pub fn with_variables(nvars: usize) -> StatsResult<Self> {
        let mut table = StatsTable::new();
        table.create_empty(nvars)?;
        Ok(table)
    }

    /// A table pre-loaded from a rectangular dataset, one inner slice per
    /// observation.
    pub fn from_rows(rows: &[Vec<f64>]) -> StatsResult<Self> {
        let mut table = StatsTable::new();
        table.replace_data(rows)?;
        Ok(table)
    }

    /// Establish (or re-establish) a zero-row table with `nvars` variables.
    ///
    /// Fails if the table already holds data of a different width; with the
    /// same width the stored observations are discarded.
    pub fn create_empty(&mut self, nvars: usize) -> StatsResult<()> {
        if nvars == 0 {
            return Err(StatsError::Configuration(
                "a table must have at least one variable".into(),
            ));
        }
        if self.nobs > 0 && nvars != self.nvars {
            return Err(StatsError::Configuration(format!(
                "table already holds data with {} variables, cannot recreate it with {nvars}",
                self.nvars
            )));
        }
        self.nvars = nvars;
        self.nobs = 0;
        self.data = Mat::zeros(GROWTH_INCREMENT, nvars);
        self.data_changed = true;
        Ok(())
    }

    /// Append a single observation.
    pub fn add_row(&mut self, row: &[f64]) -> StatsResult<()> {
        let rows = [row.to_vec()];
        self.add_rows(&rows)
    }

    /// Append a batch of observations.
    ///
    /// The first-ever append establishes the variable count from the row
    /// width. The append is atomic: on any error the store is left
    /// unchanged.
    pub fn add_rows(&mut self, rows: &[Vec<f64>]) -> StatsResult<()> {
        let width = validate_rows(rows)?;
        if self.nvars > 0 && width != self.nvars {
            return Err(StatsError::Shape(format!(
                "observation width {width} does not match the {} variables of the table",
                self.nvars
            )));
        }

        let count = rows.len();
        if self.nvars == 0 {
            self.nvars = width;
            self.data = Mat::zeros(count.max(GROWTH_INCREMENT), width);
        } else if self.nobs + count > self.data.nrows() {
            let grown = self.data.nrows() + count.max(GROWTH_INCREMENT);
            let mut data = Mat::zeros(grown, self.nvars);
            for i in 0..self.nobs {
                for j in 0..self.nvars {
                    data[(i, j)] = self.data[(i, j)];
                }
            }
            self.data = data;
        }

        for (i, row) in rows.iter().enumerate() {
            for (j, &value) in row.iter().enumerate() {
                self.data[(self.nobs + i, j)] = value;
            }
        }
        self.nobs += count;
        self.data_changed = true;
        Ok(())
    }

    /// Keep only the most recent `n` observations, shrinking the capacity to
    /// exactly `n`. A no-op when `n` is at least the observation count.
    pub fn trim_to_last(&mut self, n: usize) {
        if n < self.nobs {
            let start = self.nobs - n;
            self.data = Mat::from_fn(n, self.nvars, |i, j| self.data[(start + i, j)]);
            self.nobs = n;
            self.data_changed = true;
        }
        if self.window != 0 && self.nobs < self.window {
            // statistics previously computed over more rows are now stale
            self.data_changed = true;
        }
    }

    /// Replace the table contents (and variable count) wholesale.
    ///
    /// Deliberately does not cross-validate against previously set names:
    /// keeping the names consistent after a replace is the caller's
    /// obligation.
    pub fn replace_data(&mut self, rows: &[Vec<f64>]) -> StatsResult<()> {
        let width = validate_rows(rows)?;
        self.data = Mat::from_fn(rows.len(), width, |i, j| rows[i][j]);
        self.nvars = width;
        self.nobs = rows.len();
        self.data_changed = true;
        Ok(())
    }

    /// All retained observations in append order.
    pub fn rows(&self) -> Vec<Vec<f64>> {
        (0..self.nobs)
            .map(|i| (0..self.nvars).map(|j| self.data[(i, j)]).collect())
            .collect()
    }

    /// The observations on one variable, most-recent-last. With `use_window`
    /// set, only the effective window is returned.
    pub fn column(&self, index: usize, use_window: bool) -> StatsResult<Vec<f64>> {
        self.check_var(index)?;
        let used = if use_window {
            self.effective_obs()
        } else {
            self.nobs
        };
        let start = self.nobs - used;
        Ok((0..used).map(|i| self.data[(start + i, index)]).collect())
    }

    /// `column` addressed by variable name.
    pub fn column_by_name(&self, name: &str, use_window: bool) -> StatsResult<Vec<f64>> {
        let index = self
            .name_index(name)
            .ok_or_else(|| StatsError::Configuration(format!("no variable with the name {name}")))?;
        self.column(index, use_window)
    }

    /// Label the variables. On a fresh table this establishes the variable
    /// count; otherwise the number of names must match it.
    pub fn set_names(&mut self, names: Vec<String>) -> StatsResult<()> {
        if self.nvars == 0 {
            self.create_empty(names.len())?;
        } else if names.len() != self.nvars {
            return Err(StatsError::Configuration(format!(
                "{} names do not match the {} variables of the table",
                names.len(),
                self.nvars
            )));
        }
        self.names = Some(names);
        Ok(())
    }

    /// The variable labels, if set.
    pub fn names(&self) -> Option<&[String]> {
        self.names.as_deref()
    }

    /// Position of the named variable, or `None` when names are unset or the
    /// name is unknown. Association is by position.
    pub fn name_index(&self, name: &str) -> Option<usize> {
        self.names
            .as_ref()
            .and_then(|names| names.iter().position(|n| n == name))
    }

    /// Number of variables (0 until the width is established).
    pub fn n_vars(&self) -> usize {
        self.nvars
    }

    /// Number of retained observations.
    pub fn n_obs(&self) -> usize {
        self.nobs
    }

    /// Current backing-store capacity in rows.
    pub fn capacity(&self) -> usize {
        self.data.nrows()
    }

    /// The most-recent-N window setting (0 = use all observations).
    pub fn window(&self) -> usize {
        self.window
    }

    /// Limit statistics, regressions and forecasts to the most recent `n`
    /// observations; 0 restores use of all observations.
    pub fn set_window(&mut self, n: usize) {
        if self.window != n {
            self.window = n;
            self.data_changed = true;
        }
    }

    /// Choose the covariance divisor: `n - 1` with Bessel's correction on,
    /// `n` with it off. The default is on.
    pub fn set_bessel_correction(&mut self, on: bool) {
        if self.use_bessel != on {
            self.use_bessel = on;
            self.correction_changed = true;
        }
    }

    /// Whether Bessel's correction is in effect.
    pub fn uses_bessel_correction(&self) -> bool {
        self.use_bessel
    }

    /// Observations participating in statistics under the current window.
    pub fn effective_obs(&self) -> usize {
        if self.window == 0 {
            self.nobs
        } else {
            self.nobs.min(self.window)
        }
    }

    /// Per-variable means over the effective window, or `None` while the
    /// table holds no observations.
    pub fn means(&mut self) -> Option<&[f64]> {
        if self.nobs == 0 {
            return None;
        }
        self.revalidate();
        self.moments.as_ref().map(|m| m.means.as_slice())
    }

    /// Per-variable standard deviations over the effective window, or `None`
    /// while the table holds no observations.
    pub fn std_devs(&mut self) -> Option<&[f64]> {
        if self.nobs == 0 {
            return None;
        }
        self.revalidate();
        self.moments.as_ref().map(|m| m.std_devs.as_slice())
    }

    /// The variance-covariance matrix over the effective window, or `None`
    /// below two effective observations or two variables.
    pub fn covariance(&mut self) -> Option<&[Vec<f64>]> {
        if self.effective_obs() < 2 || self.nvars < 2 {
            return None;
        }
        self.revalidate();
        self.moments.as_ref().map(|m| m.covariance.as_slice())
    }

    /// The correlation matrix over the effective window, or `None` below two
    /// effective observations or two variables.
    pub fn correlation(&mut self) -> Option<&[Vec<f64>]> {
        if self.effective_obs() < 2 || self.nvars < 2 {
            return None;
        }
        self.revalidate();
        self.moments.as_ref().map(|m| m.correlation.as_slice())
    }

    /// Recompute the whole moment bundle when either dirty flag is set. The
    /// four cached outputs always refresh together.
    fn revalidate(&mut self) {
        if !(self.data_changed || self.correction_changed) || self.nobs == 0 {
            return;
        }
        let m = self.effective_obs();
        let start = self.nobs - m;
        let window = self.data.as_ref().submatrix(start, 0, m, self.nvars);
        let moments = Moments::compute(window, self.use_bessel);
        self.moments = Some(moments);
        self.data_changed = false;
        self.correction_changed = false;
    }

    /// OLS-regress the first listed variable on the remaining ones over the
    /// effective window, returning the coefficients (intercept first).
    ///
    /// The full [`Regression`] bundle is stored and readable through
    /// [`last_regression`](Self::last_regression) until the next successful
    /// call; on failure the previous bundle is left untouched.
    pub fn regress(&mut self, vars: &[usize]) -> StatsResult<Vec<f64>> {
        if vars.is_empty() {
            return Err(StatsError::Configuration(
                "the regression variable list is empty".into(),
            ));
        }
        if vars.len() > self.nvars {
            return Err(StatsError::Configuration(
                "too many variables in the regression list".into(),
            ));
        }
        for &v in vars {
            self.check_var(v)?;
        }
        let mut seen = vec![false; self.nvars];
        for &v in vars {
            if seen[v] {
                return Err(StatsError::Configuration(format!(
                    "duplicate variable {v} in the regression list"
                )));
            }
            seen[v] = true;
        }
        if self.nobs == 0 {
            return Err(StatsError::Configuration(
                "the table holds no observations".into(),
            ));
        }

        let y = self.column(vars[0], true)?;
        let predictors: Vec<Vec<f64>> = vars[1..]
            .iter()
            .map(|&v| self.column(v, true))
            .collect::<StatsResult<_>>()?;

        let fitted = regression::fit_ols(&y, &predictors, vars.to_vec())?;
        let coefficients = fitted.coefficients.clone();
        self.regression = Some(fitted);
        Ok(coefficients)
    }

    /// Regress variable 0 on all the others, in table order.
    pub fn regress_all(&mut self) -> StatsResult<Vec<f64>> {
        let vars: Vec<usize> = (0..self.nvars).collect();
        self.regress(&vars)
    }

    /// The result bundle of the most recent successful regression.
    pub fn last_regression(&self) -> Option<&Regression> {
        self.regression.as_ref()
    }

    /// Linear trend forecast of `var`, `horizon` periods past the last
    /// observation in the effective window (negative horizons backcast).
    pub fn forecast_linear(&mut self, var: usize, horizon: i64) -> StatsResult<f64> {
        self.forecast_with(TrendModel::Linear, var, horizon)
    }

    /// Compound growth forecast, `Y = a·(1 + r)^t`. Every value in the
    /// window must be positive.
    pub fn forecast_compound(&mut self, var: usize, horizon: i64) -> StatsResult<f64> {
        self.forecast_with(TrendModel::Compound, var, horizon)
    }

    /// Continuous growth forecast, `Y = a·e^(r·t)`. Every value in the
    /// window must be positive.
    pub fn forecast_continuous(&mut self, var: usize, horizon: i64) -> StatsResult<f64> {
        self.forecast_with(TrendModel::Continuous, var, horizon)
    }

    fn forecast_with(&mut self, model: TrendModel, var: usize, horizon: i64) -> StatsResult<f64> {
        self.check_var(var)?;
        if self.nobs == 0 {
            return Err(StatsError::Configuration(
                "there must be at least one observation for a forecast".into(),
            ));
        }
        let y = self.column(var, true)?;
        let fitted = forecast::fit(model, &y)?;
        let value = fitted.predict(horizon);
        self.forecast = Some(fitted);
        Ok(value)
    }

    /// The coefficients of the most recent successful forecast.
    pub fn last_forecast(&self) -> Option<&Forecast> {
        self.forecast.as_ref()
    }

    /// Per-variable medians over all retained observations.
    pub fn medians(&self) -> StatsResult<Vec<f64>> {
        if self.nobs == 0 {
            return Err(StatsError::Configuration(
                "the table holds no observations".into(),
            ));
        }
        (0..self.nvars)
            .map(|j| descriptive::median(&self.sorted_column(j)?))
            .collect()
    }

    /// The interpolated `phi`-quantile of `var` over all retained
    /// observations, `phi` in [0, 1].
    pub fn quantile(&self, var: usize, phi: f64) -> StatsResult<f64> {
        descriptive::quantile(&self.sorted_column(var)?, phi)
    }

    /// The `n + 1` quantile breaks of `var` (0, 1/n, ..., 1).
    pub fn quantiles(&self, var: usize, n: usize) -> StatsResult<Vec<f64>> {
        let sorted = self.sorted_column(var)?;
        let mut breaks = Vec::with_capacity(n + 1);
        for i in 0..n {
            breaks.push(descriptive::quantile(&sorted, i as f64 / n as f64)?);
        }
        breaks.push(descriptive::quantile(&sorted, 1.0)?);
        Ok(breaks)
    }

    /// The interpolated fraction of `var`'s retained observations that are
    /// less than or equal to `x`.
    pub fn quantile_rank(&self, var: usize, x: f64) -> StatsResult<f64> {
        descriptive::quantile_rank(&self.sorted_column(var)?, x)
    }

    /// The data table as labeled fixed-width text, or `None` before the
    /// variable width is established.
    pub fn print_data(&self) -> Option<String> {
        if self.nvars == 0 {
            return None;
        }
        let row_labels: Vec<String> = (0..self.nobs).map(|i| i.to_string()).collect();
        Some(print::render_matrix(
            &self.rows(),
            Some("Obsv #"),
            &row_labels,
            &self.variable_labels(),
        ))
    }

    /// The most recently computed covariance matrix as labeled text, or
    /// `None` before one has been calculated. Pure formatting: the cache is
    /// not refreshed.
    pub fn print_covariance(&self) -> Option<String> {
        let moments = self.moments.as_ref()?;
        let labels = self.variable_labels();
        Some(print::render_matrix(&moments.covariance, None, &labels, &labels))
    }

    /// The most recently computed correlation matrix as labeled text, or
    /// `None` before one has been calculated. Pure formatting: the cache is
    /// not refreshed.
    pub fn print_correlation(&self) -> Option<String> {
        let moments = self.moments.as_ref()?;
        let labels = self.variable_labels();
        Some(print::render_matrix(&moments.correlation, None, &labels, &labels))
    }

    fn variable_labels(&self) -> Vec<String> {
        match &self.names {
            Some(names) if names.len() == self.nvars => names.clone(),
            _ => (0..self.nvars).map(|j| j.to_string()).collect(),
        }
    }

    fn sorted_column(&self, var: usize) -> StatsResult<Vec<f64>> {
        let mut column = self.column(var, false)?;
        column.sort_by(f64::total_cmp);
        Ok(column)
    }

    fn check_var(&self, index: usize) -> StatsResult<()> {
        if index >= self.nvars {
            return Err(StatsError::Configuration(format!(
                "variable number {index} out of range for a table with {} variables",
                self.nvars
            )));
        }
        Ok(())
    }
}

fn validate_rows(rows: &[Vec<f64>]) -> StatsResult<usize> {
    let first = rows
        .first()
        .ok_or_else(|| StatsError::Shape("input holds no rows".into()))?;
    let width = first.len();
    if width == 0 {
        return Err(StatsError::Shape(
            "observations must hold at least one value".into(),
        ));
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(StatsError::Shape(format!(
                "row {i} has {} values, expected {width}",
                row.len()
            )));
        }
    }
    Ok(width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_var_table() -> StatsTable {
        // x = 0..5, y = 2 + 3x
        let rows: Vec<Vec<f64>> = (0..5)
            .map(|i| vec![i as f64, 2.0 + 3.0 * i as f64])
            .collect();
        StatsTable::from_rows(&rows).unwrap()
    }

    #[test]
    fn test_append_establishes_width_and_order() {
        let mut table = StatsTable::new();
        for i in 0..4 {
            table.add_row(&[i as f64, 10.0 * i as f64]).unwrap();
        }
        assert_eq!(table.n_vars(), 2);
        assert_eq!(table.n_obs(), 4);
        assert_eq!(table.column(0, false).unwrap(), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(table.column(1, false).unwrap(), vec![0.0, 10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_append_width_mismatch_leaves_store_unchanged() {
        let mut table = StatsTable::new();
        table.add_row(&[1.0, 2.0]).unwrap();
        let err = table.add_row(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, StatsError::Shape(_)));
        assert_eq!(table.n_obs(), 1);
        assert_eq!(table.n_vars(), 2);
    }

    #[test]
    fn test_ragged_batch_rejected() {
        let mut table = StatsTable::new();
        let err = table
            .add_rows(&[vec![1.0, 2.0], vec![3.0]])
            .unwrap_err();
        assert!(matches!(err, StatsError::Shape(_)));
        assert_eq!(table.n_obs(), 0);
    }

    #[test]
    fn test_capacity_grows_in_increments() {
        let mut table = StatsTable::new();
        table.add_row(&[1.0]).unwrap();
        assert_eq!(table.capacity(), 10);
        for i in 0..10 {
            table.add_row(&[i as f64]).unwrap();
        }
        assert_eq!(table.n_obs(), 11);
        assert_eq!(table.capacity(), 20);

        // a bulk append larger than the increment grows by its own size
        let mut bulk = StatsTable::new();
        let rows: Vec<Vec<f64>> = (0..25).map(|i| vec![i as f64]).collect();
        bulk.add_rows(&rows).unwrap();
        assert_eq!(bulk.capacity(), 25);
    }

    #[test]
    fn test_trim_resets_capacity() {
        let mut table = StatsTable::new();
        for i in 0..12 {
            table.add_row(&[i as f64]).unwrap();
        }
        table.trim_to_last(5);
        assert_eq!(table.n_obs(), 5);
        assert_eq!(table.capacity(), 5);
        assert_eq!(
            table.column(0, false).unwrap(),
            vec![7.0, 8.0, 9.0, 10.0, 11.0]
        );
        // trimming to more rows than exist is a no-op
        table.trim_to_last(50);
        assert_eq!(table.n_obs(), 5);
        assert_eq!(table.capacity(), 5);
    }

    #[test]
    fn test_create_empty_width_conflict() {
        let mut table = two_var_table();
        assert!(matches!(
            table.create_empty(3),
            Err(StatsError::Configuration(_))
        ));
        // same width discards the rows
        table.create_empty(2).unwrap();
        assert_eq!(table.n_obs(), 0);
        assert_eq!(table.n_vars(), 2);
    }

    #[test]
    fn test_windowed_means() {
        let mut table = StatsTable::new();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0, 6.0] {
            table.add_row(&[v]).unwrap();
        }
        assert_relative_eq!(table.means().unwrap()[0], 3.5);
        table.set_window(3);
        // mean over exactly the last 3 rows
        assert_relative_eq!(table.means().unwrap()[0], 5.0);
        table.set_window(100);
        assert_relative_eq!(table.means().unwrap()[0], 3.5);
    }

    #[test]
    fn test_statistics_idempotent_without_mutation() {
        let mut table = two_var_table();
        let first: Vec<f64> = table.means().unwrap().to_vec();
        let second: Vec<f64> = table.means().unwrap().to_vec();
        assert_eq!(first, second);
        let cov_a: Vec<Vec<f64>> = table.covariance().unwrap().to_vec();
        let cov_b: Vec<Vec<f64>> = table.covariance().unwrap().to_vec();
        assert_eq!(cov_a, cov_b);
    }

    #[test]
    fn test_bessel_toggle_changes_only_divisor() {
        let mut table = two_var_table();
        let corrected = table.covariance().unwrap()[0][1];
        table.set_bessel_correction(false);
        let uncorrected = table.covariance().unwrap()[0][1];
        let m = table.n_obs() as f64;
        assert_relative_eq!(uncorrected, corrected * (m - 1.0) / m, epsilon = 1e-12);
        // toggling back restores the original value exactly
        table.set_bessel_correction(true);
        assert_relative_eq!(table.covariance().unwrap()[0][1], corrected);
    }

    #[test]
    fn test_single_observation_boundary() {
        let mut table = StatsTable::new();
        table.add_row(&[4.0, 9.0]).unwrap();
        assert!(table.covariance().is_none());
        assert!(table.correlation().is_none());
        assert_relative_eq!(table.means().unwrap()[1], 9.0);
        // documented policy: NaN under Bessel correction, 0 without
        assert!(table.std_devs().unwrap()[0].is_nan());
        table.set_bessel_correction(false);
        assert_relative_eq!(table.std_devs().unwrap()[0], 0.0);
        // forecast degenerates to (observed value, 0)
        let value = table.forecast_linear(0, 3).unwrap();
        assert_relative_eq!(value, 4.0);
        let forecast = table.last_forecast().unwrap();
        assert_relative_eq!(forecast.constant, 4.0);
        assert_relative_eq!(forecast.rate, 0.0);
    }

    #[test]
    fn test_window_of_one_makes_matrices_unavailable() {
        let mut table = two_var_table();
        assert!(table.covariance().is_some());
        table.set_window(1);
        assert!(table.covariance().is_none());
        assert!(table.correlation().is_none());
        // means still defined, over the single windowed row
        assert_relative_eq!(table.means().unwrap()[0], 4.0);
    }

    #[test]
    fn test_correlation_of_exact_line_is_one() {
        let mut table = two_var_table();
        let correlation = table.correlation().unwrap();
        assert_relative_eq!(correlation[0][1], 1.0, epsilon = 1e-12);
        assert_relative_eq!(correlation[1][0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_names_establish_and_look_up() {
        let mut table = StatsTable::new();
        table
            .set_names(vec!["price".into(), "volume".into()])
            .unwrap();
        assert_eq!(table.n_vars(), 2);
        assert_eq!(table.name_index("volume"), Some(1));
        assert_eq!(table.name_index("missing"), None);
        // width now established, a three-wide row must fail
        assert!(table.add_row(&[1.0, 2.0, 3.0]).is_err());
        table.add_row(&[10.0, 500.0]).unwrap();
        assert_eq!(table.column_by_name("price", false).unwrap(), vec![10.0]);
        assert!(matches!(
            table.column_by_name("missing", false),
            Err(StatsError::Configuration(_))
        ));
        // name count must match the established width
        assert!(table.set_names(vec!["only-one".into()]).is_err());
    }

    #[test]
    fn test_replace_data_does_not_touch_names() {
        let mut table = two_var_table();
        table.set_names(vec!["x".into(), "y".into()]).unwrap();
        table
            .replace_data(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]])
            .unwrap();
        assert_eq!(table.n_vars(), 3);
        // stale names survive; keeping them consistent is the caller's job
        assert_eq!(table.names().unwrap().len(), 2);
    }

    #[test]
    fn test_regress_recovers_exact_line() {
        let mut table = two_var_table();
        // regress y (index 1) on x (index 0)
        let coefficients = table.regress(&[1, 0]).unwrap();
        assert_relative_eq!(coefficients[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(coefficients[1], 3.0, epsilon = 1e-9);
        let fit = table.last_regression().unwrap();
        assert_relative_eq!(fit.r_squared, 1.0, epsilon = 1e-9);
        assert!(fit.sse.abs() < 1e-9);
        assert_eq!(fit.variables, vec![1, 0]);
    }

    #[test]
    fn test_regress_all_uses_every_variable() {
        let mut table = two_var_table();
        let coefficients = table.regress_all().unwrap();
        assert_eq!(coefficients.len(), 2);
        assert_eq!(table.last_regression().unwrap().variables, vec![0, 1]);
    }

    #[test]
    fn test_regress_duplicate_variable_rejected() {
        let mut table = two_var_table();
        let err = table.regress(&[1, 1]).unwrap_err();
        assert!(matches!(err, StatsError::Configuration(_)));
        assert!(err.to_string().contains("duplicate variable 1"));
    }

    #[test]
    fn test_regress_validation() {
        let mut table = two_var_table();
        assert!(matches!(
            table.regress(&[]),
            Err(StatsError::Configuration(_))
        ));
        assert!(matches!(
            table.regress(&[0, 7]),
            Err(StatsError::Configuration(_))
        ));
        assert!(matches!(
            table.regress(&[0, 1, 1]),
            Err(StatsError::Configuration(_))
        ));
    }

    #[test]
    fn test_regress_constant_column_rejected() {
        let mut table = StatsTable::new();
        // the middle column is constant, collinear with the intercept
        for i in 0..6 {
            table
                .add_row(&[i as f64, 5.0, 2.0 * i as f64])
                .unwrap();
        }
        assert!(matches!(
            table.regress(&[0, 1, 2]),
            Err(StatsError::Numeric(_))
        ));
        assert!(table.last_regression().is_none());
    }

    #[test]
    fn test_set_window_same_value_keeps_cache() {
        let mut table = two_var_table();
        table.set_window(3);
        let _ = table.means();
        assert!(!table.data_changed);
        // re-applying the current window must not invalidate the cache
        table.set_window(3);
        assert!(!table.data_changed);
        table.set_window(4);
        assert!(table.data_changed);
    }

    #[test]
    fn test_failed_regression_preserves_previous_bundle() {
        let mut table = two_var_table();
        table.regress(&[1, 0]).unwrap();
        let before = table.last_regression().unwrap().coefficients.clone();
        assert!(table.regress(&[0, 0]).is_err());
        assert_eq!(table.last_regression().unwrap().coefficients, before);
    }

    #[test]
    fn test_regression_respects_window() {
        let mut table = StatsTable::new();
        // a kinked series: flat then steep
        for v in [5.0, 5.0, 5.0, 5.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0] {
            table.add_row(&[v, 0.0]).unwrap();
        }
        // add a clean time-like second column for the fit
        table.replace_data(
            &(0..10)
                .map(|i| {
                    let v = [5.0, 5.0, 5.0, 5.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0][i];
                    vec![v, i as f64]
                })
                .collect::<Vec<_>>(),
        )
        .unwrap();
        table.set_window(6);
        let coefficients = table.regress(&[0, 1]).unwrap();
        // over the last six rows the series climbs exactly one per step
        assert_relative_eq!(coefficients[1], 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_forecast_linear_horizon_zero_matches_fit() {
        let mut table = StatsTable::new();
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            table.add_row(&[v]).unwrap();
        }
        // fitted value at the last observed time index
        assert_relative_eq!(table.forecast_linear(0, 0).unwrap(), 5.0, epsilon = 1e-9);
        assert_relative_eq!(table.forecast_linear(0, 2).unwrap(), 7.0, epsilon = 1e-9);
    }

    #[test]
    fn test_forecast_compound_rejects_non_positive() {
        let mut table = StatsTable::new();
        for v in [1.0, -2.0, 3.0] {
            table.add_row(&[v]).unwrap();
        }
        assert!(matches!(
            table.forecast_compound(0, 1),
            Err(StatsError::Domain(_))
        ));
        assert!(matches!(
            table.forecast_continuous(0, 1),
            Err(StatsError::Domain(_))
        ));
        // the failed fit left no coefficients behind
        assert!(table.last_forecast().is_none());
    }

    #[test]
    fn test_forecast_requires_observations() {
        let mut table = StatsTable::with_variables(1).unwrap();
        assert!(matches!(
            table.forecast_linear(0, 1),
            Err(StatsError::Configuration(_))
        ));
    }

    #[test]
    fn test_forecast_uses_window() {
        let mut table = StatsTable::new();
        // an old flat stretch followed by linear growth
        for v in [9.0, 9.0, 9.0, 1.0, 2.0, 3.0] {
            table.add_row(&[v]).unwrap();
        }
        table.set_window(3);
        // the fit sees only 1,2,3 at t = 0,1,2
        assert_relative_eq!(table.forecast_linear(0, 1).unwrap(), 4.0, epsilon = 1e-9);
        assert_eq!(table.last_forecast().unwrap().n_used, 3);
    }

    #[test]
    fn test_medians_and_quantiles() {
        let mut table = StatsTable::new();
        for v in [5.0, 1.0, 3.0, 2.0, 4.0] {
            table.add_row(&[v]).unwrap();
        }
        assert_relative_eq!(table.medians().unwrap()[0], 3.0);
        assert_relative_eq!(table.quantile(0, 0.25).unwrap(), 2.0);
        assert_eq!(
            table.quantiles(0, 4).unwrap(),
            vec![1.0, 2.0, 3.0, 4.0, 5.0]
        );
        assert_relative_eq!(table.quantile_rank(0, 3.0).unwrap(), 0.6);
        assert!(matches!(
            table.quantile(0, 2.0),
            Err(StatsError::Domain(_))
        ));
    }

    #[test]
    fn test_print_data_layout() {
        let mut table = two_var_table();
        table.set_names(vec!["x".into(), "y".into()]).unwrap();
        let text = table.print_data().unwrap();
        assert!(text.starts_with("Obsv #"));
        assert!(text.contains(" x "));
        assert!(text.contains(" y "));
        assert_eq!(text.lines().count(), 6);
        // positional labels when names are unset
        let unnamed = two_var_table();
        let text = unnamed.print_data().unwrap();
        assert!(text.lines().next().unwrap().contains('0'));
    }

    #[test]
    fn test_print_matrices_only_after_computation() {
        let mut table = two_var_table();
        assert!(table.print_covariance().is_none());
        let _ = table.covariance();
        assert!(table.print_covariance().is_some());
        assert!(table.print_correlation().is_some());
    }

    #[test]
    fn test_empty_table_statistics_unavailable() {
        let mut table = StatsTable::with_variables(2).unwrap();
        assert!(table.means().is_none());
        assert!(table.std_devs().is_none());
        assert!(table.covariance().is_none());
        assert!(table.print_data().is_some());
        assert!(StatsTable::new().print_data().is_none());
    }
}
