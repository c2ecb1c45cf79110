//! Probability distributions and special functions.
//!
//! Thin validation wrappers around `statrs`, collected in one place so the
//! underlying numerical library can be swapped out without touching the rest
//! of the crate. Out-of-range parameters surface as `Domain` errors.

use statrs::distribution::{
    Binomial, ChiSquared, Continuous, ContinuousCDF, Discrete, DiscreteCDF, LogNormal, Normal,
    StudentsT,
};
use statrs::function::{beta, factorial, gamma};

use crate::errors::{StatsError, StatsResult};

fn check_unit_open(area: f64, what: &str) -> StatsResult<()> {
    if !(area > 0.0 && area < 1.0) {
        return Err(StatsError::Domain(format!(
            "the {what} must be strictly between 0.0 and 1.0, got {area}"
        )));
    }
    Ok(())
}

fn check_probability(p: f64) -> StatsResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(StatsError::Domain(format!(
            "the success probability must lie in [0, 1], got {p}"
        )));
    }
    Ok(())
}

/// Right-tail p-value of an F statistic with `dfn` numerator and `dfd`
/// denominator degrees of freedom, via the incomplete-beta identity
/// `I_x(dfd/2, dfn/2)` with `x = dfd / (dfd + dfn·F)`.
pub fn p_value_for_f_stat(f_stat: f64, dfn: f64, dfd: f64) -> StatsResult<f64> {
    if dfn <= 0.0 || dfd <= 0.0 {
        return Err(StatsError::Domain(format!(
            "degrees of freedom must be positive, got {dfn} and {dfd}"
        )));
    }
    if f_stat.is_nan() || f_stat < 0.0 {
        return Err(StatsError::Domain(format!("invalid F statistic {f_stat}")));
    }
    let x = dfd / (dfd + dfn * f_stat);
    Ok(beta::beta_reg(dfd / 2.0, dfn / 2.0, x))
}

/// Two-tailed p-value of a t statistic: twice the left-tail area at
/// `-|t|` under the Student-t distribution with `df` degrees of freedom.
pub fn p_value_for_t_stat(t_stat: f64, df: f64) -> StatsResult<f64> {
    if t_stat.is_nan() {
        return Ok(f64::NAN);
    }
    if t_stat.is_infinite() {
        return Ok(0.0);
    }
    Ok(2.0 * student_area(-t_stat.abs(), df)?)
}

/// Area to the left of `x` under the Student-t distribution with `df`
/// degrees of freedom.
pub fn student_area(x: f64, df: f64) -> StatsResult<f64> {
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Domain(e.to_string()))?;
    Ok(dist.cdf(x))
}

/// The t for which the left-tail area under the Student-t distribution with
/// `df` degrees of freedom equals `area`.
pub fn student_inverse(area: f64, df: f64) -> StatsResult<f64> {
    check_unit_open(area, "area")?;
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| StatsError::Domain(e.to_string()))?;
    Ok(dist.inverse_cdf(area))
}

/// Area to the left of `x` under the normal distribution with the given mean
/// and standard deviation.
pub fn normal_area(x: f64, mean: f64, sd: f64) -> StatsResult<f64> {
    let dist = Normal::new(mean, sd).map_err(|e| StatsError::Domain(e.to_string()))?;
    Ok(dist.cdf(x))
}

/// The x to the left of which the given area lies, under the normal
/// distribution with the given mean and standard deviation.
pub fn normal_inverse(area: f64, mean: f64, sd: f64) -> StatsResult<f64> {
    check_unit_open(area, "area")?;
    let dist = Normal::new(mean, sd).map_err(|e| StatsError::Domain(e.to_string()))?;
    Ok(dist.inverse_cdf(area))
}

/// Density of the normal distribution at `x`.
pub fn normal_density(x: f64, mean: f64, sd: f64) -> StatsResult<f64> {
    let dist = Normal::new(mean, sd).map_err(|e| StatsError::Domain(e.to_string()))?;
    Ok(dist.pdf(x))
}

/// Area under the chi-square density from 0 to `x`.
pub fn chi_square_area(x: f64, df: f64) -> StatsResult<f64> {
    if x < 0.0 {
        return Err(StatsError::Domain(format!(
            "chi-square is defined for x >= 0, got {x}"
        )));
    }
    let dist = ChiSquared::new(df).map_err(|e| StatsError::Domain(e.to_string()))?;
    Ok(dist.cdf(x))
}

/// Area under the chi-square density from `x` to infinity.
pub fn chi_square_complement(x: f64, df: f64) -> StatsResult<f64> {
    if df <= 0.0 {
        return Err(StatsError::Domain(format!(
            "degrees of freedom must be positive, got {df}"
        )));
    }
    if x < 0.0 {
        return Err(StatsError::Domain(format!(
            "chi-square is defined for x >= 0, got {x}"
        )));
    }
    Ok(gamma::gamma_ur(df / 2.0, x / 2.0))
}

/// The gamma function at `x`. Undefined at zero and the negative integers.
pub fn gamma_function(x: f64) -> StatsResult<f64> {
    if x == 0.0 || (x < 0.0 && x.fract() == 0.0) {
        return Err(StatsError::Domain(format!("gamma is undefined at {x}")));
    }
    Ok(gamma::gamma(x))
}

/// Natural log of the gamma function, for positive `x`.
pub fn log_gamma(x: f64) -> StatsResult<f64> {
    if x <= 0.0 {
        return Err(StatsError::Domain(format!(
            "log-gamma requires a positive argument, got {x}"
        )));
    }
    Ok(gamma::ln_gamma(x))
}

/// Regularized lower incomplete gamma function P(a, x).
pub fn incomplete_gamma(a: f64, x: f64) -> StatsResult<f64> {
    if a <= 0.0 {
        return Err(StatsError::Domain(format!(
            "the shape parameter must be positive, got {a}"
        )));
    }
    if x < 0.0 {
        return Err(StatsError::Domain(format!(
            "the integration end point must be non-negative, got {x}"
        )));
    }
    Ok(gamma::gamma_lr(a, x))
}

/// Complement Q(a, x) of the regularized incomplete gamma function.
pub fn incomplete_gamma_complement(a: f64, x: f64) -> StatsResult<f64> {
    if a <= 0.0 {
        return Err(StatsError::Domain(format!(
            "the shape parameter must be positive, got {a}"
        )));
    }
    if x < 0.0 {
        return Err(StatsError::Domain(format!(
            "the integration start point must be non-negative, got {x}"
        )));
    }
    Ok(gamma::gamma_ur(a, x))
}

/// The beta function with arguments `a` and `b`.
pub fn beta_function(a: f64, b: f64) -> StatsResult<f64> {
    if a <= 0.0 || b <= 0.0 {
        return Err(StatsError::Domain(format!(
            "beta requires positive arguments, got {a} and {b}"
        )));
    }
    Ok(beta::beta(a, b))
}

/// Regularized incomplete beta function I_x(a, b).
pub fn incomplete_beta(a: f64, b: f64, x: f64) -> StatsResult<f64> {
    if a <= 0.0 || b <= 0.0 {
        return Err(StatsError::Domain(format!(
            "incomplete beta requires positive shape parameters, got {a} and {b}"
        )));
    }
    if !(0.0..=1.0).contains(&x) {
        return Err(StatsError::Domain(format!(
            "the integration end point must lie in [0, 1], got {x}"
        )));
    }
    Ok(beta::beta_reg(a, b, x))
}

/// The binomial coefficient "n choose k", rounded to the nearest integer
/// value representable as f64.
pub fn binomial_coefficient(n: u64, k: u64) -> StatsResult<f64> {
    if k > n {
        return Err(StatsError::Domain(format!(
            "cannot choose {k} items from {n}"
        )));
    }
    Ok(factorial::binomial(n, k).round())
}

/// Probability of exactly `k` successes in `n` trials with success
/// probability `p`.
pub fn binomial_probability(n: u64, k: u64, p: f64) -> StatsResult<f64> {
    check_probability(p)?;
    if k > n {
        return Err(StatsError::Domain(format!(
            "cannot observe {k} successes in {n} trials"
        )));
    }
    let dist = Binomial::new(p, n).map_err(|e| StatsError::Domain(e.to_string()))?;
    Ok(dist.pmf(k))
}

/// Sum of the binomial terms 0 through `k`.
pub fn binomial_through_k(n: u64, k: u64, p: f64) -> StatsResult<f64> {
    check_probability(p)?;
    if k > n {
        return Err(StatsError::Domain(format!(
            "cannot observe {k} successes in {n} trials"
        )));
    }
    let dist = Binomial::new(p, n).map_err(|e| StatsError::Domain(e.to_string()))?;
    Ok(dist.cdf(k))
}

/// Sum of the binomial terms `k + 1` through `n`, via the incomplete-beta
/// identity `I_p(k + 1, n - k)`.
pub fn binomial_complement(n: u64, k: u64, p: f64) -> StatsResult<f64> {
    check_probability(p)?;
    if k > n {
        return Err(StatsError::Domain(format!(
            "cannot observe {k} successes in {n} trials"
        )));
    }
    if k == n {
        return Ok(0.0);
    }
    Ok(beta::beta_reg(k as f64 + 1.0, (n - k) as f64, p))
}

/// Area to the left of `x` under the log-normal distribution with the given
/// location and scale.
pub fn log_normal_area(x: f64, location: f64, scale: f64) -> StatsResult<f64> {
    let dist = LogNormal::new(location, scale).map_err(|e| StatsError::Domain(e.to_string()))?;
    Ok(dist.cdf(x))
}

/// Density of the log-normal distribution at `x`.
pub fn log_normal_density(x: f64, location: f64, scale: f64) -> StatsResult<f64> {
    let dist = LogNormal::new(location, scale).map_err(|e| StatsError::Domain(e.to_string()))?;
    Ok(dist.pdf(x))
}

/// The x to the left of which the given area lies, under the log-normal
/// distribution with the given location and scale.
pub fn log_normal_inverse(area: f64, location: f64, scale: f64) -> StatsResult<f64> {
    check_unit_open(area, "area")?;
    let dist = LogNormal::new(location, scale).map_err(|e| StatsError::Domain(e.to_string()))?;
    Ok(dist.inverse_cdf(area))
}
