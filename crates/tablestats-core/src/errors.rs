use thiserror::Error;

/// Errors that can occur during table operations and statistical computations.
///
/// Each variant carries the human-readable description of the failure. Note
/// that "unavailable" statistics (too few observations or variables for a
/// covariance/correlation matrix) are not errors: the accessors involved
/// return `None` and the caller decides how to surface that.
#[derive(Error, Debug)]
pub enum StatsError {
    /// A request is inconsistent with the table's configuration: width
    /// mismatches at creation, duplicate regression variables, unknown
    /// variable names, or an operation that needs data the table does not
    /// hold.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// An appended row's width does not match the established table width,
    /// or a bulk input is ragged or empty.
    #[error("shape error: {0}")]
    Shape(String),

    /// An input lies outside a function's valid domain, e.g. a non-positive
    /// value ahead of a logarithm or a probability outside (0, 1).
    #[error("domain error: {0}")]
    Domain(String),

    /// The underlying linear algebra failed, e.g. a singular or
    /// rank-deficient design matrix during regression.
    #[error("numeric error: {0}")]
    Numeric(String),
}

/// Result type for table and statistical operations.
pub type StatsResult<T> = Result<T, StatsError>;
