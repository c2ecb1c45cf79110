//! tablestats-core: in-process statistical data table
//!
//! This crate provides a growable table of numeric observations together with
//! descriptive statistics (means, standard deviations, covariance and
//! correlation matrices), OLS regression with coefficient-level inference,
//! and linear/compound/continuous trend forecasts, designed for embedding in
//! a simulation host.

pub mod descriptive;
pub mod distributions;
pub mod errors;
pub mod forecast;
pub mod regression;
pub mod table;

mod linalg;
mod moments;
mod print;

pub use errors::{StatsError, StatsResult};
pub use forecast::{Forecast, TrendModel};
pub use regression::Regression;
pub use table::StatsTable;
