//! Price forecasting.
//!
//! Only a linear trend over recent observations is provided: an OLS line is
//! fitted against observation position and extrapolated with a band derived
//! from the in-sample residual spread.

pub mod linear_trend;
pub mod regression;

pub use linear_trend::{forecast, ForecastParams, Z_95};
pub use regression::{fit_ols, residual_rmse};
