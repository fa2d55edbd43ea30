// Technical indicators module
pub mod bollinger;
pub mod moving_average;
pub mod rsi;
pub mod window;

pub use bollinger::{bollinger_bands, BollingerBands};
pub use moving_average::{moving_average, MovingAverage};
pub use rsi::{rsi, Rsi};
pub use window::WindowPolicy;

use crate::models::TimeSeries;
use serde_json::Value;
use shared::models::IndicatorResult;

// Common trait for all indicators. Parameters are validated when the
// calculator is built, so `calculate` itself cannot fail.
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, series: &TimeSeries) -> IndicatorResult;
}
