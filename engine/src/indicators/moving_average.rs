// Simple moving average with partial-window warm-up
use super::window::{mean, rolling, WindowPolicy};
use super::IndicatorCalculator;
use crate::error::{EngineError, Result};
use crate::models::TimeSeries;
use serde_json::Value;
use shared::models::IndicatorResult;

fn validate_window(window: usize) -> Result<()> {
    if window == 0 {
        return Err(EngineError::invalid_parameter("window", window, "moving average window must be greater than 0"));
    }
    Ok(())
}

/// Rolling mean of price. Positions before the first full window average the
/// available prefix, so every position carries a value.
pub fn moving_average(series: &TimeSeries, window: usize) -> Result<Vec<Option<f64>>> {
    validate_window(window)?;
    Ok(rolling(&series.prices(), window, WindowPolicy::Partial, mean))
}

pub struct MovingAverage {
    name: String,
    window: usize,
}

impl MovingAverage {
    pub fn new(window: usize) -> Result<Self> {
        validate_window(window)?;
        Ok(Self {
            name: format!("MA({})", window),
            window,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl IndicatorCalculator for MovingAverage {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "window": self.window })
    }

    fn calculate(&self, series: &TimeSeries) -> IndicatorResult {
        IndicatorResult::MovingAverage {
            window: self.window,
            values: rolling(&series.prices(), self.window, WindowPolicy::Partial, mean),
        }
    }
}
