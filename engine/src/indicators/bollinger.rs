// Bollinger Bands: rolling mean +/- a multiple of the rolling sample standard deviation
use super::window::{mean, rolling, sample_std, WindowPolicy};
use super::IndicatorCalculator;
use crate::error::{EngineError, Result};
use crate::models::TimeSeries;
use serde_json::Value;
use shared::models::IndicatorResult;

pub const DEFAULT_BOLLINGER_WINDOW: usize = 20;
pub const DEFAULT_BOLLINGER_NUM_STD: f64 = 2.0;

/// Aligned middle, upper and lower bands. Full windows only.
#[derive(Debug, Clone, PartialEq)]
pub struct Bands {
    pub mid: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

pub fn bollinger_bands(series: &TimeSeries, window: usize, num_std: f64) -> Result<Bands> {
    validate(window, num_std)?;
    Ok(compute(&series.prices(), window, num_std))
}

fn validate(window: usize, num_std: f64) -> Result<()> {
    if window <= 1 {
        return Err(EngineError::invalid_parameter(
            "window",
            window,
            "Bollinger window must be at least 2 for a sample standard deviation",
        ));
    }
    if !num_std.is_finite() || num_std < 0.0 {
        return Err(EngineError::invalid_parameter("num_std", num_std, "must be a finite, non-negative multiplier"));
    }
    Ok(())
}

fn compute(prices: &[f64], window: usize, num_std: f64) -> Bands {
    let mid = rolling(prices, window, WindowPolicy::Full, mean);
    let sigma = rolling(prices, window, WindowPolicy::Full, sample_std);

    let (upper, lower) = mid
        .iter()
        .zip(&sigma)
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => (Some(m + num_std * s), Some(m - num_std * s)),
            _ => (None, None),
        })
        .unzip();

    Bands { mid, upper, lower }
}

pub struct BollingerBands {
    name: String,
    window: usize,
    num_std: f64,
}

impl BollingerBands {
    pub fn new(window: usize, num_std: f64) -> Result<Self> {
        validate(window, num_std)?;
        Ok(Self {
            name: format!("BB({}, {})", window, num_std),
            window,
            num_std,
        })
    }
}

impl IndicatorCalculator for BollingerBands {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "window": self.window, "num_std": self.num_std })
    }

    fn calculate(&self, series: &TimeSeries) -> IndicatorResult {
        let Bands { mid, upper, lower } = compute(&series.prices(), self.window, self.num_std);
        IndicatorResult::BollingerBands {
            window: self.window,
            num_std: self.num_std,
            mid,
            upper,
            lower,
        }
    }
}
