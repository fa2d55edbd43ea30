// Relative Strength Index (RSI) indicator implementation
use super::window::{mean, rolling, WindowPolicy};
use super::IndicatorCalculator;
use crate::error::{EngineError, Result};
use crate::models::TimeSeries;
use serde_json::Value;
use shared::models::IndicatorResult;

pub const DEFAULT_RSI_WINDOW: usize = 14;

/// RSI from simple rolling means of gains and losses over `window` deltas.
///
/// Position `i` needs the deltas `i - window + 1 ..= i`, so the first defined
/// value is at index `window`. A run with no losses but some gains is 100; a
/// run with neither (flat price) has no value.
pub fn rsi(series: &TimeSeries, window: usize) -> Result<Vec<Option<f64>>> {
    validate_window(window)?;
    Ok(compute(&series.prices(), window))
}

fn validate_window(window: usize) -> Result<()> {
    if window == 0 {
        return Err(EngineError::invalid_parameter("window", window, "RSI window must be greater than 0"));
    }
    Ok(())
}

fn compute(prices: &[f64], window: usize) -> Vec<Option<f64>> {
    if prices.is_empty() {
        return Vec::new();
    }

    let (gains, losses): (Vec<f64>, Vec<f64>) = prices
        .windows(2)
        .map(|w| {
            let change = w[1] - w[0];
            (change.max(0.0), (-change).max(0.0))
        })
        .unzip();

    let avg_gains = rolling(&gains, window, WindowPolicy::Full, mean);
    let avg_losses = rolling(&losses, window, WindowPolicy::Full, mean);

    // delta[0] does not exist, so index 0 of the output is always undefined.
    let mut results = Vec::with_capacity(prices.len());
    results.push(None);
    results.extend(
        avg_gains
            .into_iter()
            .zip(avg_losses)
            .map(|(gain, loss)| match (gain, loss) {
                (Some(gain), Some(loss)) => strength_index(gain, loss),
                _ => None,
            }),
    );
    results
}

fn strength_index(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { Some(100.0) } else { None };
    }
    let rs = avg_gain / avg_loss;
    Some(100.0 - 100.0 / (1.0 + rs))
}

pub struct Rsi {
    name: String,
    window: usize,
}

impl Rsi {
    pub fn new(window: usize) -> Result<Self> {
        validate_window(window)?;
        Ok(Self {
            name: format!("RSI({})", window),
            window,
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl Default for Rsi {
    fn default() -> Self {
        Self {
            name: format!("RSI({})", DEFAULT_RSI_WINDOW),
            window: DEFAULT_RSI_WINDOW,
        }
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "window": self.window })
    }

    fn calculate(&self, series: &TimeSeries) -> IndicatorResult {
        IndicatorResult::Rsi {
            window: self.window,
            values: compute(&series.prices(), self.window),
        }
    }
}
