// Declarative analysis requests, buildable in code, from JSON or from settings.
use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AnalyticsSettings;
use crate::error::{EngineError, Result};
use crate::forecast::linear_trend::{ForecastParams, DEFAULT_HORIZON, DEFAULT_LOOKBACK_HOURS};
use crate::indicators::bollinger::{DEFAULT_BOLLINGER_NUM_STD, DEFAULT_BOLLINGER_WINDOW};
use crate::indicators::rsi::DEFAULT_RSI_WINDOW;
use crate::indicators::{BollingerBands, IndicatorCalculator, MovingAverage, Rsi};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default)]
    pub indicators: Vec<IndicatorSpec>,
    #[serde(default)]
    pub forecast: Option<ForecastSpec>,
    /// Trims the series to a trailing history range before analysis.
    #[serde(default)]
    pub range: Option<HistoryRange>,
}

impl AnalysisRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn with_indicator(mut self, spec: IndicatorSpec) -> Self {
        self.indicators.push(spec);
        self
    }

    pub fn with_forecast(mut self, spec: ForecastSpec) -> Self {
        self.forecast = Some(spec);
        self
    }

    pub fn with_range(mut self, range: HistoryRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Every configured moving average, RSI, Bollinger bands and the forecast.
    pub fn select_all(settings: &AnalyticsSettings) -> Self {
        let mut request = settings
            .moving_average
            .windows
            .iter()
            .fold(Self::new(), |req, &window| req.with_indicator(IndicatorSpec::MovingAverage { window }));
        request = request
            .with_indicator(IndicatorSpec::Rsi {
                window: settings.rsi.window,
            })
            .with_indicator(IndicatorSpec::BollingerBands {
                window: settings.bollinger.window,
                num_std: settings.bollinger.num_std,
            });
        request.with_forecast(ForecastSpec {
            horizon: settings.forecast.horizon,
            lookback_hours: settings.forecast.lookback_hours,
        })
    }
}

fn default_rsi_window() -> usize {
    DEFAULT_RSI_WINDOW
}

fn default_bollinger_window() -> usize {
    DEFAULT_BOLLINGER_WINDOW
}

fn default_num_std() -> f64 {
    DEFAULT_BOLLINGER_NUM_STD
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IndicatorSpec {
    MovingAverage {
        window: usize,
    },
    Rsi {
        #[serde(default = "default_rsi_window")]
        window: usize,
    },
    BollingerBands {
        #[serde(default = "default_bollinger_window")]
        window: usize,
        #[serde(default = "default_num_std")]
        num_std: f64,
    },
}

impl IndicatorSpec {
    /// Builds the calculator, validating its parameters.
    pub fn build(&self) -> Result<Box<dyn IndicatorCalculator>> {
        let calculator: Box<dyn IndicatorCalculator> = match *self {
            IndicatorSpec::MovingAverage { window } => Box::new(MovingAverage::new(window)?),
            IndicatorSpec::Rsi { window } => Box::new(Rsi::new(window)?),
            IndicatorSpec::BollingerBands { window, num_std } => Box::new(BollingerBands::new(window, num_std)?),
        };
        Ok(calculator)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastSpec {
    #[serde(default = "default_horizon")]
    pub horizon: usize,
    #[serde(default = "default_lookback_hours")]
    pub lookback_hours: i64,
}

fn default_horizon() -> usize {
    DEFAULT_HORIZON
}

fn default_lookback_hours() -> i64 {
    DEFAULT_LOOKBACK_HOURS
}

impl Default for ForecastSpec {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
        }
    }
}

impl ForecastSpec {
    pub fn to_params(&self) -> Result<ForecastParams> {
        let lookback = Duration::try_hours(self.lookback_hours).ok_or_else(|| {
            EngineError::invalid_parameter("lookback", format!("{}h", self.lookback_hours), "lookback hours out of range")
        })?;
        ForecastParams::new(self.horizon, lookback)
    }
}

/// Trailing history ranges offered to users when picking how much to chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistoryRange {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
}

impl HistoryRange {
    pub fn months(&self) -> u32 {
        match self {
            HistoryRange::OneMonth => 1,
            HistoryRange::ThreeMonths => 3,
            HistoryRange::SixMonths => 6,
            HistoryRange::OneYear => 12,
            HistoryRange::FiveYears => 60,
        }
    }

    /// Calendar span covered by this range when it ends at `end`.
    pub fn span_before(&self, end: DateTime<Utc>) -> Duration {
        match end.checked_sub_months(Months::new(self.months())) {
            Some(start) => end - start,
            None => Duration::days(30 * i64::from(self.months())),
        }
    }
}
