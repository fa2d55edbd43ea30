use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single priced point in a security's history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
}

impl Observation {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }
}

/// Output of one indicator, aligned index-for-index with the analyzed series.
/// `None` marks positions where the indicator has no value (warm-up, flat runs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IndicatorResult {
    MovingAverage {
        window: usize,
        values: Vec<Option<f64>>,
    },
    Rsi {
        window: usize,
        values: Vec<Option<f64>>,
    },
    BollingerBands {
        window: usize,
        num_std: f64,
        mid: Vec<Option<f64>>,
        upper: Vec<Option<f64>>,
        lower: Vec<Option<f64>>,
    },
}

impl IndicatorResult {
    pub fn label(&self) -> String {
        match self {
            IndicatorResult::MovingAverage { window, .. } => format!("MA({})", window),
            IndicatorResult::Rsi { window, .. } => format!("RSI({})", window),
            IndicatorResult::BollingerBands { window, num_std, .. } => {
                format!("BB({}, {})", window, num_std)
            }
        }
    }

    /// Number of positions covered, equal to the input series length.
    pub fn len(&self) -> usize {
        match self {
            IndicatorResult::MovingAverage { values, .. } | IndicatorResult::Rsi { values, .. } => {
                values.len()
            }
            IndicatorResult::BollingerBands { mid, .. } => mid.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Intercept and slope of `price ≈ intercept + slope * position`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendFit {
    pub intercept: f64,
    pub slope: f64,
}

impl TrendFit {
    pub fn predict(&self, position: f64) -> f64 {
        self.intercept + self.slope * position
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Timestamp of the last observation the projection starts from.
    pub anchor: DateTime<Utc>,
    pub timestamps: Vec<DateTime<Utc>>,
    pub predictions: Vec<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    /// In-sample residual root-mean-square error of the fit.
    pub rmse: f64,
    pub fit: TrendFit,
    /// Spacing used to place the projected timestamps.
    pub step_seconds: i64,
    /// The trailing observations the line was fitted on.
    pub history: Vec<Observation>,
}

impl ForecastResult {
    pub fn horizon(&self) -> usize {
        self.predictions.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    NoData,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub status: ReportStatus,
    pub timestamps: Vec<DateTime<Utc>>,
    pub prices: Vec<f64>,
    pub indicators: Vec<IndicatorResult>,
    pub forecast: Option<ForecastResult>,
}

impl AnalysisReport {
    /// The displayable empty state returned for a series with no observations.
    pub fn no_data() -> Self {
        Self {
            status: ReportStatus::NoData,
            timestamps: Vec::new(),
            prices: Vec::new(),
            indicators: Vec::new(),
            forecast: None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        self.status == ReportStatus::NoData
    }
}
