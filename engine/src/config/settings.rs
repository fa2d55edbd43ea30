// Analytics defaults, loaded from the embedded JSON or a user-supplied file.
// These only seed requests; the analytics functions themselves take every
// parameter explicitly.
use serde::Deserialize;
use std::path::Path;

use crate::error::{EngineError, Result};
use crate::forecast::linear_trend::{DEFAULT_HORIZON, DEFAULT_LOOKBACK_HOURS};
use crate::indicators::bollinger::{DEFAULT_BOLLINGER_NUM_STD, DEFAULT_BOLLINGER_WINDOW};
use crate::indicators::rsi::DEFAULT_RSI_WINDOW;

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AnalyticsSettings {
    pub moving_average: MovingAverageSettings,
    pub rsi: RsiSettings,
    pub bollinger: BollingerSettings,
    pub forecast: ForecastSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct MovingAverageSettings {
    pub windows: Vec<usize>,
}

impl Default for MovingAverageSettings {
    fn default() -> Self {
        // Long, medium and short session averages
        MovingAverageSettings {
            windows: vec![200, 100, 50],
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RsiSettings {
    pub window: usize,
}

impl Default for RsiSettings {
    fn default() -> Self {
        RsiSettings {
            window: DEFAULT_RSI_WINDOW,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct BollingerSettings {
    pub window: usize,
    pub num_std: f64,
}

impl Default for BollingerSettings {
    fn default() -> Self {
        BollingerSettings {
            window: DEFAULT_BOLLINGER_WINDOW,
            num_std: DEFAULT_BOLLINGER_NUM_STD,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ForecastSettings {
    pub horizon: usize,
    pub lookback_hours: i64,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        ForecastSettings {
            horizon: DEFAULT_HORIZON,
            lookback_hours: DEFAULT_LOOKBACK_HOURS,
        }
    }
}

impl AnalyticsSettings {
    pub fn load_default() -> Result<Self> {
        let config_str = include_str!("../../config/default.json"); // Path relative to this .rs file
        Self::from_json(config_str)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .map_err(|e| EngineError::ConfigError(format!("Failed to read '{}': {}", path.display(), e)))?;
        Self::from_json(&config_str)
    }

    pub fn from_json(config_str: &str) -> Result<Self> {
        serde_json::from_str(config_str).map_err(|e| EngineError::ConfigError(format!("Invalid settings JSON: {}", e)))
    }
}
