use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Insufficient data for {context}: need at least {required} observations, got {available}")]
    InsufficientData {
        context: &'static str,
        required: usize,
        available: usize,
    },

    #[error("Invalid time series: {0}")]
    InvalidSeries(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("CSV data format error: {0}")]
    CsvDataFormatError(String),

    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },
}

impl EngineError {
    pub fn invalid_parameter(name: &'static str, value: impl ToString, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// Only a too-short series can be fixed by retrying with different input;
    /// everything else is a caller bug or a broken file.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::InsufficientData { .. })
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
