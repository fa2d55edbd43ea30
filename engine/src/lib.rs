// Engine library root
// Price analytics: rolling indicators and a linear trend forecast over a
// caller-supplied price history.

pub mod config;
pub mod data;
pub mod error;
pub mod forecast;
pub mod indicators;
pub mod models;
pub mod services;

pub use error::{EngineError, Result};
pub use models::TimeSeries;
pub use services::{AnalysisRequest, AnalyticsFacade};
