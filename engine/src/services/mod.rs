// Entry points for callers of the analytics core.
pub mod analytics_facade;
pub mod request;

pub use analytics_facade::AnalyticsFacade;
pub use request::{AnalysisRequest, ForecastSpec, HistoryRange, IndicatorSpec};
