// Boundary the presentation layer calls: one series plus one request in,
// one aggregated report out.
use shared::models::{AnalysisReport, ReportStatus};

use super::request::AnalysisRequest;
use crate::error::Result;
use crate::forecast;
use crate::indicators::IndicatorCalculator;
use crate::models::TimeSeries;

#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyticsFacade;

impl AnalyticsFacade {
    pub fn new() -> Self {
        AnalyticsFacade
    }

    /// Runs every requested analysis over `series`.
    ///
    /// Parameters are validated before anything else, so a bad window is
    /// reported even for an empty series. An empty series (after any range
    /// trim) yields a `NoData` report rather than an error. Insufficient data
    /// for the forecast is an error.
    pub fn analyze(&self, series: &TimeSeries, request: &AnalysisRequest) -> Result<AnalysisReport> {
        let calculators = request
            .indicators
            .iter()
            .map(|spec| spec.build())
            .collect::<Result<Vec<Box<dyn IndicatorCalculator>>>>()?;
        let forecast_params = request.forecast.as_ref().map(|spec| spec.to_params()).transpose()?;

        let trimmed;
        let series = match (request.range, series.last()) {
            (Some(range), Some(last)) => {
                trimmed = series.trailing(range.span_before(last.timestamp))?;
                &trimmed
            }
            _ => series,
        };

        tracing::info!(
            observations = series.len(),
            indicators = calculators.len(),
            forecast = forecast_params.is_some(),
            range = ?request.range,
            "Analyzing price series"
        );

        if series.is_empty() {
            tracing::warn!("Empty price series, returning no-data report");
            return Ok(AnalysisReport::no_data());
        }

        let indicators = calculators
            .iter()
            .map(|calculator| {
                tracing::debug!(
                    indicator = calculator.name(),
                    parameters = %calculator.parameters(),
                    "Calculating indicator"
                );
                calculator.calculate(series)
            })
            .collect();

        let forecast = forecast_params
            .map(|params| forecast::forecast(series, &params))
            .transpose()?;

        Ok(AnalysisReport {
            status: ReportStatus::Complete,
            timestamps: series.timestamps(),
            prices: series.prices(),
            indicators,
            forecast,
        })
    }
}
