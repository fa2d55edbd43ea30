// Short-horizon linear trend projection with a fixed-width confidence band
use chrono::{DateTime, Duration, Utc};
use shared::models::ForecastResult;

use super::regression::{fit_ols, residual_rmse};
use crate::error::{EngineError, Result};
use crate::models::TimeSeries;

pub const DEFAULT_HORIZON: usize = 24;
pub const DEFAULT_LOOKBACK_HOURS: i64 = 14 * 24;

/// Normal critical value for a two-sided 95% interval. Applied regardless of
/// sample size; no t-distribution correction.
pub const Z_95: f64 = 1.96;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastParams {
    horizon: usize,
    lookback: Duration,
}

impl ForecastParams {
    pub fn new(horizon: usize, lookback: Duration) -> Result<Self> {
        if horizon == 0 {
            return Err(EngineError::invalid_parameter("horizon", horizon, "forecast horizon must be greater than 0"));
        }
        if i32::try_from(horizon).is_err() {
            return Err(EngineError::invalid_parameter("horizon", horizon, "forecast horizon is too large"));
        }
        if lookback <= Duration::zero() {
            return Err(EngineError::invalid_parameter(
                "lookback",
                format!("{}s", lookback.num_seconds()),
                "lookback must be a positive duration",
            ));
        }
        Ok(Self { horizon, lookback })
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn lookback(&self) -> Duration {
        self.lookback
    }
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self {
            horizon: DEFAULT_HORIZON,
            lookback: Duration::hours(DEFAULT_LOOKBACK_HOURS),
        }
    }
}

/// Fits a line over the trailing `lookback` of `series` and projects it
/// `horizon` steps forward.
///
/// The regressor is the observation's ordinal position, not its timestamp, so
/// projected points are evenly spaced in observation count. Their timestamps
/// are placed at the sub-window's median sampling interval after the last
/// observation. The band is `±1.96·RMSE` at every step and does not widen
/// with distance from the fitted data.
pub fn forecast(series: &TimeSeries, params: &ForecastParams) -> Result<ForecastResult> {
    let window = series.trailing(params.lookback)?;
    let (Some(last), true) = (window.last(), window.len() >= 2) else {
        return Err(EngineError::InsufficientData {
            context: "linear trend forecast",
            required: 2,
            available: window.len(),
        });
    };
    let anchor = last.timestamp;
    let step = median_step(&window.timestamps());
    let timestamps = project_timestamps(anchor, step, params.horizon)?;

    let prices = window.prices();
    let fit = fit_ols(&prices);
    let rmse = residual_rmse(&prices, &fit);
    let margin = Z_95 * rmse;

    let last_position = (prices.len() - 1) as f64;
    let predictions: Vec<f64> = (1..=params.horizon)
        .map(|k| fit.predict(last_position + k as f64))
        .collect();
    let lower = predictions.iter().map(|p| p - margin).collect();
    let upper = predictions.iter().map(|p| p + margin).collect();

    tracing::debug!(
        observations = window.len(),
        slope = fit.slope,
        intercept = fit.intercept,
        rmse,
        step_seconds = step.num_seconds(),
        "Fitted linear trend"
    );

    Ok(ForecastResult {
        anchor,
        timestamps,
        predictions,
        lower,
        upper,
        rmse,
        fit,
        step_seconds: step.num_seconds(),
        history: window.observations().to_vec(),
    })
}

/// `horizon` timestamps spaced `step` apart after `anchor`. Fails when the
/// last one falls outside the representable calendar.
fn project_timestamps(anchor: DateTime<Utc>, step: Duration, horizon: usize) -> Result<Vec<DateTime<Utc>>> {
    let steps = i32::try_from(horizon)
        .map_err(|_| EngineError::invalid_parameter("horizon", horizon, "forecast horizon is too large"))?;
    (1..=steps)
        .map(|k| {
            step.checked_mul(k)
                .and_then(|offset| anchor.checked_add_signed(offset))
                .ok_or_else(|| {
                    EngineError::invalid_parameter(
                        "horizon",
                        horizon,
                        format!("step {} projects past the representable timestamp range", k),
                    )
                })
        })
        .collect()
}

/// Median gap between consecutive timestamps. Overnight and weekend gaps are
/// outliers in intraday data and the median ignores them.
fn median_step(timestamps: &[DateTime<Utc>]) -> Duration {
    let mut gaps: Vec<Duration> = timestamps.windows(2).map(|w| w[1] - w[0]).collect();
    gaps.sort();
    match gaps.len() {
        0 => Duration::hours(1),
        n if n % 2 == 1 => gaps[n / 2],
        n => (gaps[n / 2 - 1] + gaps[n / 2]) / 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::models::Observation;

    fn base() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 6, 13, 30, 0).unwrap()
    }

    fn hourly(prices: &[f64]) -> TimeSeries {
        TimeSeries::new(
            prices
                .iter()
                .enumerate()
                .map(|(i, &p)| Observation::new(base() + Duration::hours(i as i64), p))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_linear_series_forecast() {
        let prices: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let result = forecast(&hourly(&prices), &ForecastParams::default()).unwrap();

        assert_eq!(result.horizon(), 24);
        assert_eq!(result.timestamps.len(), 24);
        assert_eq!(result.lower.len(), 24);
        assert_eq!(result.upper.len(), 24);
        assert!(result.rmse < 1e-9, "rmse should vanish on a perfect line: {}", result.rmse);
        assert!(result.predictions.windows(2).all(|w| w[1] > w[0]));
        assert!((result.predictions[0] - 41.0).abs() < 1e-9);
        assert!((result.predictions[23] - 64.0).abs() < 1e-9);

        let width = result.upper[0] - result.lower[0];
        for k in 0..24 {
            assert!(result.lower[k] <= result.predictions[k] && result.predictions[k] <= result.upper[k]);
            assert!(((result.upper[k] - result.lower[k]) - width).abs() < 1e-9);
        }
    }

    #[test]
    fn test_future_timestamps_follow_last_observation() {
        let prices: Vec<f64> = (1..=40).map(|i| i as f64).collect();
        let result = forecast(&hourly(&prices), &ForecastParams::new(3, Duration::weeks(2)).unwrap()).unwrap();
        let last = base() + Duration::hours(39);
        assert_eq!(result.anchor, last);
        assert_eq!(result.step_seconds, 3600);
        assert_eq!(
            result.timestamps,
            vec![last + Duration::hours(1), last + Duration::hours(2), last + Duration::hours(3)]
        );
    }

    #[test]
    fn test_noisy_series_band_is_symmetric() {
        let prices = [100.0, 101.5, 100.8, 102.2, 101.9, 103.4, 102.8, 104.1];
        let result = forecast(&hourly(&prices), &ForecastParams::new(5, Duration::days(1)).unwrap()).unwrap();
        assert!(result.rmse > 0.0);
        for k in 0..5 {
            let below = result.predictions[k] - result.lower[k];
            let above = result.upper[k] - result.predictions[k];
            assert!((below - Z_95 * result.rmse).abs() < 1e-9);
            assert!((above - Z_95 * result.rmse).abs() < 1e-9);
        }
        assert_eq!(result.history.len(), prices.len());
    }

    #[test]
    fn test_lookback_limits_fitted_window() {
        // 20 days of hourly prices: the first half flat, the last two days rising.
        let mut prices = vec![50.0; 20 * 24 - 48];
        prices.extend((1..=48).map(|i| 50.0 + i as f64));
        let series = hourly(&prices);
        let params = ForecastParams::new(1, Duration::hours(48)).unwrap();
        let result = forecast(&series, &params).unwrap();
        assert_eq!(result.history.len(), 48);
        assert!((result.fit.slope - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_overnight_gaps_use_median_step() {
        // Two sessions of hourly bars separated by an overnight gap.
        let day1 = (0..7).map(|h| base() + Duration::hours(h));
        let day2 = (0..7).map(|h| base() + Duration::hours(24 + h));
        let observations: Vec<Observation> = day1
            .chain(day2)
            .enumerate()
            .map(|(i, ts)| Observation::new(ts, 10.0 + i as f64))
            .collect();
        let series = TimeSeries::new(observations).unwrap();
        let result = forecast(&series, &ForecastParams::new(2, Duration::weeks(2)).unwrap()).unwrap();
        assert_eq!(result.step_seconds, 3600);
        assert_eq!(result.timestamps[0], base() + Duration::hours(31));
    }

    #[test]
    fn test_single_observation_is_insufficient() {
        let err = forecast(&hourly(&[42.0]), &ForecastParams::default()).unwrap_err();
        match err {
            EngineError::InsufficientData { required, available, .. } => {
                assert_eq!(required, 2);
                assert_eq!(available, 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_empty_series_is_insufficient() {
        let err = forecast(&TimeSeries::empty(), &ForecastParams::default()).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData { available: 0, .. }));
    }

    #[test]
    fn test_stale_history_outside_lookback_is_insufficient() {
        let observations = vec![
            Observation::new(base(), 1.0),
            Observation::new(base() + Duration::days(30), 2.0),
        ];
        let series = TimeSeries::new(observations).unwrap();
        let err = forecast(&series, &ForecastParams::default()).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientData { available: 1, .. }));
    }

    #[test]
    fn test_invalid_params() {
        let err = ForecastParams::new(0, Duration::weeks(2)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { name: "horizon", .. }));
        let err = ForecastParams::new(24, Duration::zero()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { name: "lookback", .. }));
        assert!(ForecastParams::new(24, Duration::hours(-3)).is_err());
    }

    #[test]
    fn test_horizon_beyond_step_count_rejected() {
        let too_many = i32::MAX as usize + 1;
        let err = ForecastParams::new(too_many, Duration::weeks(2)).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { name: "horizon", .. }));
        assert!(ForecastParams::new(usize::MAX, Duration::weeks(2)).is_err());
    }

    #[test]
    fn test_projection_past_calendar_end_is_error() {
        let anchor = DateTime::<Utc>::MAX_UTC - Duration::days(2);
        let observations = vec![
            Observation::new(anchor - Duration::days(1), 1.0),
            Observation::new(anchor, 2.0),
        ];
        let series = TimeSeries::new(observations).unwrap();

        let result = forecast(&series, &ForecastParams::new(2, Duration::weeks(2)).unwrap()).unwrap();
        assert_eq!(result.timestamps.last(), Some(&(anchor + Duration::days(2))));

        let err = forecast(&series, &ForecastParams::new(5, Duration::weeks(2)).unwrap()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { name: "horizon", .. }));
    }

    #[test]
    fn test_calendar_wide_step_is_error() {
        // One gap spanning nearly the whole calendar makes even the first step overflow.
        let observations = vec![
            Observation::new(DateTime::<Utc>::MIN_UTC + Duration::days(1), 1.0),
            Observation::new(DateTime::<Utc>::MAX_UTC - Duration::days(1), 2.0),
        ];
        let series = TimeSeries::new(observations).unwrap();
        let err = forecast(&series, &ForecastParams::new(1, Duration::MAX).unwrap()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidParameter { name: "horizon", .. }));
    }

    #[test]
    fn test_forecast_is_deterministic() {
        let prices: Vec<f64> = (0..60).map(|i| 20.0 + (i as f64 * 0.37).sin() * 3.0 + i as f64 * 0.1).collect();
        let series = hourly(&prices);
        let params = ForecastParams::default();
        let a = forecast(&series, &params).unwrap();
        let b = forecast(&series, &params).unwrap();
        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.predictions), bits(&b.predictions));
        assert_eq!(bits(&a.lower), bits(&b.lower));
        assert_eq!(bits(&a.upper), bits(&b.upper));
        assert_eq!(a.rmse.to_bits(), b.rmse.to_bits());
    }
}
