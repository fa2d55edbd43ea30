// Closed-form ordinary least squares over ordinal positions.
use shared::models::TrendFit;

/// Fits `y ≈ intercept + slope * x` with `x = 0, 1, .., n - 1`.
///
/// Requires at least two values; with fewer the slope is undefined and the
/// caller has to reject the input first.
pub fn fit_ols(values: &[f64]) -> TrendFit {
    debug_assert!(values.len() >= 2);
    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let (sxy, sxx) = values.iter().enumerate().fold((0.0, 0.0), |(sxy, sxx), (i, &y)| {
        let dx = i as f64 - x_mean;
        (sxy + dx * (y - y_mean), sxx + dx * dx)
    });

    let slope = sxy / sxx;
    TrendFit {
        intercept: y_mean - slope * x_mean,
        slope,
    }
}

/// Root-mean-square of in-sample residuals (population mean of squared errors).
pub fn residual_rmse(values: &[f64], fit: &TrendFit) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sse: f64 = values
        .iter()
        .enumerate()
        .map(|(i, &y)| (y - fit.predict(i as f64)).powi(2))
        .sum();
    (sse / values.len() as f64).sqrt()
}
