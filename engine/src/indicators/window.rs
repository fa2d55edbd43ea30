// Explicit windowed iteration shared by every rolling indicator.

/// How positions before the first full window are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowPolicy {
    /// Use whatever prefix is available (minimum one sample).
    Partial,
    /// Leave positions with fewer than `window` samples undefined.
    Full,
}

/// Applies `stat` to the trailing window ending at each position.
///
/// The output is aligned with `values`. Each window is handed to `stat` as a
/// slice so statistics are computed directly rather than by running sums.
/// `window` must be non-zero; callers validate it.
pub fn rolling<F>(values: &[f64], window: usize, policy: WindowPolicy, stat: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    debug_assert!(window > 0);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            match policy {
                WindowPolicy::Full if slice.len() < window => None,
                _ => Some(stat(slice)),
            }
        })
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (divides by `n - 1`). Zero for fewer than two samples.
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (values.len() - 1) as f64).sqrt()
}
