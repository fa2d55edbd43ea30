// Validated, immutable price history consumed by every analytics function.
use chrono::{DateTime, Duration, Utc};
use shared::models::Observation;

use crate::error::{EngineError, Result};

/// Ordered `(timestamp, price)` observations.
///
/// Timestamps are strictly increasing and prices finite and non-negative.
/// Spacing is not assumed to be uniform: sessions close overnight and on
/// weekends, so gaps are expected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimeSeries {
    observations: Vec<Observation>,
}

impl TimeSeries {
    pub fn new(observations: Vec<Observation>) -> Result<Self> {
        for (idx, obs) in observations.iter().enumerate() {
            if !obs.price.is_finite() || obs.price < 0.0 {
                return Err(EngineError::InvalidSeries(format!(
                    "price at index {} must be finite and non-negative, got {}",
                    idx, obs.price
                )));
            }
            if idx > 0 && obs.timestamp <= observations[idx - 1].timestamp {
                return Err(EngineError::InvalidSeries(format!(
                    "timestamp at index {} ({}) does not follow {}",
                    idx,
                    obs.timestamp,
                    observations[idx - 1].timestamp
                )));
            }
        }
        Ok(Self { observations })
    }

    /// Sorts by timestamp and keeps the last entry seen for a repeated timestamp.
    pub fn from_unordered(mut observations: Vec<Observation>) -> Result<Self> {
        // Reversed first so the stable sort puts the latest duplicate at the
        // head of each run, which is the one dedup keeps.
        observations.reverse();
        observations.sort_by_key(|o| o.timestamp);
        observations.dedup_by_key(|o| o.timestamp);
        Self::new(observations)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn prices(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.price).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.observations.iter().map(|o| o.timestamp).collect()
    }

    pub fn first(&self) -> Option<&Observation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&Observation> {
        self.observations.last()
    }

    /// Observations strictly newer than `last.timestamp - span`.
    ///
    /// A span reaching past the earliest representable instant keeps the
    /// whole series.
    pub fn trailing(&self, span: Duration) -> Result<TimeSeries> {
        if span <= Duration::zero() {
            return Err(EngineError::invalid_parameter(
                "span",
                format!("{}s", span.num_seconds()),
                "must be a positive duration",
            ));
        }
        let Some(last) = self.last() else {
            return Ok(TimeSeries::empty());
        };
        let Some(cutoff) = last.timestamp.checked_sub_signed(span) else {
            return Ok(self.clone());
        };
        let start = self.observations.partition_point(|o| o.timestamp <= cutoff);
        Ok(TimeSeries {
            observations: self.observations[start..].to_vec(),
        })
    }
}
