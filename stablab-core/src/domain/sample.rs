//! MetricSample and MetricSeries — the fundamental input units.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single observation of one metric on one day.
///
/// Produced externally by the data-acquisition collaborators. Immutable here:
/// the engine never edits raw values, it only transforms them into scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSample {
    pub metric_id: String,
    pub date: NaiveDate,
    pub raw_value: f64,
}

/// A time-ordered raw series for one metric, with an explicit availability
/// flag supplied by the acquisition layer.
///
/// `available == false` means the upstream feed reported the metric as down;
/// the normalizer marks the metric missing without looking at the samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSeries {
    pub metric_id: String,
    pub samples: Vec<MetricSample>,
    pub available: bool,
}

impl MetricSeries {
    /// Returns true if the samples are strictly ascending by date.
    pub fn is_time_ordered(&self) -> bool {
        self.samples.windows(2).all(|w| w[0].date < w[1].date)
    }

    /// The most recent sample, if any.
    pub fn latest(&self) -> Option<&MetricSample> {
        self.samples.last()
    }

    /// Raw values in time order.
    pub fn raw_values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.raw_value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series() -> MetricSeries {
        let base = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        MetricSeries {
            metric_id: "yield_spread_10y2y".into(),
            samples: (0..5)
                .map(|i| MetricSample {
                    metric_id: "yield_spread_10y2y".into(),
                    date: base + chrono::Duration::days(i),
                    raw_value: 0.5 + i as f64 * 0.1,
                })
                .collect(),
            available: true,
        }
    }

    #[test]
    fn series_is_time_ordered() {
        assert!(sample_series().is_time_ordered());
    }

    #[test]
    fn series_detects_out_of_order() {
        let mut series = sample_series();
        series.samples.swap(1, 3);
        assert!(!series.is_time_ordered());
    }

    #[test]
    fn latest_is_last_sample() {
        let series = sample_series();
        let latest = series.latest().unwrap();
        assert_eq!(latest.raw_value, 0.9);
    }

    #[test]
    fn series_serialization_roundtrip() {
        let series = sample_series();
        let json = serde_json::to_string(&series).unwrap();
        let deser: MetricSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(series.metric_id, deser.metric_id);
        assert_eq!(series.samples.len(), deser.samples.len());
        assert_eq!(series.available, deser.available);
    }
}
