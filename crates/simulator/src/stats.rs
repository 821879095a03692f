//! Sample statistics and confidence intervals across replications.

use serde::Serialize;
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};
use thiserror::Error;

/// Sample size from which the normal approximation replaces Student's t.
pub const NORMAL_APPROXIMATION_MIN_SAMPLES: usize = 30;

/// Errors computing sample statistics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    /// No values to summarize.
    #[error("cannot summarize an empty sample")]
    EmptySample,

    /// Confidence level outside `(0, 1)`.
    #[error("confidence level must be in (0, 1), got {0}")]
    InvalidConfidence(f64),

    /// The quantile distribution could not be built.
    #[error("distribution error: {0}")]
    Distribution(String),
}

/// A closed interval estimate of a population mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    /// Lower bound.
    pub lower: f64,
    /// Upper bound.
    pub upper: f64,
}

impl ConfidenceInterval {
    /// A zero-width interval at `value`.
    pub fn point(value: f64) -> Self {
        Self {
            lower: value,
            upper: value,
        }
    }

    /// Half the interval width.
    pub fn half_width(&self) -> f64 {
        (self.upper - self.lower) / 2.0
    }
}

/// Mean, spread and interval estimate of one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScalarSummary {
    /// Number of values.
    pub samples: usize,
    /// Sample mean.
    pub mean: f64,
    /// Sample standard deviation (`n - 1` denominator), 0 for one value.
    pub stdev: f64,
    /// Central `confidence` interval of the fitted distribution.
    pub interval: ConfidenceInterval,
}

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation. `None` with fewer than two values.
pub fn sample_stdev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some((ss / (values.len() - 1) as f64).sqrt())
}

/// Two-sided critical value for `confidence` at sample size `n`.
///
/// Standard normal when `n >= 30`, Student's t with `n - 1` degrees of
/// freedom otherwise.
pub fn critical_value(n: usize, confidence: f64) -> Result<f64, StatsError> {
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(StatsError::InvalidConfidence(confidence));
    }
    let p = (1.0 + confidence) / 2.0;
    if n >= NORMAL_APPROXIMATION_MIN_SAMPLES {
        let normal =
            Normal::new(0.0, 1.0).map_err(|e| StatsError::Distribution(e.to_string()))?;
        Ok(normal.inverse_cdf(p))
    } else {
        let freedom = n.saturating_sub(1).max(1) as f64;
        let t = StudentsT::new(0.0, 1.0, freedom)
            .map_err(|e| StatsError::Distribution(e.to_string()))?;
        Ok(t.inverse_cdf(p))
    }
}

/// Central interval holding `confidence` of a normal/t distribution fitted
/// to `values`: half width is the critical value times the sample stdev.
///
/// This describes where a single replication lands. Collapses to a point when
/// the sample has a single value or zero spread.
pub fn confidence_interval(
    values: &[f64],
    confidence: f64,
) -> Result<ConfidenceInterval, StatsError> {
    Ok(summarize(values, confidence)?.interval)
}

/// Interval for the population mean: half width is the critical value times
/// the standard error `stdev / √n`.
pub fn standard_error_interval(
    values: &[f64],
    confidence: f64,
) -> Result<ConfidenceInterval, StatsError> {
    let summary = summarize(values, confidence)?;
    let n = summary.samples as f64;
    let half = summary.interval.half_width() / n.sqrt();
    Ok(ConfidenceInterval {
        lower: summary.mean - half,
        upper: summary.mean + half,
    })
}

fn fitted_interval(
    center: f64,
    scale: f64,
    n: usize,
    confidence: f64,
) -> Result<ConfidenceInterval, StatsError> {
    if scale == 0.0 {
        return Ok(ConfidenceInterval::point(center));
    }
    let half = critical_value(n, confidence)? * scale;
    Ok(ConfidenceInterval {
        lower: center - half,
        upper: center + half,
    })
}

/// Mean, standard deviation and confidence interval of `values`.
pub fn summarize(values: &[f64], confidence: f64) -> Result<ScalarSummary, StatsError> {
    let m = mean(values).ok_or(StatsError::EmptySample)?;
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(StatsError::InvalidConfidence(confidence));
    }

    let stdev = sample_stdev(values).unwrap_or(0.0);
    let interval = fitted_interval(m, stdev, values.len(), confidence)?;

    Ok(ScalarSummary {
        samples: values.len(),
        mean: m,
        stdev,
        interval,
    })
}

/// Align sequences of different lengths by zero-padding, then regroup them
/// element-wise: `result[i]` holds element `i` of every sequence.
pub fn pad_and_transpose(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    (0..width)
        .map(|i| {
            rows.iter()
                .map(|row| row.get(i).copied().unwrap_or(0.0))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_values_collapse_to_point() {
        let values = vec![4.2; 50];
        let interval = confidence_interval(&values, 0.95).unwrap();
        assert_eq!(interval, ConfidenceInterval::point(4.2));

        let few = vec![1.5; 3];
        let summary = summarize(&few, 0.95).unwrap();
        assert_eq!(summary.stdev, 0.0);
        assert_eq!(summary.interval.lower, 1.5);
        assert_eq!(summary.interval.upper, 1.5);
    }

    #[test]
    fn test_single_value_is_a_point() {
        let summary = summarize(&[7.0], 0.9).unwrap();
        assert_eq!(summary.samples, 1);
        assert_eq!(summary.interval, ConfidenceInterval::point(7.0));
    }

    #[test]
    fn test_empty_and_bad_confidence_are_errors() {
        assert_eq!(summarize(&[], 0.95), Err(StatsError::EmptySample));
        assert_eq!(
            summarize(&[1.0, 2.0], 1.0),
            Err(StatsError::InvalidConfidence(1.0))
        );
        assert!(critical_value(10, 0.0).is_err());
    }

    #[test]
    fn test_mean_and_stdev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&values), Some(5.0));
        let s = sample_stdev(&values).unwrap();
        assert!((s - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(sample_stdev(&[1.0]), None);
    }

    #[test]
    fn test_normal_critical_value_for_large_samples() {
        let z = critical_value(30, 0.95).unwrap();
        assert!((z - 1.959_964).abs() < 1e-4, "z = {z}");
    }

    #[test]
    fn test_student_t_is_wider_for_small_samples() {
        let t = critical_value(5, 0.95).unwrap();
        // t(0.975, 4) = 2.776
        assert!((t - 2.776).abs() < 1e-3, "t = {t}");
        assert!(t > critical_value(30, 0.95).unwrap());

        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let interval = confidence_interval(&values, 0.95).unwrap();
        let expected_half = t * sample_stdev(&values).unwrap();
        assert!((interval.half_width() - expected_half).abs() < 1e-12);
        // t(4, loc = 3, scale = 1.5811).interval(0.95)
        assert!((interval.lower - -1.3898).abs() < 1e-3, "{interval:?}");
        assert!((interval.upper - 7.3898).abs() < 1e-3, "{interval:?}");
    }

    #[test]
    fn test_standard_error_interval_is_narrower_by_sqrt_n() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let spread = confidence_interval(&values, 0.95).unwrap();
        let mean_only = standard_error_interval(&values, 0.95).unwrap();
        assert!((mean_only.half_width() * 5f64.sqrt() - spread.half_width()).abs() < 1e-12);
        assert!((mean_only.lower - 1.0368).abs() < 1e-3, "{mean_only:?}");
        assert!((mean_only.upper - 4.9632).abs() < 1e-3, "{mean_only:?}");

        assert_eq!(
            standard_error_interval(&[2.0, 2.0], 0.9).unwrap(),
            ConfidenceInterval::point(2.0)
        );
    }

    #[test]
    fn test_pad_and_transpose_zero_pads() {
        let rows = vec![vec![0.5, 0.5], vec![1.0], vec![0.2, 0.3, 0.5]];
        let columns = pad_and_transpose(&rows);
        assert_eq!(
            columns,
            vec![vec![0.5, 1.0, 0.2], vec![0.5, 0.0, 0.3], vec![0.0, 0.0, 0.5]]
        );
        assert!(pad_and_transpose(&[]).is_empty());
    }
}
