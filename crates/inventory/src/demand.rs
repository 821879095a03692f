//! Discrete empirical demand-size distribution.

use stochsim_core::{ConfigError, RandomSource};

const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Demand sizes with their probabilities, sampled by cumulative inversion.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandDistribution {
    values: Vec<i64>,
    probabilities: Vec<f64>,
    cumulative: Vec<f64>,
}

impl DemandDistribution {
    /// Build a distribution. Probabilities must be non-negative, one per
    /// value, and sum to 1.
    pub fn new(values: Vec<i64>, probabilities: Vec<f64>) -> Result<Self, ConfigError> {
        if values.is_empty() {
            return Err(ConfigError::invalid("demand", "at least one demand size is required"));
        }
        if values.len() != probabilities.len() {
            return Err(ConfigError::invalid(
                "demand",
                format!(
                    "{} sizes but {} probabilities",
                    values.len(),
                    probabilities.len()
                ),
            ));
        }
        if probabilities.iter().any(|p| !(p.is_finite() && *p >= 0.0)) {
            return Err(ConfigError::invalid("demand", "probabilities must be non-negative"));
        }

        let cumulative: Vec<f64> = probabilities
            .iter()
            .scan(0.0, |acc, p| {
                *acc += p;
                Some(*acc)
            })
            .collect();
        let total = cumulative.last().copied().unwrap_or(0.0);
        if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
            return Err(ConfigError::invalid(
                "demand",
                format!("probabilities sum to {total}, expected 1"),
            ));
        }

        Ok(Self {
            values,
            probabilities,
            cumulative,
        })
    }

    /// Demand sizes.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Probability of each demand size.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Mean demand size.
    pub fn mean(&self) -> f64 {
        self.values
            .iter()
            .zip(&self.probabilities)
            .map(|(v, p)| *v as f64 * p)
            .sum()
    }

    /// Demand size for a uniform draw `r` in `[0, 1)`: the first size whose
    /// cumulative probability exceeds `r`.
    pub fn invert(&self, r: f64) -> i64 {
        let index = self
            .cumulative
            .iter()
            .position(|c| r < *c)
            .unwrap_or(self.values.len() - 1);
        self.values[index]
    }

    /// Draw a demand size.
    pub fn sample(&self, rng: &mut dyn RandomSource) -> i64 {
        self.invert(rng.uniform())
    }
}

impl Default for DemandDistribution {
    fn default() -> Self {
        Self {
            values: vec![1, 2, 3, 4],
            probabilities: vec![1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0],
            cumulative: vec![1.0 / 6.0, 0.5, 5.0 / 6.0, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inversion_picks_smallest_exceeding_bucket() {
        let demand = DemandDistribution::default();
        assert_eq!(demand.invert(0.0), 1);
        assert_eq!(demand.invert(0.1), 1);
        assert_eq!(demand.invert(0.2), 2);
        assert_eq!(demand.invert(0.5), 3);
        assert_eq!(demand.invert(0.84), 4);
        assert_eq!(demand.invert(0.999_999), 4);
    }

    #[test]
    fn test_zero_probability_bucket_is_skipped() {
        let demand = DemandDistribution::new(vec![5, 6, 7], vec![0.5, 0.0, 0.5]).unwrap();
        assert_eq!(demand.invert(0.49), 5);
        assert_eq!(demand.invert(0.5), 7);
    }

    #[test]
    fn test_default_matches_explicit_construction() {
        let explicit =
            DemandDistribution::new(vec![1, 2, 3, 4], vec![1.0 / 6.0, 1.0 / 3.0, 1.0 / 3.0, 1.0 / 6.0])
                .unwrap();
        for r in [0.0, 0.16, 0.17, 0.49, 0.51, 0.83, 0.84, 0.99] {
            assert_eq!(explicit.invert(r), DemandDistribution::default().invert(r));
        }
        assert!((explicit.mean() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_invalid_tables() {
        assert!(DemandDistribution::new(vec![], vec![]).is_err());
        assert!(DemandDistribution::new(vec![1, 2], vec![1.0]).is_err());
        assert!(DemandDistribution::new(vec![1, 2], vec![0.5, 0.6]).is_err());
        assert!(DemandDistribution::new(vec![1, 2], vec![-0.5, 1.5]).is_err());
    }
}
