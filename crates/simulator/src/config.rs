//! Configuration types for experiments.

use stochsim_core::ConfigError;

/// Configuration for a multi-replication experiment.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentConfig {
    /// Independent replications per parameter combination.
    pub replications: usize,

    /// Base seed; every replication seed is derived from it.
    pub seed: u64,

    /// Confidence level for interval estimates.
    pub confidence: f64,

    /// Run replications on the rayon thread pool.
    pub parallel: bool,
}

impl ExperimentConfig {
    /// Create a configuration with the given replication count.
    pub fn new(replications: usize) -> Self {
        Self {
            replications,
            seed: 12345,
            confidence: 0.95,
            parallel: false,
        }
    }

    /// Set the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the confidence level.
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    /// Run replications in parallel.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check that every parameter is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.replications == 0 {
            return Err(ConfigError::invalid("replications", "must be at least 1"));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(ConfigError::invalid(
                "confidence",
                format!("must be in (0, 1), got {}", self.confidence),
            ));
        }
        Ok(())
    }
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self::new(100)
    }
}
