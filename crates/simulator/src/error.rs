//! Error types for experiments and reporting.

use stochsim_core::{ConfigError, SimError};
use thiserror::Error;

use crate::stats::StatsError;

/// Errors while building, running or summarizing an experiment.
#[derive(Debug, Error)]
pub enum ExperimentError {
    /// A model or experiment parameter is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A replication aborted.
    #[error("simulation failed: {0}")]
    Simulation(#[from] SimError),

    /// Aggregation failed.
    #[error("statistics failed: {0}")]
    Stats(#[from] StatsError),

    /// The parameter grid is empty.
    #[error("parameter grid yielded no combinations")]
    NoCombinations,

    /// Two grid points map to the same key.
    #[error("parameter grid yields combination `{0}` more than once")]
    DuplicateCombination(String),

    /// A report was requested before every replication finished.
    #[error("combination `{key}` has unfinished replications")]
    NotRun {
        /// Combination key.
        key: String,
    },

    /// No combination has this key.
    #[error("unknown combination `{0}`")]
    UnknownCombination(String),
}

/// Errors while rendering charts or caption files.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The chart backend failed.
    #[error("render error: {0}")]
    Render(String),
}
