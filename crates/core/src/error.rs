//! Error types shared across the simulation crates.

use thiserror::Error;

/// Errors raised while driving a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// The pending-event set ran dry before the termination predicate held.
    ///
    /// No path in the model leads to termination; the run cannot continue.
    #[error("event list empty at clock {clock} before the simulation finished")]
    EmptyEventSet {
        /// Clock value when the condition was detected.
        clock: f64,
    },

    /// `step()` was called after the termination predicate became true.
    #[error("simulation already finished at clock {clock}")]
    AlreadyFinished {
        /// Clock value of the finished simulation.
        clock: f64,
    },

    /// The model scheduled no event while bootstrapping.
    #[error("model scheduled no bootstrap events")]
    NoBootstrapEvents,
}

/// Invalid model or experiment configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A parameter is outside its valid range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl ConfigError {
    /// Shorthand for [`ConfigError::InvalidParameter`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
