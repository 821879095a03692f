//! Core types for deterministic discrete-event simulation.
//!
//! This crate defines the vocabulary shared by the runner, the models and the
//! experiment harness:
//!
//! - [`Event`]: a timestamped occurrence carrying a model-specific kind
//! - [`Model`]: the state machine a simulation drives, one event at a time
//! - [`Context`]: what an event handler may touch (clock, scheduler, randomness)
//! - [`RandomSource`]: the seeded random-variate capability
//! - [`StatisticalMeasure`] / [`TemporalMeasure`]: statically declared
//!   accessors that reporting evaluates against finished models
//! - [`ParameterVariator`]: the parameter grid an experiment sweeps
//!
//! Nothing here owns a clock or a random stream; see `stochsim-simulation`.

mod error;
mod event;
mod measure;
mod random;
mod traits;

pub use error::{ConfigError, SimError};
pub use event::Event;
pub use measure::{Accessor, MeasureValue, StatisticalMeasure, TemporalMeasure, TimeSeries};
pub use random::RandomSource;
pub use traits::{Context, Model, ParameterVariator};
