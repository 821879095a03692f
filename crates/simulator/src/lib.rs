//! Stochsim Simulator
//!
//! Batch experiments on top of the simulation runner: many independent
//! replications of a model over a parameter grid, summarized with
//! confidence intervals and optionally rendered as charts.
//!
//! # Architecture
//!
//! ```text
//!   ParameterVariator ──points()──► Experiment ──run()/run_parallel()──┐
//!                                     │  IndexMap<key, Combination>    │
//!                                     │    └─ Vec<Simulation<M>>  ◄────┘
//!                                     │
//!                                   report()
//!                                     ▼
//!                              ExperimentReport ──Display/Serialize
//!                                     │
//!                              render_report(&mut dyn Plotter)
//!                                     ▼
//!                  images/generated/*.svg + figures/*-content.tex
//! ```
//!
//! # Example
//!
//! ```ignore
//! use stochsim_queueing::QueueVariator;
//! use stochsim_simulator::{Experiment, ExperimentConfig};
//!
//! let grid = QueueVariator::new(2.0, vec![0.25, 0.5, 0.75], vec![None, Some(5)]);
//! let mut experiment = Experiment::new(grid, ExperimentConfig::new(100))?;
//! experiment.run_parallel()?;
//! println!("{}", experiment.report()?);
//! ```

pub mod config;
pub mod error;
pub mod experiment;
pub mod report;
pub mod stats;

pub use config::ExperimentConfig;
pub use error::{ExperimentError, ReportError};
pub use experiment::{Combination, Experiment};
pub use report::{
    render_report, Aggregate, ChartSpec, CombinationReport, ErrorBar, ExperimentReport,
    MeasureSummary, Plotter, SvgPlotter, TemporalSeries,
};
pub use stats::{ConfidenceInterval, ScalarSummary, StatsError};
