//! Aggregated experiment results and their rendering.
//!
//! [`ExperimentReport`] is plain data: it prints as text through `Display`
//! and serializes through `serde`. Charts are drawn by walking a report with
//! [`render_report`] against any [`Plotter`].

pub mod latex;
pub mod plot;

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::ReportError;
use crate::stats::ScalarSummary;

pub use plot::{ErrorBar, Plotter, SvgPlotter};

/// Results of a whole experiment.
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    /// Distinct model names across combinations, in grid order.
    pub models: Vec<String>,
    /// Replications per combination.
    pub replications: usize,
    /// Confidence level of every interval.
    pub confidence: f64,
    /// One entry per combination, in grid order.
    pub combinations: Vec<CombinationReport>,
}

/// Results of one parameter combination.
#[derive(Debug, Clone, Serialize)]
pub struct CombinationReport {
    /// Grid key, e.g. `75_inf`.
    pub key: String,
    /// Model name for this combination.
    pub model: String,
    /// Human-readable parameters.
    pub description: String,
    /// Index of the replication whose details are shown.
    pub sample_replication: usize,
    /// Seed of that replication.
    pub sample_seed: u64,
    /// Text report of that replication.
    pub sample_report: String,
    /// Cross-replication summaries.
    pub measures: Vec<MeasureSummary>,
    /// Trajectories of the sample replication.
    pub temporal: Vec<TemporalSeries>,
}

impl CombinationReport {
    /// Find a measure summary by key.
    pub fn measure(&self, key: &str) -> Option<&MeasureSummary> {
        self.measures.iter().find(|m| m.key == key)
    }
}

/// Summary of one statistical measure across replications.
#[derive(Debug, Clone, Serialize)]
pub struct MeasureSummary {
    /// Measure key, e.g. `average_delay`.
    pub key: String,
    /// Human-readable title.
    pub title: String,
    /// Short symbol, may hold LaTeX math.
    pub symbol: String,
    /// Label for the value axis.
    pub x_label: String,
    /// Per-replication values and their summary.
    pub aggregate: Aggregate,
}

/// Aggregated values of a measure.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Aggregate {
    /// One value per replication.
    Scalar {
        /// Value of each replication, in replication order.
        samples: Vec<f64>,
        /// Mean, spread and interval of `samples`.
        summary: ScalarSummary,
    },
    /// One summary per element of a zero-padded sequence.
    Distribution {
        /// Summary of element `i` across replications.
        elements: Vec<ScalarSummary>,
    },
}

/// A step trajectory from the sample replication.
#[derive(Debug, Clone, Serialize)]
pub struct TemporalSeries {
    /// Trajectory key, e.g. `queue_len_over_time`.
    pub key: String,
    /// Human-readable title.
    pub title: String,
    /// Label for the time axis.
    pub x_label: String,
    /// Label for the value axis.
    pub y_label: String,
    /// Sample times, non-decreasing.
    pub times: Vec<f64>,
    /// Value held from each sample time on.
    pub values: Vec<f64>,
}

impl fmt::Display for ExperimentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Experiment {}: {} replications per combination, {:.0}% confidence",
            self.models.join(", "),
            self.replications,
            self.confidence * 100.0
        )?;
        for combination in &self.combinations {
            writeln!(f)?;
            write!(f, "{combination}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CombinationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} [{}] {} ==", self.model, self.key, self.description)?;
        writeln!(
            f,
            "Sample replication #{} (seed {}):",
            self.sample_replication, self.sample_seed
        )?;
        for line in self.sample_report.lines() {
            writeln!(f, "  {line}")?;
        }
        writeln!(f, "Across replications:")?;
        for measure in &self.measures {
            match &measure.aggregate {
                Aggregate::Scalar { summary, .. } => writeln!(
                    f,
                    "  {:<40} {:>10.4}  [{:.4}, {:.4}]",
                    format!("{} ({})", measure.title, measure.symbol),
                    summary.mean,
                    summary.interval.lower,
                    summary.interval.upper
                )?,
                Aggregate::Distribution { elements } => {
                    writeln!(f, "  {} ({}):", measure.title, measure.symbol)?;
                    for (i, element) in elements.iter().enumerate() {
                        writeln!(
                            f,
                            "    {:>4} {:>10.4}  [{:.4}, {:.4}]",
                            i, element.mean, element.interval.lower, element.interval.upper
                        )?;
                    }
                }
            }
        }
        Ok(())
    }
}

/// Identifies one chart and its caption.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    /// File stem, unique within an output directory.
    pub name: String,
    /// Chart title, also used as the caption.
    pub title: String,
    /// Label for the horizontal axis.
    pub x_label: String,
    /// Label for the vertical axis.
    pub y_label: String,
}

/// Draw every chart of `report`:
/// a histogram per scalar measure, error bars per distributional measure and
/// a step plot per trajectory.
pub fn render_report(
    report: &ExperimentReport,
    plotter: &mut dyn Plotter,
) -> Result<usize, ReportError> {
    let mut charts = 0;
    for combination in &report.combinations {
        for measure in &combination.measures {
            let title = format!("{} ({})", measure.title, combination.description);
            let name = format!("{}-{}", measure.key, combination.key);
            match &measure.aggregate {
                Aggregate::Scalar { samples, .. } => {
                    let chart = ChartSpec {
                        name,
                        title,
                        x_label: measure.x_label.clone(),
                        y_label: "Replications".to_string(),
                    };
                    plotter.histogram(&chart, samples)?;
                }
                Aggregate::Distribution { elements } => {
                    let chart = ChartSpec {
                        name,
                        title,
                        x_label: measure.x_label.clone(),
                        y_label: measure.symbol.clone(),
                    };
                    let bars: Vec<ErrorBar> = elements.iter().map(ErrorBar::from).collect();
                    plotter.bars_with_error(&chart, &bars)?;
                }
            }
            charts += 1;
        }

        for series in &combination.temporal {
            let chart = ChartSpec {
                name: format!("{}-{}", series.key, combination.key),
                title: format!("{} ({})", series.title, combination.description),
                x_label: series.x_label.clone(),
                y_label: series.y_label.clone(),
            };
            let points: Vec<(f64, f64)> = series
                .times
                .iter()
                .copied()
                .zip(series.values.iter().copied())
                .collect();
            plotter.step_series(&chart, &points)?;
            charts += 1;
        }
    }
    debug!(charts, "Report rendered");
    Ok(charts)
}
