//! Statistical and temporal measure bindings.
//!
//! A model declares its measures once, as a table of keys bound to plain
//! function pointers. Reporting evaluates every binding against each finished
//! replication and aggregates the results by key.

/// How a measure reads its value from a model.
pub enum Accessor<M> {
    /// One real per replication.
    Scalar(fn(&M) -> f64),
    /// One sequence per replication (e.g. a frequency table indexed by value).
    Distribution(fn(&M) -> Vec<f64>),
}

impl<M> Clone for Accessor<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Accessor<M> {}

/// A value read from one replication.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureValue {
    /// Scalar measure value.
    Scalar(f64),
    /// Distributional measure value.
    Distribution(Vec<f64>),
}

/// A named derived quantity bound to a pure accessor.
pub struct StatisticalMeasure<M> {
    /// Stable key, unique within a model type.
    pub key: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// Short symbol for captions (LaTeX math allowed).
    pub symbol: &'static str,
    /// Label for the value axis.
    pub x_label: &'static str,
    /// How the value is read.
    pub accessor: Accessor<M>,
}

impl<M> Clone for StatisticalMeasure<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for StatisticalMeasure<M> {}

impl<M> StatisticalMeasure<M> {
    /// Declare a scalar measure.
    pub const fn scalar(
        key: &'static str,
        title: &'static str,
        symbol: &'static str,
        x_label: &'static str,
        read: fn(&M) -> f64,
    ) -> Self {
        Self {
            key,
            title,
            symbol,
            x_label,
            accessor: Accessor::Scalar(read),
        }
    }

    /// Declare a distributional measure.
    pub const fn distribution(
        key: &'static str,
        title: &'static str,
        symbol: &'static str,
        x_label: &'static str,
        read: fn(&M) -> Vec<f64>,
    ) -> Self {
        Self {
            key,
            title,
            symbol,
            x_label,
            accessor: Accessor::Distribution(read),
        }
    }

    /// Whether this measure yields one sequence per replication.
    pub fn is_distribution(&self) -> bool {
        matches!(self.accessor, Accessor::Distribution(_))
    }

    /// Read the measure from a model.
    pub fn evaluate(&self, model: &M) -> MeasureValue {
        match self.accessor {
            Accessor::Scalar(read) => MeasureValue::Scalar(read(model)),
            Accessor::Distribution(read) => MeasureValue::Distribution(read(model)),
        }
    }
}

/// A step trajectory: `values[i]` holds from `times[i]` until `times[i + 1]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeries {
    /// Sample times, non-decreasing.
    pub times: Vec<f64>,
    /// Value at each sample time.
    pub values: Vec<f64>,
}

impl TimeSeries {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample.
    pub fn push(&mut self, time: f64, value: f64) {
        self.times.push(time);
        self.values.push(value);
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the series holds no samples.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// A named trajectory recorded during a run.
pub struct TemporalMeasure<M> {
    /// Stable key, unique within a model type.
    pub key: &'static str,
    /// Human-readable title.
    pub title: &'static str,
    /// Label for the time axis.
    pub x_label: &'static str,
    /// Label for the value axis.
    pub y_label: &'static str,
    /// How the trajectory is read.
    pub series: fn(&M) -> TimeSeries,
}

impl<M> Clone for TemporalMeasure<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for TemporalMeasure<M> {}

impl<M> TemporalMeasure<M> {
    /// Read the trajectory from a model.
    pub fn evaluate(&self, model: &M) -> TimeSeries {
        (self.series)(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        hits: u32,
    }

    fn hits(c: &Counter) -> f64 {
        c.hits as f64
    }

    fn table(c: &Counter) -> Vec<f64> {
        vec![0.0; c.hits as usize]
    }

    #[test]
    fn test_scalar_measure_evaluates() {
        let m = StatisticalMeasure::scalar("hits", "Hits", "h", "", hits);
        assert!(!m.is_distribution());
        assert_eq!(m.evaluate(&Counter { hits: 3 }), MeasureValue::Scalar(3.0));
    }

    #[test]
    fn test_distribution_measure_evaluates() {
        let m = StatisticalMeasure::distribution("table", "Table", "t", "n", table);
        assert!(m.is_distribution());
        assert_eq!(
            m.evaluate(&Counter { hits: 2 }),
            MeasureValue::Distribution(vec![0.0, 0.0])
        );
    }
}
