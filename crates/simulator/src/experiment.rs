//! Multi-replication experiments over a parameter grid.

use indexmap::IndexMap;
use rayon::prelude::*;
use stochsim_core::{MeasureValue, Model, ParameterVariator, RandomSource};
use stochsim_simulation::{SimRng, Simulation};
use tracing::{debug, info};

use crate::config::ExperimentConfig;
use crate::error::ExperimentError;
use crate::report::{
    Aggregate, CombinationReport, ExperimentReport, MeasureSummary, TemporalSeries,
};
use crate::stats::{pad_and_transpose, summarize};

/// Mixed into the base seed for the stream that picks sample replications.
const REPORT_SEED_SALT: u64 = 0x5eed_0f_4e90_47;

/// The replications of one parameter combination.
pub struct Combination<M: Model> {
    /// Human-readable parameter description.
    pub description: String,
    /// Independent runs sharing the same parameters.
    pub replications: Vec<Simulation<M>>,
}

impl<M: Model> Combination<M> {
    /// Whether every replication reached its termination predicate.
    pub fn is_finished(&self) -> bool {
        self.replications.iter().all(Simulation::is_finished)
    }
}

/// Runs `replications` independent instances of a model for every point of a
/// parameter grid and aggregates their measures.
///
/// Each replication gets its own seed, drawn from a ChaCha stream seeded with
/// the experiment's base seed, so the whole experiment is reproducible.
pub struct Experiment<V: ParameterVariator> {
    variator: V,
    config: ExperimentConfig,
    combinations: IndexMap<String, Combination<V::Model>>,
}

impl<V: ParameterVariator> Experiment<V> {
    /// Instantiate every combination × replication.
    pub fn new(variator: V, config: ExperimentConfig) -> Result<Self, ExperimentError> {
        config.validate()?;
        let points = variator.points();
        if points.is_empty() {
            return Err(ExperimentError::NoCombinations);
        }

        let mut seeds = SimRng::new(config.seed);
        let mut combinations = IndexMap::with_capacity(points.len());
        for point in &points {
            let key = variator.key(point);
            if combinations.contains_key(&key) {
                return Err(ExperimentError::DuplicateCombination(key));
            }
            let replications = (0..config.replications)
                .map(|_| -> Result<_, ExperimentError> {
                    let model = variator.build(point)?;
                    Ok(Simulation::new(model, seeds.next_seed())?)
                })
                .collect::<Result<Vec<_>, _>>()?;

            combinations.insert(
                key,
                Combination {
                    description: variator.describe(point),
                    replications,
                },
            );
        }

        info!(
            combinations = combinations.len(),
            replications = config.replications,
            seed = config.seed,
            "Experiment instantiated"
        );

        Ok(Self {
            variator,
            config,
            combinations,
        })
    }

    /// The parameter grid.
    pub fn variator(&self) -> &V {
        &self.variator
    }

    /// The experiment configuration.
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Combinations in grid order.
    pub fn combinations(&self) -> &IndexMap<String, Combination<V::Model>> {
        &self.combinations
    }

    /// Look up one combination by key.
    pub fn combination(&self, key: &str) -> Result<&Combination<V::Model>, ExperimentError> {
        self.combinations
            .get(key)
            .ok_or_else(|| ExperimentError::UnknownCombination(key.to_string()))
    }

    /// Run every replication to completion, one after another.
    pub fn run(&mut self) -> Result<(), ExperimentError> {
        for (key, combination) in &mut self.combinations {
            for sim in &mut combination.replications {
                sim.run()?;
            }
            debug!(key = %key, "Combination finished");
        }
        info!(combinations = self.combinations.len(), "Experiment finished");
        Ok(())
    }

    /// Aggregate every measure across replications.
    ///
    /// For each combination one replication is picked uniformly at random
    /// (reproducibly) to supply the detailed report and trajectories.
    pub fn report(&self) -> Result<ExperimentReport, ExperimentError> {
        let mut picker = SimRng::new(self.config.seed ^ REPORT_SEED_SALT);
        let mut reports = Vec::with_capacity(self.combinations.len());

        for (key, combination) in &self.combinations {
            if !combination.is_finished() {
                return Err(ExperimentError::NotRun { key: key.clone() });
            }
            reports.push(self.summarize_combination(key, combination, &mut picker)?);
        }

        let mut models: Vec<String> = Vec::new();
        for report in &reports {
            if !models.contains(&report.model) {
                models.push(report.model.clone());
            }
        }

        Ok(ExperimentReport {
            models,
            replications: self.config.replications,
            confidence: self.config.confidence,
            combinations: reports,
        })
    }

    fn summarize_combination(
        &self,
        key: &str,
        combination: &Combination<V::Model>,
        picker: &mut SimRng,
    ) -> Result<CombinationReport, ExperimentError> {
        let runs = &combination.replications;
        let sample_index = picker.choose_index(runs.len());
        let sample = &runs[sample_index];
        debug!(key, sample_index, seed = sample.seed(), "Selected sample replication");

        let mut measures = Vec::new();
        for measure in sample.statistical_measures() {
            let values: Vec<MeasureValue> =
                runs.iter().map(|sim| measure.evaluate(sim.model())).collect();

            let aggregate = if measure.is_distribution() {
                let rows: Vec<Vec<f64>> = values
                    .into_iter()
                    .filter_map(|v| match v {
                        MeasureValue::Distribution(row) => Some(row),
                        MeasureValue::Scalar(_) => None,
                    })
                    .collect();
                let elements = pad_and_transpose(&rows)
                    .iter()
                    .map(|column| summarize(column, self.config.confidence))
                    .collect::<Result<Vec<_>, _>>()?;
                Aggregate::Distribution { elements }
            } else {
                let samples: Vec<f64> = values
                    .into_iter()
                    .filter_map(|v| match v {
                        MeasureValue::Scalar(x) => Some(x),
                        MeasureValue::Distribution(_) => None,
                    })
                    .collect();
                let summary = summarize(&samples, self.config.confidence)?;
                Aggregate::Scalar { samples, summary }
            };

            measures.push(MeasureSummary {
                key: measure.key.to_string(),
                title: measure.title.to_string(),
                symbol: measure.symbol.to_string(),
                x_label: measure.x_label.to_string(),
                aggregate,
            });
        }

        let temporal = sample
            .temporal_measures()
            .into_iter()
            .map(|measure| {
                let series = measure.evaluate(sample.model());
                TemporalSeries {
                    key: measure.key.to_string(),
                    title: measure.title.to_string(),
                    x_label: measure.x_label.to_string(),
                    y_label: measure.y_label.to_string(),
                    times: series.times,
                    values: series.values,
                }
            })
            .collect();

        Ok(CombinationReport {
            key: key.to_string(),
            model: sample.model().name(),
            description: combination.description.clone(),
            sample_replication: sample_index,
            sample_seed: sample.seed(),
            sample_report: sample.report(),
            measures,
            temporal,
        })
    }
}

impl<V> Experiment<V>
where
    V: ParameterVariator,
    V::Model: Send,
    <V::Model as Model>::Event: Send,
{
    /// Run every replication to completion on the rayon thread pool.
    ///
    /// Replications share no state, so results equal those of [`Experiment::run`].
    pub fn run_parallel(&mut self) -> Result<(), ExperimentError> {
        let sims: Vec<&mut Simulation<V::Model>> = self
            .combinations
            .values_mut()
            .flat_map(|c| c.replications.iter_mut())
            .collect();
        let total = sims.len();
        sims.into_par_iter().try_for_each(|sim| sim.run())?;
        info!(replications = total, "Experiment finished in parallel");
        Ok(())
    }

    /// Run sequentially or in parallel according to the configuration.
    pub fn execute(&mut self) -> Result<(), ExperimentError> {
        if self.config.parallel {
            self.run_parallel()
        } else {
            self.run()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use stochsim_queueing::QueueVariator;
    use tracing_test::traced_test;

    fn small_grid() -> QueueVariator {
        QueueVariator::new(2.0, vec![0.25, 0.75], vec![None, Some(2)]).with_customers(100)
    }

    #[test]
    fn test_instantiates_grid_times_replications() {
        let experiment = Experiment::new(small_grid(), ExperimentConfig::new(4)).unwrap();
        let keys: Vec<_> = experiment.combinations().keys().cloned().collect();
        assert_eq!(keys, vec!["25_inf", "25_2", "75_inf", "75_2"]);

        let seeds: HashSet<u64> = experiment
            .combinations()
            .values()
            .flat_map(|c| c.replications.iter().map(|s| s.seed()))
            .collect();
        assert_eq!(seeds.len(), 16);
        assert_eq!(
            experiment.combination("75_2").unwrap().description,
            "Ta/Ts = 75%, cap = 2"
        );
        assert!(experiment.combination("nope").is_err());
    }

    #[test]
    fn test_rejects_empty_grid_and_zero_replications() {
        let empty = QueueVariator::new(2.0, vec![], vec![None]);
        assert!(matches!(
            Experiment::new(empty, ExperimentConfig::new(3)),
            Err(ExperimentError::NoCombinations)
        ));
        assert!(matches!(
            Experiment::new(small_grid(), ExperimentConfig::new(0)),
            Err(ExperimentError::Config(_))
        ));
    }

    #[test]
    fn test_rejects_colliding_keys() {
        let repeated_capacity = QueueVariator::new(2.0, vec![0.5], vec![None, None]);
        assert!(matches!(
            Experiment::new(repeated_capacity, ExperimentConfig::new(2)),
            Err(ExperimentError::DuplicateCombination(key)) if key == "50_inf"
        ));

        // Both ratios round to 25%.
        let close_ratios = QueueVariator::new(2.0, vec![0.251, 0.254], vec![Some(1)]);
        assert!(matches!(
            Experiment::new(close_ratios, ExperimentConfig::new(2)),
            Err(ExperimentError::DuplicateCombination(key)) if key == "25_1"
        ));
    }

    #[test]
    fn test_report_requires_run() {
        let experiment = Experiment::new(small_grid(), ExperimentConfig::new(2)).unwrap();
        assert!(matches!(
            experiment.report(),
            Err(ExperimentError::NotRun { .. })
        ));
    }

    #[test]
    fn test_report_aggregates_every_measure() {
        let mut experiment = Experiment::new(small_grid(), ExperimentConfig::new(5)).unwrap();
        experiment.run().unwrap();
        let report = experiment.report().unwrap();

        assert_eq!(report.combinations.len(), 4);
        assert_eq!(report.models, vec!["M/M/1/∞", "M/M/1/2"]);
        assert_eq!(report.combinations[3].model, "M/M/1/2");
        let unbounded = &report.combinations[0];
        assert!(unbounded.sample_replication < 5);
        assert!(unbounded
            .measures
            .iter()
            .all(|m| m.key != "blocking_probability"));

        let bounded = &report.combinations[1];
        assert!(bounded
            .measures
            .iter()
            .any(|m| m.key == "blocking_probability"));

        for combination in &report.combinations {
            for measure in &combination.measures {
                match &measure.aggregate {
                    Aggregate::Scalar { samples, summary } => {
                        assert_eq!(samples.len(), 5);
                        assert!(summary.interval.lower <= summary.mean);
                        assert!(summary.mean <= summary.interval.upper);
                    }
                    Aggregate::Distribution { elements } => {
                        assert!(!elements.is_empty());
                        assert!(elements.iter().all(|e| e.samples == 5));
                    }
                }
            }
        }
    }

    #[traced_test]
    #[test]
    fn test_run_logs_completion() {
        let mut experiment = Experiment::new(small_grid(), ExperimentConfig::new(2)).unwrap();
        assert!(logs_contain("Experiment instantiated"));
        experiment.run().unwrap();
        assert!(logs_contain("Experiment finished"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut sequential = Experiment::new(small_grid(), ExperimentConfig::new(3)).unwrap();
        sequential.run().unwrap();
        let mut parallel =
            Experiment::new(small_grid(), ExperimentConfig::new(3).with_parallel(true)).unwrap();
        parallel.execute().unwrap();

        let a = sequential.report().unwrap();
        let b = parallel.report().unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }
}
