//! Simulation lifecycle: bootstrap, step, run to completion.

use stochsim_core::{Context, Model, RandomSource, SimError, StatisticalMeasure, TemporalMeasure};
use tracing::{debug, error, info, trace};

use crate::event_queue::EventQueue;
use crate::rng::SimRng;

/// Clock, pending events and random stream: everything a handler may touch.
struct Engine<E> {
    clock: f64,
    queue: EventQueue<E>,
    rng: SimRng,
}

impl<E> Context<E> for Engine<E> {
    fn now(&self) -> f64 {
        self.clock
    }

    fn schedule(&mut self, time: f64, kind: E) {
        debug_assert!(
            time >= self.clock,
            "event scheduled in the past: {} < {}",
            time,
            self.clock
        );
        self.queue.push(time, kind);
    }

    fn rng(&mut self) -> &mut dyn RandomSource {
        &mut self.rng
    }
}

/// A single replication of a model.
///
/// Owns a monotonically non-decreasing clock, the pending-event set and a
/// private seeded random stream. States:
///
/// - **constructing**: [`Simulation::new`] lets the model schedule its
///   bootstrap events
/// - **running**: [`Simulation::step`] advances to the earliest event
/// - **finished**: [`Model::is_finished`] holds; further steps are rejected
pub struct Simulation<M: Model> {
    model: M,
    engine: Engine<M::Event>,
    seed: u64,
    time_of_last_event: f64,
    time_since_last_event: f64,
    events_processed: u64,
}

impl<M: Model> Simulation<M> {
    /// Create a simulation and bootstrap the model.
    ///
    /// Fails with [`SimError::NoBootstrapEvents`] if the model scheduled
    /// nothing.
    pub fn new(model: M, seed: u64) -> Result<Self, SimError> {
        let mut sim = Self {
            model,
            engine: Engine {
                clock: 0.0,
                queue: EventQueue::new(),
                rng: SimRng::new(seed),
            },
            seed,
            time_of_last_event: 0.0,
            time_since_last_event: 0.0,
            events_processed: 0,
        };

        sim.model.bootstrap(&mut sim.engine);
        if sim.engine.queue.is_empty() {
            return Err(SimError::NoBootstrapEvents);
        }

        debug!(
            model = %sim.model.name(),
            seed,
            pending = sim.engine.queue.len(),
            "Simulation bootstrapped"
        );
        Ok(sim)
    }

    /// Advance to the earliest pending event and handle it.
    ///
    /// Updates the time-weighted bookkeeping (`time_since_last_event`,
    /// `time_of_last_event`) before the model sees the event.
    pub fn step(&mut self) -> Result<(), SimError> {
        if self.model.is_finished() {
            return Err(SimError::AlreadyFinished {
                clock: self.engine.clock,
            });
        }

        let event = match self.engine.queue.pop_next() {
            Some(event) => event,
            None => {
                error!(
                    clock = self.engine.clock,
                    model = %self.model.name(),
                    "Event list empty before termination"
                );
                return Err(SimError::EmptyEventSet {
                    clock: self.engine.clock,
                });
            }
        };

        self.engine.clock = event.time;
        self.time_since_last_event = self.engine.clock - self.time_of_last_event;
        self.time_of_last_event = self.engine.clock;

        trace!(
            clock = self.engine.clock,
            elapsed = self.time_since_last_event,
            pending = self.engine.queue.len(),
            "Step"
        );

        self.model.advance(self.engine.clock, self.time_since_last_event);
        self.model.handle(event, &mut self.engine);
        self.events_processed += 1;
        Ok(())
    }

    /// Step until the termination predicate holds.
    pub fn run(&mut self) -> Result<(), SimError> {
        while !self.model.is_finished() {
            self.step()?;
        }
        debug!(
            model = %self.model.name(),
            seed = self.seed,
            clock = self.engine.clock,
            events = self.events_processed,
            "Simulation finished"
        );
        Ok(())
    }

    /// Run to completion, optionally returning the summary report.
    pub fn run_with_report(&mut self, report: bool) -> Result<Option<String>, SimError> {
        self.run()?;
        if report {
            let text = self.report();
            info!(model = %self.model.name(), "\n{}", text);
            Ok(Some(text))
        } else {
            Ok(None)
        }
    }

    /// Whether the termination predicate holds.
    pub fn is_finished(&self) -> bool {
        self.model.is_finished()
    }

    /// Human-readable summary of this run.
    pub fn report(&self) -> String {
        self.model.report()
    }

    /// Statistical measures exposed by the model.
    pub fn statistical_measures(&self) -> Vec<StatisticalMeasure<M>> {
        self.model.statistical_measures()
    }

    /// Trajectories exposed by the model.
    pub fn temporal_measures(&self) -> Vec<TemporalMeasure<M>> {
        self.model.temporal_measures()
    }

    /// Current logical time.
    pub fn clock(&self) -> f64 {
        self.engine.clock
    }

    /// Time of the most recently processed event.
    pub fn time_of_last_event(&self) -> f64 {
        self.time_of_last_event
    }

    /// Time elapsed between the two most recent events.
    pub fn time_since_last_event(&self) -> f64 {
        self.time_since_last_event
    }

    /// Number of events handled so far.
    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Number of events waiting to fire.
    pub fn pending_events(&self) -> usize {
        self.engine.queue.len()
    }

    /// Time of the next pending event.
    pub fn next_event_time(&self) -> Option<f64> {
        self.engine.queue.peek_time()
    }

    /// Seed of this replication's random stream.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The model and its accumulated state.
    pub fn model(&self) -> &M {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stochsim_core::{Event, TimeSeries};
    use tracing_test::traced_test;

    /// Fires `remaining` exponentially spaced ticks, integrating a constant
    /// level of 1 over time.
    struct Ticker {
        remaining: u32,
        handled: Vec<f64>,
        area: f64,
        now: f64,
        keep_scheduling: bool,
        bootstrap: bool,
    }

    impl Ticker {
        fn new(remaining: u32) -> Self {
            Self {
                remaining,
                handled: Vec::new(),
                area: 0.0,
                now: 0.0,
                keep_scheduling: true,
                bootstrap: true,
            }
        }
    }

    fn area(t: &Ticker) -> f64 {
        t.area
    }

    fn ticks(t: &Ticker) -> TimeSeries {
        let mut series = TimeSeries::new();
        for (i, time) in t.handled.iter().enumerate() {
            series.push(*time, i as f64);
        }
        series
    }

    impl Model for Ticker {
        type Event = ();

        fn name(&self) -> String {
            "ticker".to_string()
        }

        fn bootstrap(&mut self, ctx: &mut dyn Context<()>) {
            if self.bootstrap {
                let delay = ctx.rng().exponential(1.0);
                ctx.schedule_in(delay, ());
            }
        }

        fn handle(&mut self, event: Event<()>, ctx: &mut dyn Context<()>) {
            assert_eq!(event.time, ctx.now());
            self.handled.push(event.time);
            self.remaining = self.remaining.saturating_sub(1);
            if self.keep_scheduling {
                let delay = ctx.rng().exponential(1.0);
                ctx.schedule_in(delay, ());
            }
        }

        fn advance(&mut self, now: f64, elapsed: f64) {
            self.now = now;
            self.area += elapsed;
        }

        fn is_finished(&self) -> bool {
            self.remaining == 0
        }

        fn report(&self) -> String {
            format!("ticks handled: {}", self.handled.len())
        }

        fn statistical_measures(&self) -> Vec<StatisticalMeasure<Self>> {
            vec![StatisticalMeasure::scalar("area", "Area", "A", "", area)]
        }

        fn temporal_measures(&self) -> Vec<TemporalMeasure<Self>> {
            vec![TemporalMeasure {
                key: "ticks",
                title: "Ticks",
                x_label: "t",
                y_label: "n",
                series: ticks,
            }]
        }
    }

    #[test]
    fn test_clock_is_non_decreasing() {
        let mut sim = Simulation::new(Ticker::new(500), 3).unwrap();
        let mut last = sim.clock();
        while !sim.is_finished() {
            sim.step().unwrap();
            assert!(sim.clock() >= last);
            assert_eq!(sim.time_of_last_event(), sim.clock());
            last = sim.clock();
        }
        assert_eq!(sim.events_processed(), 500);
    }

    #[test]
    fn test_elapsed_time_integrates_to_clock() {
        let mut sim = Simulation::new(Ticker::new(200), 11).unwrap();
        sim.run().unwrap();
        assert!((sim.model().area - sim.clock()).abs() < 1e-9);
        assert_eq!(sim.model().now, sim.clock());
    }

    #[test]
    fn test_same_seed_reproduces_event_sequence() {
        let mut a = Simulation::new(Ticker::new(100), 99).unwrap();
        let mut b = Simulation::new(Ticker::new(100), 99).unwrap();
        a.run().unwrap();
        b.run().unwrap();
        assert_eq!(a.model().handled, b.model().handled);

        let mut c = Simulation::new(Ticker::new(100), 100).unwrap();
        c.run().unwrap();
        assert_ne!(a.model().handled, c.model().handled);
    }

    #[traced_test]
    #[test]
    fn test_empty_event_set_is_fatal() {
        let mut ticker = Ticker::new(10);
        ticker.keep_scheduling = false;
        let mut sim = Simulation::new(ticker, 5).unwrap();

        let err = sim.run().unwrap_err();
        let clock = sim.clock();
        assert_eq!(err, SimError::EmptyEventSet { clock });
        assert!(clock > 0.0);
        assert!(logs_contain("Event list empty before termination"));
    }

    #[test]
    fn test_model_without_bootstrap_events_is_rejected() {
        let mut ticker = Ticker::new(1);
        ticker.bootstrap = false;
        assert_eq!(
            Simulation::new(ticker, 0).err(),
            Some(SimError::NoBootstrapEvents)
        );
    }

    #[test]
    fn test_step_after_finish_is_rejected() {
        let mut sim = Simulation::new(Ticker::new(2), 1).unwrap();
        sim.run().unwrap();
        assert!(matches!(sim.step(), Err(SimError::AlreadyFinished { .. })));
    }

    #[test]
    fn test_run_with_report_returns_summary() {
        let mut sim = Simulation::new(Ticker::new(3), 1).unwrap();
        let report = sim.run_with_report(true).unwrap();
        assert_eq!(report.as_deref(), Some("ticks handled: 3"));
        assert_eq!(sim.statistical_measures().len(), 1);
        assert_eq!(sim.temporal_measures()[0].evaluate(sim.model()).len(), 3);
    }
}
