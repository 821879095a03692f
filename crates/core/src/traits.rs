//! Core traits for simulation models and parameter sweeps.

use crate::{ConfigError, Event, RandomSource, StatisticalMeasure, TemporalMeasure};

/// What an event handler may touch while it runs.
///
/// The runner owns the clock, the pending-event set and the random stream;
/// handlers reach them only through this interface.
pub trait Context<E> {
    /// Current logical time.
    fn now(&self) -> f64;

    /// Schedule `kind` to fire at absolute time `time`.
    ///
    /// `time` must not be earlier than [`Context::now`]. Scheduling into the
    /// past is a logic error: it is caught by a debug assertion and would
    /// otherwise corrupt time-weighted statistics.
    fn schedule(&mut self, time: f64, kind: E);

    /// Schedule `kind` to fire `delay` time units from now.
    fn schedule_in(&mut self, delay: f64, kind: E) {
        let time = self.now() + delay;
        self.schedule(time, kind);
    }

    /// The simulation's private random stream.
    fn rng(&mut self) -> &mut dyn RandomSource;
}

/// A discrete-event model driven by a simulation runner.
///
/// Models are:
///
/// - **Synchronous**: a handler runs to completion before anything else
/// - **Deterministic**: same state, event and random stream give the same result
/// - **Self-contained**: no state is shared between instances
///
/// # Lifecycle
///
/// The runner calls [`Model::bootstrap`] once, then repeatedly pops the
/// earliest pending event, advances the clock, calls [`Model::advance`] with
/// the elapsed time and finally [`Model::handle`], until
/// [`Model::is_finished`] returns true.
///
/// # Example
///
/// ```ignore
/// impl Model for MmcQueue {
///     type Event = QueueEvent;
///
///     fn handle(&mut self, event: Event<QueueEvent>, ctx: &mut dyn Context<QueueEvent>) {
///         match event.kind {
///             QueueEvent::Arrival => self.on_arrival(event.time, ctx),
///             QueueEvent::Departure { server } => self.on_departure(event.time, server, ctx),
///         }
///     }
///     // ...
/// }
/// ```
pub trait Model {
    /// Model-specific event kinds.
    type Event;

    /// Short model name used in logs and reports.
    fn name(&self) -> String;

    /// Schedule the initial events. At least one event must be scheduled.
    fn bootstrap(&mut self, ctx: &mut dyn Context<Self::Event>);

    /// Process one event.
    ///
    /// Handlers may schedule new events but are never re-entered while
    /// running.
    fn handle(&mut self, event: Event<Self::Event>, ctx: &mut dyn Context<Self::Event>);

    /// Time-weighted statistics hook.
    ///
    /// Called after the clock moves to `now` and before the event at `now` is
    /// handled. `elapsed` is the time since the previous event, so the state
    /// still reflects the interval being integrated.
    fn advance(&mut self, now: f64, elapsed: f64);

    /// Termination predicate.
    fn is_finished(&self) -> bool;

    /// Human-readable summary of one run.
    fn report(&self) -> String;

    /// Statistical measures available for this instance.
    ///
    /// The set may depend on configuration (e.g. blocking probability only
    /// exists for finite capacity). Accessors must be pure reads.
    fn statistical_measures(&self) -> Vec<StatisticalMeasure<Self>>
    where
        Self: Sized;

    /// Trajectories recorded during the run.
    fn temporal_measures(&self) -> Vec<TemporalMeasure<Self>>
    where
        Self: Sized;
}

/// A parameter grid for an experiment.
///
/// Each point is one parameter combination; the experiment builds
/// `replications` independent models per point.
pub trait ParameterVariator {
    /// The model this grid parameterizes.
    type Model: Model;

    /// A single parameter combination.
    type Point: Clone;

    /// All combinations, in report order.
    fn points(&self) -> Vec<Self::Point>;

    /// Stable key identifying a combination.
    fn key(&self, point: &Self::Point) -> String;

    /// Human-readable description of a combination.
    fn describe(&self, point: &Self::Point) -> String;

    /// Build a fresh model for a combination.
    fn build(&self, point: &Self::Point) -> Result<Self::Model, ConfigError>;
}
