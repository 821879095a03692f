//! Timestamped simulation events.

/// A scheduled occurrence in a discrete-event simulation.
///
/// The `kind` is a model-specific tagged enum (e.g. arrival or departure);
/// handlers receive the whole event so they can read their own scheduled
/// time. Events are immutable once scheduled and consumed exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<E> {
    /// Logical time at which the event fires.
    pub time: f64,
    /// What happens.
    pub kind: E,
}

impl<E> Event<E> {
    /// Create a new event.
    pub fn new(time: f64, kind: E) -> Self {
        Self { time, kind }
    }
}
