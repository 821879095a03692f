//! Pending-event set ordered by time.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use stochsim_core::Event;

/// Ordering key for pending events.
///
/// Events fire in ascending time. Events scheduled for exactly the same time
/// fire in the order they were scheduled.
#[derive(Debug, Clone, Copy)]
pub struct EventKey {
    /// Scheduled time.
    pub time: f64,
    /// Monotonic schedule counter, breaks ties FIFO.
    pub sequence: u64,
}

impl PartialEq for EventKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EventKey {}

impl PartialOrd for EventKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then(self.sequence.cmp(&other.sequence))
    }
}

/// Time-ordered multiset of pending events.
#[derive(Debug)]
pub struct EventQueue<E> {
    events: BTreeMap<EventKey, E>,
    next_sequence: u64,
}

impl<E> Default for EventQueue<E> {
    fn default() -> Self {
        Self {
            events: BTreeMap::new(),
            next_sequence: 0,
        }
    }
}

impl<E> EventQueue<E> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an event, returning its key.
    pub fn push(&mut self, time: f64, kind: E) -> EventKey {
        let key = EventKey {
            time,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.events.insert(key, kind);
        key
    }

    /// Remove and return the earliest event.
    pub fn pop_next(&mut self) -> Option<Event<E>> {
        self.events
            .pop_first()
            .map(|(key, kind)| Event::new(key.time, kind))
    }

    /// Time of the earliest event, if any.
    pub fn peek_time(&self) -> Option<f64> {
        self.events.keys().next().map(|key| key.time)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are pending.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total number of events ever scheduled.
    pub fn scheduled_total(&self) -> u64 {
        self.next_sequence
    }
}
