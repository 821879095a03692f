//! Multi-server queueing model.
//!
//! An M/M/c queue with exponential inter-arrival and service times, random
//! server selection among idle servers, FIFO waiting line and an optional
//! finite capacity with loss (blocking) discipline.
//!
//! # Events
//!
//! - `QueueEvent::Arrival` → schedule next arrival, serve or enqueue or deny
//! - `QueueEvent::Departure { server }` → free the server, serve the head of line
//!
//! Termination: the target number of customers has completed delay.

mod config;
mod model;
mod variator;

pub use config::QueueConfig;
pub use model::{MmcQueue, QueueEvent, ServerState};
pub use variator::{QueuePoint, QueueVariator};
