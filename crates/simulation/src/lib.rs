//! Deterministic simulation runner.
//!
//! This crate provides a fully deterministic discrete-event simulation
//! environment. Given the same seed and model parameters, it produces
//! identical event sequences and statistics every run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                    Simulation<M>                        │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Event Queue (BTreeMap<EventKey, E>)            │ │
//! │  │     Ordered by: time, sequence                     │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │ pop earliest                │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     clock ← event.time                             │ │
//! │  │     model.advance(clock, elapsed)                  │ │
//! │  │     model.handle(event, ctx)                       │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     ctx.schedule(..) → new pending events          │ │
//! │  │     ctx.rng()        → ChaCha8 seeded stream       │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod event_queue;
mod rng;
mod runner;

pub use event_queue::{EventKey, EventQueue};
pub use rng::SimRng;
pub use runner::Simulation;
