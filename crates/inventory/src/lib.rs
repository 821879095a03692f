//! Single-product inventory model with an (s, S) periodic-review policy.
//!
//! # Events
//!
//! - `InventoryEvent::Review` → order up to S when the level is below s
//! - `InventoryEvent::Demand` → draw a demand size, decrement the level
//! - `InventoryEvent::OrderArrival` → add the ordered quantity
//! - `InventoryEvent::EndOfHorizon` → close the time-weighted integrals
//!
//! Termination: the clock reaches the configured horizon.

mod config;
mod demand;
mod model;
mod variator;

pub use config::InventoryConfig;
pub use demand::DemandDistribution;
pub use model::{InventoryEvent, InventoryModel};
pub use variator::{InventoryVariator, Policy};
