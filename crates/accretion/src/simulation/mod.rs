//! The simulation engine and its read-only outputs.
//!
//! [`Simulation`] owns every particle system and drives them in a fixed
//! order each tick. Consumers interact through four calls:
//!
//! - [`Simulation::configure`] / [`Simulation::configure_json`]
//! - [`Simulation::advance`]
//! - [`Simulation::snapshot`]
//! - [`Simulation::reset`]

pub mod engine;
pub mod scenario;
pub mod snapshot;
pub mod stats;

#[cfg(test)]
mod engine_test;

pub use engine::Simulation;
pub use scenario::Scenario;
pub use snapshot::{
    CompanionView, DebrisView, DiskView, OutflowView, PairView, Snapshot, TidalBodyView, WindView,
};
pub use stats::Statistics;
