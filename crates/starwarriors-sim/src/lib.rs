//! Simulation engine for STAR WARRIORS.
//!
//! Owns the hecs ECS world, runs the combat systems once per tick in a fixed
//! order, and reports score deltas, effect events and wave progress to the
//! driver.

pub mod deferred;
pub mod engine;
pub mod error;
pub mod guidance;
pub mod systems;
pub mod world_setup;

pub use starwarriors_core as core;
pub use engine::{CombatEngine, SimConfig};

#[cfg(test)]
mod tests;
